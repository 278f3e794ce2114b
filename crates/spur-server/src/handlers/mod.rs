//! Request handlers

mod meta;
mod score;

pub use meta::{categories, health, retrain};
pub use score::{predict_coins, test_prediction};
