//! Command implementations

mod batch;
mod model;
mod score;
mod serve;

pub use batch::cmd_batch;
pub use model::{cmd_categories, cmd_model};
pub use score::cmd_score;
pub use serve::cmd_serve;
