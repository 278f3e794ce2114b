//! Model and vocabulary status commands

use std::path::Path;

use anyhow::Result;

use spur_core::{PolicyTables, RewardModelArtifact};

pub fn cmd_categories() -> Result<()> {
    let tables = PolicyTables::load()?;

    println!("Known categories (policy v{}):", tables.version);
    for name in tables.category_names() {
        let policy = tables.category(&name);
        println!(
            "  {:<16} priority {:.2}  base {:>2} coins",
            name, policy.priority, policy.base_coins
        );
    }
    Ok(())
}

pub fn cmd_model(model_path: Option<&Path>) -> Result<()> {
    let Some(path) = RewardModelArtifact::resolve_path(model_path) else {
        println!("No model artifact configured.");
        println!("Scoring will use the deterministic fallback rules.");
        println!();
        println!("Set --model, SPUR_MODEL_PATH, or place an artifact at");
        println!("<data-dir>/spur/model/reward_model.json to enable the predictor.");
        return Ok(());
    };

    println!("Artifact path: {}", path.display());

    match RewardModelArtifact::load(&path) {
        Ok(artifact) => {
            println!("Status: loaded (version {})", artifact.version);
            println!("Vocabulary: {} categories", artifact.vocabulary.len());
            print!("Layers: ");
            let shapes: Vec<String> = artifact
                .layers
                .iter()
                .map(|l| format!("{}x{}", l.input_len(), l.output_len()))
                .collect();
            println!("{}", shapes.join(" -> "));
        }
        Err(e) => {
            println!("Status: FAILED to load ({})", e);
            println!("The server would fall back to rule-based scoring.");
        }
    }

    Ok(())
}
