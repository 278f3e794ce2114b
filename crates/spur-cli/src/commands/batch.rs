//! Batch scoring from a CSV file

use std::path::Path;

use anyhow::{Context, Result};

use spur_core::{ExpenseEvent, RewardEngine};

/// Score every row of a CSV file, printing one JSON result per line.
///
/// Rows that fail to parse or score are reported on stderr and skipped;
/// the command only fails if the file itself is unreadable.
pub fn cmd_batch(model_path: Option<&Path>, file: &Path) -> Result<()> {
    let engine = RewardEngine::bootstrap(model_path)?;

    let mut reader = csv::Reader::from_path(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let mut scored = 0usize;
    let mut skipped = 0usize;

    for (line, record) in reader.deserialize::<ExpenseEvent>().enumerate() {
        // Header is line 1, first record is line 2
        let line = line + 2;

        let event = match record {
            Ok(event) => event,
            Err(e) => {
                eprintln!("line {}: skipped ({})", line, e);
                skipped += 1;
                continue;
            }
        };

        match engine.score(&event) {
            Ok(result) => {
                println!("{}", serde_json::to_string(&result)?);
                scored += 1;
            }
            Err(e) => {
                eprintln!("line {}: skipped ({})", line, e);
                skipped += 1;
            }
        }
    }

    eprintln!("Scored {} events, skipped {}", scored, skipped);
    Ok(())
}
