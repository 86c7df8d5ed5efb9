//! CLI `reset` command: delete the catalogue after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use spindle::config::SpindleConfig;

/// Delete all categories, items, and review history after user confirmation.
pub fn reset(config: &SpindleConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WARNING: This will permanently delete ALL categories, items, view counts, and review logs.");
    println!("Database: {}", db_path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let conn = super::open(config)?;

    // Items first for the FK to categories
    conn.execute_batch(
        "DELETE FROM items;
         DELETE FROM categories;
         DELETE FROM review_log;",
    )?;

    println!("Catalogue deleted. Database reset complete.");
    Ok(())
}
