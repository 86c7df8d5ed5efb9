pub mod batch;
pub mod categories;
pub mod doctor;
pub mod export;
pub mod import;
pub mod reset;
pub mod scan;
pub mod stats;

use anyhow::Result;
use rusqlite::Connection;

use spindle::config::SpindleConfig;
use spindle::material::types::Batch;

/// Open the configured database.
fn open(config: &SpindleConfig) -> Result<Connection> {
    spindle::db::open_database(config.resolved_db_path())
}

/// Print a batch either as pretty JSON or as a short listing.
fn print_batch(batch: &Batch, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(batch)?);
        return Ok(());
    }

    if batch.completed {
        println!("[{}] {}: completed", batch.category_id, batch.category_name);
        return Ok(());
    }

    println!(
        "[{}] {} ({} items)",
        batch.category_id,
        batch.category_name,
        batch.len()
    );
    for item in &batch.items {
        let media = item.media_ref.as_deref().unwrap_or("-");
        println!("  {:>5}  {:<24} views={:<3} {}", item.id, item.title, item.views, media);
    }
    Ok(())
}
