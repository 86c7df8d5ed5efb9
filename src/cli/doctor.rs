//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use spindle::config::SpindleConfig;
use spindle::db;
use spindle::material::schedule::BatchScheduler;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &SpindleConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("Spindle Health Report");
    println!("=====================");
    println!();

    match BatchScheduler::try_from(&config.schedule) {
        Ok(s) => println!(
            "Schedule:          OK (batch_size={}, max_views={}, refresh_rate={})",
            s.batch_size(),
            s.max_views(),
            s.refresh_rate()
        ),
        Err(e) => println!("Schedule:          INVALID ({e})"),
    }
    println!("Content dir:       {}", config.resolved_content_dir().display());

    if !db_path.exists() {
        println!("Database:          not found at {}", db_path.display());
        println!("Run `spindle scan` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Categories:      {}", report.category_count);
    println!("  Items:           {}", report.item_count);
    println!("  Review log:      {}", report.log_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db ~/.spindle/material.db");
        println!("  2. Or export from a good copy and reimport:");
        println!("     spindle export > backup.json");
        println!("     spindle reset && spindle import backup.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
