//! CLI `scan` command: discover content and reconcile it into the catalogue.

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use spindle::config::SpindleConfig;
use spindle::material::service::MaterialService;

/// Scan `dir` (or the configured content directory) and store the reconciled result.
pub async fn scan(config: &SpindleConfig, dir: Option<PathBuf>) -> Result<()> {
    let root = dir.unwrap_or_else(|| config.resolved_content_dir());
    // An empty scan would empty the catalogue; refuse a missing root instead.
    if !root.is_dir() {
        bail!("content directory not found: {}", root.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("  {spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("scanning {}", root.display()));

    let progress = pb.clone();
    let scan_root = root.clone();
    let found = tokio::task::spawn_blocking(move || {
        spindle::scan::discover_with_progress(&scan_root, |visited| {
            if visited % 64 == 0 {
                progress.set_message(format!("scanning ({visited} entries)"));
            }
        })
    })
    .await??;
    pb.finish_and_clear();

    let mut conn = super::open(config)?;
    let mut service = MaterialService::new(&mut conn, &config.schedule)?;
    let (merged, result) = service.sync(found)?;

    println!("Scan complete: {}", root.display());
    println!("  Categories:          {}", result.categories);
    println!("  Items:               {}", result.items);
    println!("  Removed categories:  {}", result.removed_categories);
    let carried = merged
        .iter()
        .flat_map(|c| c.items.iter())
        .filter(|i| i.views > 0)
        .count();
    println!("  Items with history:  {carried}");

    Ok(())
}
