use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use spindle::config::SpindleConfig;
use spindle::material::service::MaterialService;
use spindle::material::types::Category;

/// Import format: matches export output.
#[derive(Debug, Deserialize)]
struct ImportData {
    categories: Vec<Category>,
}

/// Import categories from a JSON file.
///
/// The file is treated as a content source: it is reconciled against the stored
/// catalogue and replaces it. Ids in the file are kept where they do not collide.
pub fn import(config: &SpindleConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let data: ImportData = serde_json::from_str(&json).context("failed to parse import JSON")?;

    println!("Importing {} categories...", data.categories.len());

    let mut conn = super::open(config)?;
    let mut service = MaterialService::new(&mut conn, &config.schedule)?;
    let (_, result) = service.sync(data.categories)?;

    println!("Import complete:");
    println!("  Categories stored:  {}", result.categories);
    println!("  Items stored:       {}", result.items);
    if result.removed_categories > 0 {
        println!("  Categories removed: {}", result.removed_categories);
    }

    Ok(())
}
