use anyhow::Result;
use serde::Serialize;

use spindle::config::SpindleConfig;
use spindle::material::repository::load_categories;
use spindle::material::types::Category;

/// Export format: wraps the whole catalogue.
#[derive(Debug, Serialize)]
struct ExportData {
    categories: Vec<Category>,
}

/// Export all categories and items as JSON to stdout.
pub fn export(config: &SpindleConfig) -> Result<()> {
    let conn = super::open(config)?;
    let data = ExportData {
        categories: load_categories(&conn)?,
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!(
        "Exported {} categories and {} items.",
        data.categories.len(),
        data.categories.iter().map(|c| c.items.len()).sum::<usize>()
    );

    Ok(())
}
