//! CLI review commands: `recent`, `batch`, `review`, `item`.

use anyhow::Result;
use chrono::Utc;

use spindle::config::SpindleConfig;
use spindle::material::service::MaterialService;

/// Show the next batch of every recently used category.
pub fn recent(config: &SpindleConfig, json: bool) -> Result<()> {
    let mut conn = super::open(config)?;
    let mut service = MaterialService::new(&mut conn, &config.schedule)?;
    let batches = service.recent_batches(Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&batches)?);
        return Ok(());
    }
    if batches.is_empty() {
        println!("No categories. Run `spindle scan` first.");
    }
    for batch in &batches {
        super::print_batch(batch, false)?;
    }
    Ok(())
}

/// Show the next batch of a category without counting it.
pub fn batch(config: &SpindleConfig, category_id: u32, json: bool) -> Result<()> {
    let mut conn = super::open(config)?;
    let mut service = MaterialService::new(&mut conn, &config.schedule)?;
    let batch = service.batch(category_id)?;
    super::print_batch(&batch, json)
}

/// Count the next batch of a category as reviewed now.
pub fn review(config: &SpindleConfig, category_id: u32, json: bool) -> Result<()> {
    let mut conn = super::open(config)?;
    let mut service = MaterialService::new(&mut conn, &config.schedule)?;
    let batch = service.review(category_id, Utc::now())?;
    super::print_batch(&batch, json)
}

/// Print one item as JSON.
pub fn item(config: &SpindleConfig, category_id: u32, item_id: u32) -> Result<()> {
    let mut conn = super::open(config)?;
    let service = MaterialService::new(&mut conn, &config.schedule)?;
    let item = service.item(category_id, item_id)?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}
