use anyhow::Result;

use spindle::config::SpindleConfig;
use spindle::material::repository::load_categories;

/// List stored categories with item counts and last review time.
pub fn categories(config: &SpindleConfig) -> Result<()> {
    let conn = super::open(config)?;
    let categories = load_categories(&conn)?;

    println!("{:>5}  {:<32} {:>6}  {:<10} Last viewed", "Id", "Name", "Items", "Status");
    for category in &categories {
        let status = if category.completed { "completed" } else { "active" };
        let last = category
            .last_viewed
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:>5}  {:<32} {:>6}  {:<10} {}",
            category.id,
            category.name,
            category.items.len(),
            status,
            last
        );
    }
    println!("{} categories", categories.len());
    Ok(())
}
