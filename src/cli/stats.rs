use anyhow::Result;

use spindle::config::SpindleConfig;
use spindle::material::service::MaterialService;

/// Display catalogue statistics in the terminal.
pub fn stats(config: &SpindleConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let mut conn = super::open(config)?;
    let service = MaterialService::new(&mut conn, &config.schedule)?;

    let response = service.stats(Some(&db_path))?;

    println!("Material Statistics");
    println!("{}", "=".repeat(40));
    println!("  Categories:          {}", response.total_categories);
    println!("  Completed:           {}", response.completed_categories);
    println!();
    println!("  Items:               {}", response.total_items);
    println!("  Never viewed:        {}", response.unseen_items);
    println!(
        "  Exhausted (>= {}):    {}",
        service.scheduler().max_views(),
        response.exhausted_items
    );
    println!("  Total views:         {}", response.total_views);
    println!();
    println!("Database size:         {} bytes", response.db_size_bytes);

    if let Some(ref last) = response.last_review {
        println!("Last review:           {last}");
    }

    Ok(())
}
