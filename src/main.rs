// src/main.rs
use flashprix::catalog::Catalog;
use flashprix::config::Config;
use flashprix::domain::errors::AppResult;
use std::env;
use std::process;

fn main() {
    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("flashprix: {}", e);
        process::exit(1);
    }
}

fn run() -> AppResult<()> {
    // Load configuration
    let config = match env::var("FLASHPRIX_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::from_env()?,
    };

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting flashprix v{}", env!("CARGO_PKG_VERSION"));

    // Snapshot the resolved settings so they can be replayed with FLASHPRIX_CONFIG
    if let Ok(path) = env::var("FLASHPRIX_WRITE_CONFIG") {
        config.to_file(path)?;
    }

    let catalog = Catalog::from_file(&config.catalog.path)?;
    if catalog.is_empty() {
        log::warn!("Catalog {} contains no products", config.catalog.path);
        return Ok(());
    }

    println!(
        "{:<16} {:>10} {:>10} {:>10} {:>10} {:>9}",
        "product", "current", "lowest", "highest", "average", "discount"
    );
    for (product, stats) in catalog.summaries()? {
        println!(
            "{:<16} {:>10} {:>10} {:>10} {:>10} {:>8}%",
            product.id,
            stats.current_price,
            stats.lowest_price,
            stats.highest_price,
            stats.average_price.round_dp(2),
            stats.discount_percent()
        );
    }

    let range = config.filter.price_range()?;
    let matches = catalog.search(&range, config.filter.category.as_deref());
    log::info!(
        "{} of {} products within [{}, {}]",
        matches.len(),
        catalog.len(),
        range.min(),
        range.max()
    );

    println!();
    for id in matches {
        if let Some(product) = catalog.get(&id) {
            println!("{}  {}", id, product.name);
        }
    }

    Ok(())
}
