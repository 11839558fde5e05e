//! Basic usage example for globex-rs
//!
//! This example demonstrates how to:
//! - Load the country collection through the endpoint fallback chain
//! - Search, filter and sort with the query engine
//! - Keep favorites in memory
//! - Look up neighbours of a country

use globex_rs::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("=== globex-rs Basic Usage Example ===\n");

    // Load the collection (falls back to bundled data when offline)
    println!("Loading countries...");
    let fetcher = Fetcher::from_config(&Config::default())?;
    let mut atlas = Atlas::new(MemoryStore::new())?;
    match atlas.load(&fetcher).await? {
        Origin::Source(url) => println!("✓ Loaded from {url}\n"),
        Origin::Bundled => println!("✓ Sources unreachable, using bundled data\n"),
    }

    // Example 1: First few countries
    println!("--- Example 1: List countries ---");
    let countries = atlas.countries();
    println!("Total countries: {}", countries.len());
    for (i, country) in countries.iter().take(5).enumerate() {
        println!("{}. {} ({})", i + 1, country.name(), country.alpha3());
    }
    println!();

    // Example 2: Search + sort
    println!("--- Example 2: Countries containing 'united', most populous first ---");
    atlas.set_search("united");
    atlas.set_sort(SortKey::Population);
    for country in atlas.visible() {
        println!(
            "- {} ({})",
            country.name(),
            format_population(country.population)
        );
    }
    println!();

    // Example 3: Region filter
    println!("--- Example 3: Countries in Europe ---");
    atlas.set_search("");
    atlas.set_region(RegionFilter::Only("Europe".to_string()));
    atlas.set_sort(SortKey::Name);
    for country in atlas.visible() {
        println!("- {}", country.name());
    }
    println!();

    // Example 4: Details and neighbours
    println!("--- Example 4: Germany and its neighbours ---");
    if let Some(germany) = atlas.country("DEU") {
        println!("Capital: {}", germany.capital);
        println!(
            "Languages: {}",
            germany.primary_language().unwrap_or("N/A")
        );
        for n in atlas.neighbours(germany) {
            println!("  borders {}", n.name());
        }
    }
    println!();

    // Example 5: Favorites
    println!("--- Example 5: Favorites ---");
    println!("{}", atlas.toggle_favorite("JPN")?);
    println!("{}", atlas.toggle_favorite("USA")?);
    for country in atlas.favorite_countries() {
        println!("★ {}", country.name());
    }
    println!("{}", atlas.toggle_favorite("JPN")?);
    println!("Favorites left: {}", atlas.stats().favorites);

    Ok(())
}
