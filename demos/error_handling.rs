//! Error handling example for globex-rs
//!
//! This example demonstrates which failures surface to callers and which are
//! absorbed by the fallback chain.

use globex_rs::prelude::*;
use globex_rs::{resolve_country, Source, SchemaFamily};
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("=== globex-rs Error Handling Example ===\n");

    // Example 1: Every source fails, no fallback
    println!("--- Example 1: Exhausted chain without fallback ---");
    let dead = vec![
        Source::new("http://127.0.0.1:1/v3.1/all", SchemaFamily::V3),
        Source::new("http://127.0.0.1:1/v2/all", SchemaFamily::V2),
    ];
    let fetcher = Fetcher::new(dead.clone(), vec![], Duration::from_secs(2))?;
    match fetcher.load_all().await {
        Ok(loaded) => println!("  unexpected success: {} countries", loaded.countries.len()),
        Err(e @ GlobexError::DataUnavailable { .. }) => {
            println!("  ✗ {e}");
            println!("  user sees: {}", e.user_message());
        }
        Err(e) => return Err(e),
    }
    println!();

    // Example 2: Same chain with the bundled dataset behind it
    println!("--- Example 2: Exhausted chain with fallback ---");
    let fetcher = Fetcher::new(dead, vec![], Duration::from_secs(2))?
        .with_fallback(Some(FallbackDataset::bundled()?));
    let loaded = fetcher.load_all().await?;
    println!(
        "  ✓ {} countries, bundled = {}",
        loaded.countries.len(),
        loaded.origin.is_bundled()
    );
    println!();

    // Example 3: Lookups that match nothing
    println!("--- Example 3: Unknown codes ---");
    let mut atlas = Atlas::new(MemoryStore::new())?;
    atlas.replace_countries(loaded.countries, loaded.origin);
    for code in ["XX", "", "ABCD", "usa"] {
        match atlas.country(code) {
            Some(country) => println!("  Found: {} ({})", country.name(), country.alpha3()),
            None => println!("  Not found: {code:?}"),
        }
    }
    println!();

    // Example 4: Geolocation answers that cannot be resolved
    println!("--- Example 4: Reverse-geocode answers ---");
    let answers = [
        ReverseGeocode::new(Some("ch"), None),
        ReverseGeocode::new(None, Some("Republic of India")),
        ReverseGeocode::new(Some("ZZ"), Some("Atlantis")),
        ReverseGeocode::new(None, None),
    ];
    for answer in &answers {
        match resolve_country(atlas.countries(), answer) {
            Ok(country) => println!("  ✓ {}", country.name()),
            Err(e) => println!("  ✗ {} ({e})", e.user_message()),
        }
    }
    println!();

    // Example 5: Bad configuration
    println!("--- Example 5: Invalid configuration ---");
    match Config::from_toml("[fetch]\ntimeout_secs = 0\n") {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  ✗ {e}"),
    }

    Ok(())
}
