//! globex: command-line interface for globex-core
//!
//! Loads the country collection through the endpoint fallback chain (or the
//! bundled dataset with `--offline`) and lets you list, search, inspect and
//! bookmark countries from the terminal.
//!
//! Usage examples
//! --------------
//!
//! - Search and sort
//!   $ globex list --search united --sort population
//!   $ globex list --region Europe
//!
//! - Details for a country by code (ISO2 or ISO3, case-insensitive)
//!   $ globex show deu
//!
//! - Ask the lookup endpoints directly
//!   $ globex lookup name "south africa"
//!   $ globex lookup code JP
//!
//! - Favorites and theme (persisted in the platform data dir)
//!   $ globex favorites toggle USA
//!   $ globex favorites
//!   $ globex theme toggle
//!
//! - Find the country for a coordinate pair
//!   $ globex locate --lat 48.85 --lng 2.35
//!
//! Configuration
//! -------------
//!
//! `--config <path>`, else `$GLOBEX_CONFIG`, else `config.toml` in the
//! platform config dir, else built-in defaults. `RUST_LOG` overrides the
//! configured log level.
mod args;

use crate::args::{CliArgs, Commands, FavoritesAction, LookupBy, ThemeAction};
use anyhow::{bail, Context};
use clap::Parser;
use globex_core::{
    format_population, Atlas, CanonicalCountry, Config, FallbackDataset, Fetcher, FileStore,
    Geolocator, GlobexError, KeyValueStore, MemoryStore, NameMatch, Origin, Query,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = Config::load(args.config.as_deref()).context("loading configuration")?;
    setup_tracing(&config.logging.level, args.verbose);

    let store: Box<dyn KeyValueStore> = if args.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        let path = config.storage.resolved_path()?;
        tracing::debug!(store = %path.display(), "opening store");
        Box::new(FileStore::open(path)?)
    };
    let mut atlas = Atlas::new(store)?;

    match args.command {
        Commands::List {
            search,
            region,
            sort,
        } => {
            load(&mut atlas, &config, args.offline).await?;
            let query = Query::parse(&search, &region, &sort);
            atlas.set_search(&query.search);
            atlas.set_region(query.region);
            atlas.set_sort(query.sort);

            let visible = atlas.visible();
            if visible.is_empty() {
                println!("No countries match.");
            }
            for c in visible {
                print_row(c, atlas.is_favorite(&c.alpha3_code));
            }
        }

        Commands::Show { code } => {
            load(&mut atlas, &config, args.offline).await?;
            match atlas.country(&code) {
                Some(c) => {
                    print_details(c);
                    let neighbours: Vec<_> =
                        atlas.neighbours(c).iter().map(|n| n.name.as_str()).collect();
                    if !neighbours.is_empty() {
                        println!("Neighbours: {}", neighbours.join(", "));
                    }
                    if atlas.is_favorite(&c.alpha3_code) {
                        println!("★ favorite");
                    }
                }
                None => eprintln!("No country found for: {code}"),
            }
        }

        Commands::Lookup { by } => {
            let country = if args.offline {
                let dataset = fallback_dataset(&config)?;
                let found = match &by {
                    LookupBy::Name { query } => dataset
                        .countries()
                        .iter()
                        .find(|c| c.is_named(query))
                        .or_else(|| dataset.countries().iter().find(|c| c.name_contains(query))),
                    LookupBy::Code { code } => {
                        dataset.countries().iter().find(|c| c.has_code(code))
                    }
                };
                found.cloned().ok_or_else(|| {
                    GlobexError::LookupNotFound(match by {
                        LookupBy::Name { query } => query,
                        LookupBy::Code { code } => code,
                    })
                })?
            } else {
                let fetcher = Fetcher::from_config(&config)?;
                match &by {
                    LookupBy::Name { query } => fetcher.get_by_name(query).await?,
                    LookupBy::Code { code } => fetcher.get_by_code(code).await?,
                }
            };
            print_details(&country);
        }

        Commands::Regions => {
            load(&mut atlas, &config, args.offline).await?;
            for region in atlas.regions() {
                println!("{region}");
            }
        }

        Commands::Stats => {
            let origin = load(&mut atlas, &config, args.offline).await?;
            let stats = atlas.stats();
            println!("Country data:");
            println!("  Source: {}", describe(&origin));
            println!("  Countries: {}", stats.countries);
            println!("  Regions: {}", stats.regions);
            println!("  Favorites: {}", stats.favorites);
            println!("  Theme: {}", atlas.theme());
        }

        Commands::Favorites { action } => match action.unwrap_or(FavoritesAction::List) {
            FavoritesAction::List => {
                if atlas.favorites().is_empty() {
                    println!("No favorites yet. Add one with `globex favorites add <CODE>`.");
                    return Ok(());
                }
                load(&mut atlas, &config, args.offline).await?;
                let countries = atlas.favorite_countries();
                for c in &countries {
                    print_row(c, true);
                }
                for code in atlas.favorites().codes() {
                    if !countries.iter().any(|c| c.alpha3_code == *code) {
                        println!("{code} (not in the loaded data)");
                    }
                }
            }
            FavoritesAction::Add { code } => println!("{}", atlas.add_favorite(&code)?),
            FavoritesAction::Remove { code } => println!("{}", atlas.remove_favorite(&code)?),
            FavoritesAction::Toggle { code } => println!("{}", atlas.toggle_favorite(&code)?),
        },

        Commands::Locate { lat, lng } => {
            load(&mut atlas, &config, args.offline).await?;
            let geolocator = Geolocator::from_config(&config.geolocation, config.fetch.timeout())?;
            match geolocator.locate(atlas.countries(), lat, lng).await {
                Ok(c) => {
                    println!("You are in {}!", c.name);
                    print_details(c);
                }
                Err(e) => bail!(e.user_message()),
            }
        }

        Commands::Theme { action } => match action {
            Some(ThemeAction::Toggle) => println!("Theme: {}", atlas.toggle_theme()?),
            None => println!("Theme: {}", atlas.theme()),
        },
    }

    Ok(())
}

/// Fills the atlas from the network chain, or from the fallback dataset only.
async fn load<S: KeyValueStore>(
    atlas: &mut Atlas<S>,
    config: &Config,
    offline: bool,
) -> anyhow::Result<Origin> {
    if offline {
        let dataset = fallback_dataset(config)?;
        return Ok(atlas
            .replace_countries(dataset.into_countries(), Origin::Bundled)
            .clone());
    }

    let fetcher = Fetcher::from_config(config)?;
    match atlas.load(&fetcher).await {
        Ok(origin) => {
            if origin.is_bundled() {
                eprintln!("warning: all sources failed; showing bundled data");
            }
            Ok(origin.clone())
        }
        Err(e @ GlobexError::DataUnavailable { .. }) => bail!(e.user_message()),
        Err(e) => Err(e.into()),
    }
}

fn fallback_dataset(config: &Config) -> anyhow::Result<FallbackDataset> {
    match FallbackDataset::from_config(&config.fallback)? {
        Some(dataset) => Ok(dataset),
        None => bail!("--offline needs a fallback dataset, but none is configured"),
    }
}

fn describe(origin: &Origin) -> String {
    match origin {
        Origin::Source(url) => url.clone(),
        Origin::Bundled => "bundled fallback dataset".to_string(),
    }
}

fn print_row(c: &CanonicalCountry, favorite: bool) {
    println!(
        "{} {:<3} {:<40} {:<10} {:>8}",
        if favorite { '★' } else { ' ' },
        c.alpha3_code,
        c.name,
        c.region,
        format_population(c.population)
    );
}

fn print_details(c: &CanonicalCountry) {
    println!("Country: {}", c.name);
    println!("ISO2: {}", c.alpha2_code);
    println!("ISO3: {}", c.alpha3_code);
    println!("Capital: {}", c.capital);
    println!("Region: {} / {}", c.region, c.subregion);
    println!("Population: {}", format_population(c.population));
    println!("Area: {} km²", c.area);
    if let Some(lang) = c.primary_language() {
        let all: Vec<_> = c.languages.iter().map(|l| l.name.as_str()).collect();
        println!("Languages: {} ({})", lang, all.join(", "));
    }
    if let Some(cur) = c.primary_currency() {
        println!("Currency: {} {}", cur.name, cur.symbol);
    }
    if !c.flag_url.is_empty() {
        println!("Flag: {}", c.flag_url);
    }
}

fn setup_tracing(level: &str, verbose: bool) {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("globex_core=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("globex_core={level},warn")))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
