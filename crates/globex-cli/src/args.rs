use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for globex
#[derive(Debug, Parser)]
#[command(
    name = "globex",
    version,
    about = "Browse, search and bookmark countries from the REST Countries sources"
)]
pub struct CliArgs {
    /// Path to a config.toml (default: $GLOBEX_CONFIG, then the platform config dir)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Skip the network and use the fallback dataset only
    #[arg(long = "offline", global = true)]
    pub offline: bool,

    /// Keep favorites and theme in memory for this run only
    #[arg(long = "ephemeral", global = true)]
    pub ephemeral: bool,

    /// Verbose logging (debug level)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List countries, optionally searched, filtered and sorted
    List {
        /// Case-insensitive substring of the country name
        #[arg(short = 's', long = "search", default_value = "")]
        search: String,

        /// Exact region name (e.g. Europe), or "all"
        #[arg(short = 'r', long = "region", default_value = "all")]
        region: String,

        /// name | name-desc | population | population-asc
        #[arg(long = "sort", default_value = "name")]
        sort: String,
    },

    /// Show details and neighbours for a country (ISO2 or ISO3, case-insensitive)
    Show {
        /// ISO2 or ISO3 code (e.g. DE, USA)
        code: String,
    },

    /// Ask the lookup endpoints for a single country
    Lookup {
        #[command(subcommand)]
        by: LookupBy,
    },

    /// List the distinct regions in the loaded data
    Regions,

    /// Show a summary of the loaded data
    Stats,

    /// Manage favorite countries (default: list)
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Resolve a coordinate pair to a country
    Locate {
        /// Latitude in degrees (-90..=90)
        #[arg(long = "lat", allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees (-180..=180)
        #[arg(long = "lng", allow_hyphen_values = true)]
        lng: f64,
    },

    /// Show the stored theme preference, or toggle it
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum LookupBy {
    /// By (partial) country name
    Name { query: String },
    /// By ISO2 or ISO3 code
    Code { code: String },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    Add { code: String },
    Remove { code: String },
    Toggle { code: String },
}

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    Toggle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_defaults_to_all_regions_sorted_by_name() {
        let args = CliArgs::try_parse_from(["globex", "list"]).unwrap();
        match args.command {
            Commands::List {
                search,
                region,
                sort,
            } => {
                assert_eq!(search, "");
                assert_eq!(region, "all");
                assert_eq!(sort, "name");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let args = CliArgs::try_parse_from(["globex", "stats", "--offline", "-v"]).unwrap();
        assert!(args.offline);
        assert!(args.verbose);
        assert!(!args.ephemeral);
    }

    #[test]
    fn negative_coordinates_parse() {
        let args =
            CliArgs::try_parse_from(["globex", "locate", "--lat", "-33.86", "--lng", "151.2"])
                .unwrap();
        assert!(matches!(args.command, Commands::Locate { lat, .. } if lat < 0.0));
    }

    #[test]
    fn favorites_action_is_optional() {
        let args = CliArgs::try_parse_from(["globex", "favorites"]).unwrap();
        assert!(matches!(args.command, Commands::Favorites { action: None }));

        let args = CliArgs::try_parse_from(["globex", "favorites", "toggle", "USA"]).unwrap();
        assert!(matches!(
            args.command,
            Commands::Favorites {
                action: Some(FavoritesAction::Toggle { ref code })
            } if code == "USA"
        ));
    }
}
