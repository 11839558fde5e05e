// crates/globex-core/src/lib.rs

pub mod atlas;
pub mod config;
pub mod error;
pub mod favorites;
pub mod fetch;
pub mod loader; // Bundled / on-disk fallback dataset
pub mod locate;
pub mod model;
pub mod normalize;
pub mod query;
pub mod storage;
pub mod text;
pub mod theme;
pub mod traits;
// Raw source shapes (v2 / v3), only consumed by the normalizer
#[doc(hidden)]
pub mod raw;

// Re-exports
pub use crate::atlas::Atlas;
pub use crate::config::{Config, Source};
pub use crate::error::{GlobexError, Result};
pub use crate::favorites::{FavoriteChange, FavoritesStore};
pub use crate::fetch::{Fetcher, LookupKind};
pub use crate::loader::FallbackDataset;
pub use crate::locate::{resolve_country, Geolocator, PositionError, ReverseGeocode};
pub use crate::model::{AtlasStats, CanonicalCountry, Currency, Language, Loaded, Origin};
pub use crate::query::{filter, filter_countries, Query, RegionFilter, SortKey};
pub use crate::raw::SchemaFamily;
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
pub use crate::text::{fold_key, format_population};
pub use crate::theme::Theme;
pub use crate::traits::NameMatch;

/// Everything a typical caller needs: `use globex_core::prelude::*;`
pub mod prelude {
    pub use crate::atlas::Atlas;
    pub use crate::config::Config;
    pub use crate::error::{GlobexError, Result};
    pub use crate::favorites::FavoriteChange;
    pub use crate::fetch::Fetcher;
    pub use crate::loader::FallbackDataset;
    pub use crate::locate::{Geolocator, ReverseGeocode};
    pub use crate::model::{CanonicalCountry, Origin};
    pub use crate::query::{Query, RegionFilter, SortKey};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::text::format_population;
    pub use crate::traits::NameMatch;
}
