// crates/globex-core/src/atlas.rs

//! # Atlas
//!
//! Application state in one place: the loaded collection, the active query,
//! favorites and the theme. A presentation layer owns one `Atlas` and drives
//! it through these methods.

use crate::error::{GlobexError, Result};
use crate::favorites::{FavoriteChange, FavoritesStore};
use crate::fetch::Fetcher;
use crate::locate::{resolve_country, ReverseGeocode};
use crate::model::{AtlasStats, CanonicalCountry, Origin};
use crate::query::{self, Query, RegionFilter, SortKey};
use crate::storage::KeyValueStore;
use crate::theme::Theme;
use tracing::info;

pub struct Atlas<S: KeyValueStore> {
    countries: Vec<CanonicalCountry>,
    origin: Option<Origin>,
    query: Query,
    favorites: FavoritesStore<S>,
    theme: Theme,
}

impl<S: KeyValueStore> Atlas<S> {
    /// Reads favorites and theme from `store`; the collection starts empty.
    pub fn new(store: S) -> Result<Self> {
        let theme = Theme::load(&store)?;
        let favorites = FavoritesStore::load(store)?;
        Ok(Self {
            countries: Vec::new(),
            origin: None,
            query: Query::default(),
            favorites,
            theme,
        })
    }

    /// Replaces the collection with a fresh load.
    ///
    /// On failure the previous collection is kept.
    pub async fn load(&mut self, fetcher: &Fetcher) -> Result<&Origin> {
        let loaded = fetcher.load_all().await?;
        info!(count = loaded.countries.len(), origin = ?loaded.origin, "collection replaced");
        Ok(self.replace_countries(loaded.countries, loaded.origin))
    }

    pub fn replace_countries(&mut self, countries: Vec<CanonicalCountry>, origin: Origin) -> &Origin {
        self.countries = countries;
        self.origin.insert(origin)
    }

    pub fn countries(&self) -> &[CanonicalCountry] {
        &self.countries
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn set_search(&mut self, search: &str) {
        self.query.search = search.trim().to_string();
    }

    pub fn set_region(&mut self, region: RegionFilter) {
        self.query.region = region;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.query.sort = sort;
    }

    /// The collection as the current query shows it.
    pub fn visible(&self) -> Vec<&CanonicalCountry> {
        self.query.apply(&self.countries)
    }

    /// Lookup by alpha-3 code (alpha-2 is accepted too).
    pub fn country(&self, code: &str) -> Option<&CanonicalCountry> {
        self.countries.iter().find(|c| c.has_code(code))
    }

    /// Bordering countries present in the collection, in collection order.
    pub fn neighbours(&self, country: &CanonicalCountry) -> Vec<&CanonicalCountry> {
        self.countries
            .iter()
            .filter(|c| country.borders.contains(&c.alpha3_code))
            .collect()
    }

    pub fn regions(&self) -> Vec<&str> {
        query::regions(&self.countries)
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn favorite_countries(&self) -> Vec<&CanonicalCountry> {
        self.favorites.favorite_countries(&self.countries)
    }

    pub fn add_favorite(&mut self, code: &str) -> Result<FavoriteChange> {
        self.favorites.add(code)
    }

    pub fn remove_favorite(&mut self, code: &str) -> Result<FavoriteChange> {
        self.favorites.remove(code)
    }

    pub fn toggle_favorite(&mut self, code: &str) -> Result<FavoriteChange> {
        self.favorites.toggle(code)
    }

    pub fn is_favorite(&self, code: &str) -> bool {
        self.favorites.is_favorite(code)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.theme.toggle(self.favorites.store_mut())
    }

    /// Resolves a reverse-geocode answer against the loaded collection.
    pub fn locate(&self, geocode: &ReverseGeocode) -> Result<&CanonicalCountry> {
        if self.countries.is_empty() {
            return Err(GlobexError::LookupNotFound(
                "no countries loaded".to_string(),
            ));
        }
        resolve_country(&self.countries, geocode)
    }

    pub fn stats(&self) -> AtlasStats {
        AtlasStats {
            countries: self.countries.len(),
            regions: self.regions().len(),
            favorites: self.favorites.len(),
        }
    }
}
