// crates/globex-core/src/model.rs

//! # Canonical Model
//!
//! Every source schema is normalized into [`CanonicalCountry`]. Downstream code
//! (query engine, favorites, presentation) never sees the raw API shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Placeholder population used when a source provides neither population nor area.
pub const DEFAULT_POPULATION: u64 = 1_000_000;

/// Multiplier applied to area (km²) when population has to be estimated.
///
/// This is a display placeholder, not a demographic estimate.
pub const POPULATION_PER_KM2: f64 = 1_000.0;

pub const DEFAULT_CAPITAL: &str = "N/A";
pub const DEFAULT_REGION: &str = "Unknown";
pub const DEFAULT_SUBREGION: &str = "N/A";

/// `{code}` is replaced by the lower-cased alpha-2 code.
pub const FLAG_CDN_TEMPLATE: &str = "https://flagcdn.com/w320/{code}.png";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    pub symbol: String,
}

/// A country entry after normalization.
///
/// `alpha3_code` is the identifier used for favorites, borders and detail
/// lookups; it is unique within a loaded collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCountry {
    pub name: String,
    pub alpha2_code: String,
    pub alpha3_code: String,
    pub capital: String,
    pub region: String,
    pub subregion: String,
    pub population: u64,
    pub area: f64,
    pub flag_url: String,
    pub languages: Vec<Language>,
    pub currencies: Vec<Currency>,
    pub borders: BTreeSet<String>,
}

impl CanonicalCountry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alpha2(&self) -> &str {
        &self.alpha2_code
    }

    pub fn alpha3(&self) -> &str {
        &self.alpha3_code
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// First listed language, as shown on a card.
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(|l| l.name.as_str())
    }

    /// First listed currency, as shown on a card.
    pub fn primary_currency(&self) -> Option<&Currency> {
        self.currencies.first()
    }

    /// Case-insensitive match against either ISO code.
    pub fn has_code(&self, code: &str) -> bool {
        let code = code.trim();
        !code.is_empty()
            && (self.alpha2_code.eq_ignore_ascii_case(code)
                || self.alpha3_code.eq_ignore_ascii_case(code))
    }
}

/// Where a loaded collection came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// A live source answered; holds its URL.
    Source(String),
    /// Every live source failed and the bundled dataset was used.
    Bundled,
}

impl Origin {
    pub fn is_bundled(&self) -> bool {
        matches!(self, Self::Bundled)
    }
}

/// Result of a full-collection load.
#[derive(Clone, Debug)]
pub struct Loaded {
    pub countries: Vec<CanonicalCountry>,
    pub origin: Origin,
}

/// Simple aggregate statistics for the loaded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasStats {
    pub countries: usize,
    pub regions: usize,
    pub favorites: usize,
}
