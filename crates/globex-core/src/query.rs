// crates/globex-core/src/query.rs

//! # Query Engine
//!
//! Search, region filter and sort over an in-memory collection. Pure: the
//! input slice is only borrowed and a fresh `Vec` of references is returned.
//! The order of stages is fixed: search, region, then sort.
//!
//! Search is a case-insensitive substring match on the name. Name ordering
//! uses the folded key so accented names sort next to their base letter.

use crate::model::CanonicalCountry;
use crate::text::fold_key;
use crate::traits::NameMatch;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Sentinel accepted by [`RegionFilter::from_str`] for "no region filter".
pub const ALL_REGIONS: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ascending by name, accent-insensitive.
    #[default]
    Name,
    NameDesc,
    /// Most populous first.
    Population,
    PopulationAsc,
    /// Unknown key: keep input order.
    Unsorted,
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "name" => SortKey::Name,
            "name-desc" => SortKey::NameDesc,
            "population" => SortKey::Population,
            "population-asc" => SortKey::PopulationAsc,
            _ => SortKey::Unsorted,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Name => "name",
            SortKey::NameDesc => "name-desc",
            SortKey::Population => "population",
            SortKey::PopulationAsc => "population-asc",
            SortKey::Unsorted => "unsorted",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    All,
    /// Exact match against `CanonicalCountry::region`.
    Only(String),
}

impl FromStr for RegionFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.is_empty() || s.eq_ignore_ascii_case(ALL_REGIONS) {
            RegionFilter::All
        } else {
            RegionFilter::Only(s.to_string())
        })
    }
}

impl RegionFilter {
    fn admits(&self, country: &CanonicalCountry) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(region) => country.region == *region,
        }
    }
}

/// The current `(search, region, sort)` state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub search: String,
    pub region: RegionFilter,
    pub sort: SortKey,
}

impl Query {
    pub fn new(search: impl Into<String>, region: RegionFilter, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            region,
            sort,
        }
    }

    /// Builds a query from the raw selector strings a UI would hand over.
    pub fn parse(search: &str, region: &str, sort: &str) -> Self {
        let region = region.parse::<RegionFilter>().unwrap_or_default();
        let sort = sort.parse::<SortKey>().unwrap_or_default();
        Self::new(search.trim(), region, sort)
    }

    pub fn apply<'a>(&self, collection: &'a [CanonicalCountry]) -> Vec<&'a CanonicalCountry> {
        filter_countries(collection, self)
    }
}

/// Runs the query over `collection`.
pub fn filter_countries<'a>(
    collection: &'a [CanonicalCountry],
    query: &Query,
) -> Vec<&'a CanonicalCountry> {
    let needle = query.search.trim();

    let mut out: Vec<&CanonicalCountry> = collection
        .iter()
        .filter(|c| needle.is_empty() || c.name_contains(needle))
        .filter(|c| query.region.admits(c))
        .collect();

    // `sort_by` is stable; ties keep their input order.
    match query.sort {
        SortKey::Name => out.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::NameDesc => out.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortKey::Population => out.sort_by(|a, b| b.population.cmp(&a.population)),
        SortKey::PopulationAsc => out.sort_by(|a, b| a.population.cmp(&b.population)),
        SortKey::Unsorted => {}
    }
    out
}

/// Positional-argument form of [`filter_countries`].
pub fn filter<'a>(
    collection: &'a [CanonicalCountry],
    search: &str,
    region: &str,
    sort: &str,
) -> Vec<&'a CanonicalCountry> {
    filter_countries(collection, &Query::parse(search, region, sort))
}

/// Locale-aware ordering approximation: folded keys first, raw text breaks ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold_key(a).cmp(&fold_key(b)).then_with(|| a.cmp(b))
}

/// Distinct region names, sorted, for populating a region selector.
pub fn regions(collection: &[CanonicalCountry]) -> Vec<&str> {
    collection
        .iter()
        .map(|c| c.region.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, code: &str, region: &str, population: u64) -> CanonicalCountry {
        CanonicalCountry {
            name: name.to_string(),
            alpha2_code: code[..2].to_string(),
            alpha3_code: code.to_string(),
            capital: "N/A".to_string(),
            region: region.to_string(),
            subregion: "N/A".to_string(),
            population,
            area: 0.0,
            flag_url: String::new(),
            languages: Vec::new(),
            currencies: Vec::new(),
            borders: BTreeSet::new(),
        }
    }

    fn sample() -> Vec<CanonicalCountry> {
        vec![
            country("United States", "USA", "Americas", 331_002_651),
            country("Germany", "DEU", "Europe", 83_240_525),
            country("United Kingdom", "GBR", "Europe", 67_215_293),
            country("Åland Islands", "ALA", "Europe", 29_458),
            country("United Arab Emirates", "ARE", "Asia", 9_890_400),
        ]
    }

    fn names(list: &[&CanonicalCountry]) -> Vec<String> {
        list.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn search_is_case_insensitive_and_sorted_ascending() {
        let data = sample();
        let out = filter(&data, "united", "all", "name");
        assert_eq!(
            names(&out),
            ["United Arab Emirates", "United Kingdom", "United States"]
        );
        let upper = filter(&data, "UNITED", "all", "name");
        assert_eq!(names(&out), names(&upper));
    }

    #[test]
    fn empty_search_matches_everything() {
        let data = sample();
        assert_eq!(filter(&data, "", "all", "name").len(), data.len());
    }

    #[test]
    fn region_filter_is_exact() {
        let data = sample();
        let out = filter(&data, "", "Europe", "name");
        assert_eq!(names(&out), ["Åland Islands", "Germany", "United Kingdom"]);
        assert!(filter(&data, "", "europe", "name").is_empty());
    }

    #[test]
    fn search_and_region_compose() {
        let data = sample();
        let out = filter(&data, "united", "Europe", "name");
        assert_eq!(names(&out), ["United Kingdom"]);
    }

    #[test]
    fn population_sorts_both_directions() {
        let data = sample();
        let desc = filter(&data, "", "all", "population");
        assert_eq!(desc.first().unwrap().alpha3_code, "USA");
        assert_eq!(desc.last().unwrap().alpha3_code, "ALA");

        let asc = filter(&data, "", "all", "population-asc");
        assert_eq!(asc.first().unwrap().alpha3_code, "ALA");
    }

    #[test]
    fn name_desc_reverses_name_order() {
        let data = sample();
        let mut asc = names(&filter(&data, "", "all", "name"));
        asc.reverse();
        assert_eq!(names(&filter(&data, "", "all", "name-desc")), asc);
    }

    #[test]
    fn unknown_sort_key_preserves_input_order() {
        let data = sample();
        let out = filter(&data, "", "all", "by-vibes");
        let expected: Vec<_> = data.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names(&out), expected);
    }

    #[test]
    fn filter_is_idempotent_and_leaves_input_untouched() {
        let data = sample();
        let snapshot = data.clone();
        let first = names(&filter(&data, "united", "all", "population"));
        let second = names(&filter(&data, "united", "all", "population"));
        assert_eq!(first, second);
        assert_eq!(data, snapshot);
    }

    #[test]
    fn accented_names_sort_by_folded_key() {
        let data = sample();
        let out = filter(&data, "", "Europe", "name");
        assert_eq!(out[0].name, "Åland Islands");
    }

    #[test]
    fn search_is_case_insensitive_but_accent_sensitive() {
        let data = sample();
        assert_eq!(names(&filter(&data, "åLAND", "all", "name")), ["Åland Islands"]);
        assert!(filter(&data, "aland", "all", "name").is_empty());
        assert!(filter(&data, "é", "all", "name").is_empty());
    }

    #[test]
    fn accented_term_does_not_match_plain_bundled_names() {
        let bundled = crate::loader::FallbackDataset::bundled().unwrap();
        assert!(filter(bundled.countries(), "é", "all", "name").is_empty());
        assert!(!filter(bundled.countries(), "e", "all", "name").is_empty());
    }

    #[test]
    fn region_list_is_distinct_and_sorted() {
        let data = sample();
        assert_eq!(regions(&data), ["Americas", "Asia", "Europe"]);
    }

    #[test]
    fn selector_strings_parse() {
        assert_eq!("ALL".parse::<RegionFilter>(), Ok(RegionFilter::All));
        assert_eq!("name-desc".parse::<SortKey>(), Ok(SortKey::NameDesc));
        assert_eq!("whatever".parse::<SortKey>(), Ok(SortKey::Unsorted));
    }
}
