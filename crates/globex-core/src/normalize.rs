// crates/globex-core/src/normalize.rs

//! # Schema Normalizer
//!
//! Pure, deterministic conversion `RawCountry -> CanonicalCountry`. Missing
//! optional fields get documented defaults; only a missing name or alpha-3
//! code rejects a record.

use crate::error::{GlobexError, Result};
use crate::model::{
    CanonicalCountry, Currency, Language, DEFAULT_CAPITAL, DEFAULT_POPULATION, DEFAULT_REGION,
    DEFAULT_SUBREGION, FLAG_CDN_TEMPLATE, POPULATION_PER_KM2,
};
use crate::raw::{FlagsRaw, OneOrMany, RawCountry, RawV2, RawV3, SchemaFamily};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

impl RawCountry {
    /// Normalize into the canonical shape, dispatching on the schema variant.
    pub fn normalize(self) -> Result<CanonicalCountry> {
        match self {
            RawCountry::V2(raw) => normalize_v2(raw),
            RawCountry::V3(raw) => normalize_v3(raw),
        }
    }
}

/// Convenience for callers holding an untyped JSON record.
pub fn normalize_value(value: Value, family: SchemaFamily) -> Result<CanonicalCountry> {
    RawCountry::from_value(value, family)?.normalize()
}

/// **Family A:** passthrough with renaming and defaults.
pub fn normalize_v2(raw: RawV2) -> Result<CanonicalCountry> {
    let name = non_empty(raw.name).ok_or(GlobexError::MissingField("name"))?;
    let alpha3 = non_empty(raw.alpha3_code).ok_or(GlobexError::MissingField("alpha3Code"))?;
    let alpha2 = non_empty(raw.alpha2_code);

    let flags = raw.flags.unwrap_or_default();
    let svg = non_empty(flags.svg).or_else(|| non_empty(raw.flag));
    let flag_url = resolve_flag_url(non_empty(flags.png).as_deref(), svg.as_deref(), alpha2.as_deref());

    let languages = raw
        .languages
        .unwrap_or_default()
        .into_iter()
        .filter_map(|l| non_empty(l.name))
        .map(|name| Language { name })
        .collect();

    let currencies = raw
        .currencies
        .unwrap_or_default()
        .into_iter()
        .filter_map(|c| {
            non_empty(c.name).map(|name| Currency {
                name,
                symbol: c.symbol.unwrap_or_default(),
            })
        })
        .collect();

    Ok(CanonicalCountry {
        name,
        alpha2_code: alpha2.map(|c| c.to_ascii_uppercase()).unwrap_or_default(),
        alpha3_code: alpha3.to_ascii_uppercase(),
        capital: first_capital(raw.capital.as_ref()),
        region: non_empty(raw.region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
        subregion: non_empty(raw.subregion).unwrap_or_else(|| DEFAULT_SUBREGION.to_string()),
        population: resolve_population(raw.population, raw.area),
        area: resolve_area(raw.area),
        flag_url,
        languages,
        currencies,
        borders: normalize_borders(raw.borders),
    })
}

/// **Family B:** flatten nested names, code→name maps and capital lists.
pub fn normalize_v3(raw: RawV3) -> Result<CanonicalCountry> {
    let names = raw.name.unwrap_or_default();
    let name = non_empty(names.common)
        .or_else(|| non_empty(names.official))
        .ok_or(GlobexError::MissingField("name"))?;
    let alpha3 = non_empty(raw.cca3).ok_or(GlobexError::MissingField("cca3"))?;
    let alpha2 = non_empty(raw.cca2);

    let FlagsRaw { png, svg } = raw.flags.unwrap_or_default();
    let flag_url = resolve_flag_url(
        non_empty(png).as_deref(),
        non_empty(svg).as_deref(),
        alpha2.as_deref(),
    );

    // Map iteration follows document order (serde_json `preserve_order`).
    let languages = raw
        .languages
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(_, v)| v.as_str().filter(|s| !s.is_empty()).map(str::to_owned))
        .map(|name| Language { name })
        .collect();

    let currencies = raw
        .currencies
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(code, v)| {
            let name = v
                .get("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .unwrap_or(code);
            let symbol = v
                .get("symbol")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            (!name.is_empty()).then_some(Currency { name, symbol })
        })
        .collect();

    Ok(CanonicalCountry {
        name,
        alpha2_code: alpha2.map(|c| c.to_ascii_uppercase()).unwrap_or_default(),
        alpha3_code: alpha3.to_ascii_uppercase(),
        capital: first_capital(raw.capital.as_ref()),
        region: non_empty(raw.region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
        subregion: non_empty(raw.subregion).unwrap_or_else(|| DEFAULT_SUBREGION.to_string()),
        population: resolve_population(raw.population, raw.area),
        area: resolve_area(raw.area),
        flag_url,
        languages,
        currencies,
        borders: normalize_borders(raw.borders),
    })
}

/// Flag URL policy, first match wins: PNG, SVG, CDN URL from the alpha-2 code,
/// empty string.
pub fn resolve_flag_url(png: Option<&str>, svg: Option<&str>, alpha2: Option<&str>) -> String {
    fn present(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }
    if let Some(url) = present(png).or_else(|| present(svg)) {
        return url.to_string();
    }
    match present(alpha2) {
        Some(code) => FLAG_CDN_TEMPLATE.replace("{code}", &code.to_ascii_lowercase()),
        None => String::new(),
    }
}

/// Placeholder population when the source has none: `area × 1000`, or
/// [`DEFAULT_POPULATION`] without a usable area. Not a real estimate.
///
/// Only a missing, negative or non-finite population counts as absent. An
/// explicit `0` is a reported value and is kept as `0`; it does not trigger
/// the area placeholder the way a falsy check would.
pub fn resolve_population(population: Option<f64>, area: Option<f64>) -> u64 {
    let usable = |v: Option<f64>| v.filter(|v| v.is_finite() && *v >= 0.0);
    if let Some(pop) = usable(population) {
        return pop.round() as u64;
    }
    match usable(area).filter(|a| *a > 0.0) {
        Some(area) => (area * POPULATION_PER_KM2).round() as u64,
        None => DEFAULT_POPULATION,
    }
}

fn resolve_area(area: Option<f64>) -> f64 {
    area.filter(|a| a.is_finite() && *a > 0.0).unwrap_or(0.0)
}

fn first_capital(capital: Option<&OneOrMany>) -> String {
    capital
        .and_then(OneOrMany::first)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CAPITAL)
        .to_string()
}

fn normalize_borders(borders: Option<Vec<String>>) -> BTreeSet<String> {
    borders
        .unwrap_or_default()
        .into_iter()
        .map(|b| b.trim().to_ascii_uppercase())
        .filter(|b| !b.is_empty())
        .collect()
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Normalizes a batch, dropping rejected records and later duplicates of an
/// alpha-3 code.
pub fn normalize_all(records: Vec<RawCountry>) -> Vec<CanonicalCountry> {
    let countries = records
        .into_iter()
        .filter_map(|raw| match raw.normalize() {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::debug!(error = %e, "dropping record");
                None
            }
        })
        .collect();
    dedupe_by_code(countries)
}

/// Keeps the first record for each alpha-3 code.
pub fn dedupe_by_code(countries: Vec<CanonicalCountry>) -> Vec<CanonicalCountry> {
    let mut seen = HashSet::with_capacity(countries.len());
    countries
        .into_iter()
        .filter(|c| {
            let fresh = seen.insert(c.alpha3_code.clone());
            if !fresh {
                tracing::debug!(code = %c.alpha3_code, "dropping duplicate country code");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v3(value: Value) -> CanonicalCountry {
        normalize_value(value, SchemaFamily::V3).unwrap()
    }

    fn v2(value: Value) -> CanonicalCountry {
        normalize_value(value, SchemaFamily::V2).unwrap()
    }

    #[test]
    fn v3_languages_keep_mapping_order() {
        let c = v3(json!({
            "name": {"common": "Canada", "official": "Canada"},
            "cca3": "CAN",
            "languages": {"eng": "English", "fra": "French"}
        }));
        let names: Vec<_> = c.languages.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["English", "French"]);
    }

    #[test]
    fn v3_order_is_document_order_not_key_order() {
        let c = v3(json!({
            "name": {"common": "Switzerland"},
            "cca3": "CHE",
            "languages": {"fra": "French", "gsw": "Swiss German", "ita": "Italian", "deu": "German"}
        }));
        let names: Vec<_> = c.languages.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["French", "Swiss German", "Italian", "German"]);
    }

    #[test]
    fn v3_flattens_currencies_capital_and_prefers_common_name() {
        let c = v3(json!({
            "name": {"common": "France", "official": "French Republic"},
            "cca2": "fr",
            "cca3": "fra",
            "capital": ["Paris"],
            "region": "Europe",
            "subregion": "Western Europe",
            "population": 67391582,
            "area": 551695.0,
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
            "borders": ["DEU", "BEL", "esp"]
        }));
        assert_eq!(c.name, "France");
        assert_eq!(c.alpha2_code, "FR");
        assert_eq!(c.alpha3_code, "FRA");
        assert_eq!(c.capital, "Paris");
        assert_eq!(c.population, 67_391_582);
        assert_eq!(
            c.currencies,
            vec![Currency {
                name: "Euro".into(),
                symbol: "€".into()
            }]
        );
        assert!(c.borders.contains("ESP"));
        assert_eq!(c.borders.len(), 3);
    }

    #[test]
    fn v3_falls_back_to_official_name() {
        let c = v3(json!({"name": {"official": "Republic of Chad"}, "cca3": "TCD"}));
        assert_eq!(c.name, "Republic of Chad");
    }

    #[test]
    fn flag_prefers_png_then_svg_then_cdn() {
        assert_eq!(
            resolve_flag_url(Some("a.png"), Some("a.svg"), Some("FR")),
            "a.png"
        );
        assert_eq!(resolve_flag_url(None, Some("a.svg"), Some("FR")), "a.svg");
        assert_eq!(
            resolve_flag_url(Some(""), None, Some("FR")),
            "https://flagcdn.com/w320/fr.png"
        );
        assert_eq!(resolve_flag_url(None, None, None), "");
    }

    #[test]
    fn record_without_flags_synthesizes_cdn_url() {
        let c = v2(json!({"name": "France", "alpha2Code": "fr", "alpha3Code": "FRA"}));
        assert!(c.flag_url.contains("fr"));
        assert_eq!(c.flag_url, "https://flagcdn.com/w320/fr.png");

        let none = v2(json!({"name": "Nowhere", "alpha3Code": "NWH"}));
        assert_eq!(none.flag_url, "");
    }

    #[test]
    fn v2_single_flag_string_is_used() {
        let c = v2(json!({
            "name": "Peru",
            "alpha2Code": "PE",
            "alpha3Code": "PER",
            "flag": "https://example.test/per.svg"
        }));
        assert_eq!(c.flag_url, "https://example.test/per.svg");
    }

    #[test]
    fn population_placeholders() {
        let from_area = v2(json!({"name": "A", "alpha3Code": "AAA", "area": 500}));
        assert_eq!(from_area.population, 500_000);

        let neither = v2(json!({"name": "B", "alpha3Code": "BBB"}));
        assert_eq!(neither.population, 1_000_000);
        assert_eq!(neither.area, 0.0);

        let explicit_zero = v2(json!({"name": "C", "alpha3Code": "CCC", "population": 0}));
        assert_eq!(explicit_zero.population, 0);

        assert_eq!(resolve_population(Some(-5.0), None), DEFAULT_POPULATION);
        // A reported zero is a value, not a gap: the area is not consulted.
        assert_eq!(resolve_population(Some(0.0), Some(500.0)), 0);
        assert_eq!(resolve_population(Some(f64::NAN), Some(500.0)), 500_000);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let c = v2(json!({"name": "Bouvet Island", "alpha3Code": "BVT", "region": ""}));
        assert_eq!(c.capital, "N/A");
        assert_eq!(c.region, "Unknown");
        assert_eq!(c.subregion, "N/A");
        assert!(c.languages.is_empty());
        assert!(c.borders.is_empty());
    }

    #[test]
    fn missing_identifier_is_rejected() {
        let err = normalize_value(json!({"name": "Ghost"}), SchemaFamily::V2).unwrap_err();
        assert!(matches!(err, GlobexError::MissingField("alpha3Code")));
    }

    #[test]
    fn normalization_is_deterministic() {
        let input = json!({
            "name": {"common": "Japan"},
            "cca2": "JP",
            "cca3": "JPN",
            "languages": {"jpn": "Japanese"},
            "currencies": {"JPY": {"name": "Japanese yen", "symbol": "¥"}}
        });
        assert_eq!(v3(input.clone()), v3(input));
    }

    #[test]
    fn batch_drops_bad_records_and_duplicates() {
        let raws = vec![
            RawCountry::from_value(json!({"name": "Chad", "alpha3Code": "TCD"}), SchemaFamily::V2)
                .unwrap(),
            RawCountry::from_value(json!({"name": "Chad again", "alpha3Code": "tcd"}), SchemaFamily::V2)
                .unwrap(),
            RawCountry::from_value(json!({"name": "Nameless"}), SchemaFamily::V2).unwrap(),
        ];
        let out = normalize_all(raws);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Chad");
    }
}
