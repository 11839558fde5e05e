// crates/globex-core/src/locate.rs

//! "Find my country": reverse-geocode a coordinate pair, then resolve the
//! answer against the loaded collection.

use crate::config::GeolocationConfig;
use crate::error::{GlobexError, Result};
use crate::model::CanonicalCountry;
use crate::text::contains_ignore_case;
use crate::traits::NameMatch;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// The part of a reverse-geocode answer we care about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocode {
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

impl ReverseGeocode {
    pub fn new(code: Option<&str>, name: Option<&str>) -> Self {
        Self {
            country_code: code.map(str::to_string),
            country_name: name.map(str::to_string),
        }
    }

    fn code(&self) -> Option<&str> {
        self.country_code.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn name(&self) -> Option<&str> {
        self.country_name.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Device-side position failures, numbered as the platform reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl PositionError {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::PermissionDenied),
            2 => Some(Self::PositionUnavailable),
            3 => Some(Self::Timeout),
            _ => None,
        }
    }
}

impl From<PositionError> for GlobexError {
    fn from(e: PositionError) -> Self {
        match e {
            PositionError::PermissionDenied => GlobexError::GeolocationDenied,
            PositionError::PositionUnavailable => {
                GlobexError::GeolocationUnavailable("position unavailable".into())
            }
            PositionError::Timeout => GlobexError::GeolocationTimeout,
        }
    }
}

/// Matches a reverse-geocode answer to a country.
///
/// Code first (alpha-2 or alpha-3, case-insensitive), then exact name, then a
/// name substring in either direction.
///
/// # Errors
///
/// `GeolocationUnavailable` when the answer carries neither a code nor a name,
/// `LookupNotFound` when nothing in `collection` matches.
pub fn resolve_country<'a>(
    collection: &'a [CanonicalCountry],
    geocode: &ReverseGeocode,
) -> Result<&'a CanonicalCountry> {
    let code = geocode.code();
    let name = geocode.name();
    if code.is_none() && name.is_none() {
        return Err(GlobexError::GeolocationUnavailable(
            "could not determine country from location".into(),
        ));
    }

    if let Some(code) = code {
        if let Some(found) = collection.iter().find(|c| c.has_code(code)) {
            return Ok(found);
        }
        debug!(code, "no country with this code; trying the name");
    }

    if let Some(name) = name {
        let found = collection.iter().find(|c| c.is_named(name)).or_else(|| {
            collection
                .iter()
                .find(|c| c.name_contains(name) || contains_ignore_case(name, &c.name))
        });
        if let Some(found) = found {
            return Ok(found);
        }
    }

    Err(GlobexError::LookupNotFound(
        name.or(code).unwrap_or_default().to_string(),
    ))
}

/// Client for the reverse-geocode service.
pub struct Geolocator {
    client: Client,
    endpoint: String,
}

impl Geolocator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("globex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &GeolocationConfig, timeout: Duration) -> Result<Self> {
        Self::new(config.reverse_geocode_url.clone(), timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<ReverseGeocode> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(GlobexError::GeolocationUnavailable(format!(
                "coordinates out of range: {lat}, {lng}"
            )));
        }

        let url = Url::parse_with_params(
            &self.endpoint,
            &[("latitude", lat.to_string()), ("longitude", lng.to_string())],
        )
        .map_err(|e| GlobexError::Config(format!("{}: {e}", self.endpoint)))?;

        info!(lat, lng, "reverse geocoding");
        let response = self.client.get(url).send().await.map_err(geolocation_error)?;
        if !response.status().is_success() {
            return Err(GlobexError::GeolocationUnavailable(format!(
                "geocoder answered HTTP {}",
                response.status().as_u16()
            )));
        }
        let geocode: ReverseGeocode = response.json().await.map_err(geolocation_error)?;
        debug!(?geocode, "reverse geocode result");
        Ok(geocode)
    }

    /// Reverse-geocodes and resolves in one step.
    pub async fn locate<'a>(
        &self,
        collection: &'a [CanonicalCountry],
        lat: f64,
        lng: f64,
    ) -> Result<&'a CanonicalCountry> {
        let geocode = self.reverse_geocode(lat, lng).await?;
        resolve_country(collection, &geocode)
    }
}

fn geolocation_error(e: reqwest::Error) -> GlobexError {
    if e.is_timeout() {
        GlobexError::GeolocationTimeout
    } else {
        GlobexError::GeolocationUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn country(name: &str, a2: &str, a3: &str) -> CanonicalCountry {
        CanonicalCountry {
            name: name.to_string(),
            alpha2_code: a2.to_string(),
            alpha3_code: a3.to_string(),
            capital: "N/A".to_string(),
            region: "Europe".to_string(),
            subregion: "N/A".to_string(),
            population: 1,
            area: 1.0,
            flag_url: String::new(),
            languages: Vec::new(),
            currencies: Vec::new(),
            borders: BTreeSet::new(),
        }
    }

    fn sample() -> Vec<CanonicalCountry> {
        vec![
            country("United Kingdom of Great Britain and Northern Ireland", "GB", "GBR"),
            country("France", "FR", "FRA"),
            country("Germany", "DE", "DEU"),
        ]
    }

    #[test]
    fn code_match_wins_and_ignores_case() {
        let data = sample();
        let geo = ReverseGeocode::new(Some("fr"), Some("Germany"));
        assert_eq!(resolve_country(&data, &geo).unwrap().alpha3_code, "FRA");

        let geo = ReverseGeocode::new(Some("deu"), None);
        assert_eq!(resolve_country(&data, &geo).unwrap().alpha3_code, "DEU");
    }

    #[test]
    fn falls_back_to_name_substring_both_ways() {
        let data = sample();
        let geo = ReverseGeocode::new(Some("XX"), Some("united kingdom"));
        assert_eq!(resolve_country(&data, &geo).unwrap().alpha3_code, "GBR");

        let geo = ReverseGeocode::new(None, Some("Federal Republic of Germany"));
        assert_eq!(resolve_country(&data, &geo).unwrap().alpha3_code, "DEU");
    }

    #[test]
    fn name_match_keeps_accents_significant() {
        let mut data = sample();
        data.push(country("Curaçao", "CW", "CUW"));

        let geo = ReverseGeocode::new(None, Some("CURAÇAO"));
        assert_eq!(resolve_country(&data, &geo).unwrap().alpha3_code, "CUW");

        let geo = ReverseGeocode::new(None, Some("Curacao"));
        assert!(matches!(
            resolve_country(&data, &geo),
            Err(GlobexError::LookupNotFound(_))
        ));
    }

    #[test]
    fn empty_answer_is_unavailable() {
        let data = sample();
        let geo = ReverseGeocode::new(Some(" "), None);
        assert!(matches!(
            resolve_country(&data, &geo),
            Err(GlobexError::GeolocationUnavailable(_))
        ));
    }

    #[test]
    fn unmatched_answer_is_not_found() {
        let data = sample();
        let geo = ReverseGeocode::new(Some("JP"), Some("Japan"));
        assert!(matches!(
            resolve_country(&data, &geo),
            Err(GlobexError::LookupNotFound(q)) if q == "Japan"
        ));
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let geo: ReverseGeocode =
            serde_json::from_str(r#"{"countryCode":"DE","countryName":"Germany","city":"Berlin"}"#)
                .unwrap();
        assert_eq!(geo, ReverseGeocode::new(Some("DE"), Some("Germany")));
    }

    #[test]
    fn position_codes_map_to_distinct_errors() {
        assert!(matches!(
            GlobexError::from(PositionError::from_code(1).unwrap()),
            GlobexError::GeolocationDenied
        ));
        assert!(matches!(
            GlobexError::from(PositionError::from_code(3).unwrap()),
            GlobexError::GeolocationTimeout
        ));
        assert_eq!(PositionError::from_code(2), Some(PositionError::PositionUnavailable));
        assert_eq!(PositionError::from_code(9), None);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected_without_a_request() {
        let geo = Geolocator::new("http://127.0.0.1:1/geo", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            geo.reverse_geocode(91.0, 0.0).await,
            Err(GlobexError::GeolocationUnavailable(_))
        ));
    }
}
