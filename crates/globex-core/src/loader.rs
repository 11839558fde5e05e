// crates/globex-core/src/loader.rs

//! # Data Loader
//!
//! Handles the physical layer for fallback datasets (embedded bytes or a file,
//! optionally gzip-compressed) and hands records to the family-A normalizer.

use crate::config::FallbackConfig;
use crate::error::{GlobexError, Result};
use crate::model::CanonicalCountry;
use crate::normalize::normalize_all;
use crate::raw::{parse_payload, Arity, SchemaFamily};
use once_cell::sync::OnceCell;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Canonical-shaped dataset shipped inside the crate.
static BUNDLED_JSON: &str = include_str!("../data/fallback_countries.json");

// Parsed at most once per process.
static BUNDLED_CACHE: OnceCell<Vec<CanonicalCountry>> = OnceCell::new();

/// Static records served when every live source fails.
#[derive(Clone, Debug)]
pub struct FallbackDataset {
    countries: Vec<CanonicalCountry>,
}

impl FallbackDataset {
    /// The dataset compiled into the crate.
    pub fn bundled() -> Result<Self> {
        BUNDLED_CACHE
            .get_or_try_init(|| parse_dataset(BUNDLED_JSON.as_bytes()))
            .map(|countries| Self {
                countries: countries.clone(),
            })
    }

    /// Loads a dataset from a `.json` or `.json.gz` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = open_stream(path.as_ref())?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self {
            countries: parse_dataset(&bytes)?,
        })
    }

    /// Picks the dataset `config` asks for: an explicit `path` wins over
    /// `bundled`, and `None` means no fallback at all.
    pub fn from_config(config: &FallbackConfig) -> Result<Option<Self>> {
        match (&config.path, config.bundled) {
            (Some(path), _) => Self::from_path(path).map(Some),
            (None, true) => Self::bundled().map(Some),
            (None, false) => Ok(None),
        }
    }

    pub fn from_countries(countries: Vec<CanonicalCountry>) -> Self {
        Self { countries }
    }

    pub fn countries(&self) -> &[CanonicalCountry] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn into_countries(self) -> Vec<CanonicalCountry> {
        self.countries
    }
}

fn parse_dataset(bytes: &[u8]) -> Result<Vec<CanonicalCountry>> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let raw = parse_payload(value, SchemaFamily::V2, Arity::Collection).map_err(|reason| {
        GlobexError::MalformedResponse {
            url: "fallback dataset".to_string(),
            reason,
        }
    })?;
    Ok(normalize_all(raw))
}

/// Opens a file, buffers it, and wraps it in a Gzip decoder when the file
/// name ends in `.gz`.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GlobexError::Io(std::io::Error::new(
            e.kind(),
            format!("Dataset not found at {}: {}", path.display(), e),
        ))
    })?;

    let reader = BufReader::new(file);
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");

    if gzipped {
        #[cfg(feature = "compact")]
        {
            use flate2::read::GzDecoder;
            return Ok(Box::new(GzDecoder::new(reader)));
        }
        #[cfg(not(feature = "compact"))]
        {
            return Err(GlobexError::Config(format!(
                "{} is gzip-compressed but the 'compact' feature is disabled",
                path.display()
            )));
        }
    }

    Ok(Box::new(reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn bundled_dataset_parses_with_unique_codes() {
        let ds = FallbackDataset::bundled().unwrap();
        assert!(ds.len() >= 10);
        let mut codes: Vec<_> = ds.countries().iter().map(|c| c.alpha3_code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ds.len());
    }

    #[test]
    fn bundled_records_get_normalizer_defaults() {
        let ds = FallbackDataset::bundled().unwrap();
        let ata = ds
            .countries()
            .iter()
            .find(|c| c.alpha3_code == "ATA")
            .expect("antarctica is bundled");
        assert_eq!(ata.capital, "N/A");
        assert_eq!(ata.subregion, "N/A");
        // No population in the record: area × 1000.
        assert_eq!(ata.population, 14_000_000_000);
        assert_eq!(ata.flag_url, "https://flagcdn.com/w320/aq.png");
    }

    #[test]
    fn plain_file_loads_like_the_bundled_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("countries.json");
        fs::write(&path, BUNDLED_JSON).unwrap();

        let ds = FallbackDataset::from_path(&path).unwrap();
        assert_eq!(ds.countries(), FallbackDataset::bundled().unwrap().countries());
    }

    #[cfg(feature = "compact")]
    #[test]
    fn gzip_file_is_decoded_transparently() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let dir = tempdir().unwrap();
        let path = dir.path().join("countries.json.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(BUNDLED_JSON.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let ds = FallbackDataset::from_path(&path).unwrap();
        assert_eq!(ds.countries(), FallbackDataset::bundled().unwrap().countries());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = FallbackDataset::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, GlobexError::Io(_)));
    }

    #[test]
    fn config_path_takes_precedence_over_bundled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.json");
        fs::write(
            &path,
            r#"[{"name":"Iceland","alpha2Code":"IS","alpha3Code":"ISL","area":103000}]"#,
        )
        .unwrap();

        let config = FallbackConfig {
            bundled: true,
            path: Some(path),
        };
        let ds = FallbackDataset::from_config(&config).unwrap().unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.countries()[0].alpha3_code, "ISL");

        let bundled = FallbackDataset::from_config(&FallbackConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(bundled.len(), FallbackDataset::bundled().unwrap().len());

        let none = FallbackConfig {
            bundled: false,
            path: None,
        };
        assert!(FallbackDataset::from_config(&none).unwrap().is_none());
    }
}
