// crates/globex-core/src/fetch.rs

//! # Endpoint Fallback Fetcher
//!
//! Tries an ordered list of sources one at a time and keeps the first that
//! answers 2xx with a usable JSON payload. A failed candidate is logged and
//! skipped, never retried. Full-list loads fall back to a static dataset;
//! single-country lookups use the same chain with a different arity.

use crate::config::{Config, Source};
use crate::error::{GlobexError, Result};
use crate::loader::FallbackDataset;
use crate::model::{CanonicalCountry, Loaded, Origin};
use crate::normalize::normalize_all;
use crate::raw::{parse_payload, Arity};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Single-country lookup flavours, mapped to `{base}/name/..` and `{base}/alpha/..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Name,
    Code,
}

impl LookupKind {
    fn segment(self) -> &'static str {
        match self {
            LookupKind::Name => "name",
            LookupKind::Code => "alpha",
        }
    }
}

pub struct Fetcher {
    client: Client,
    sources: Vec<Source>,
    lookup: Vec<Source>,
    fallback: Option<FallbackDataset>,
}

impl Fetcher {
    /// Builds a fetcher without a fallback dataset.
    ///
    /// # Errors
    ///
    /// Returns `GlobexError::Http` if the HTTP client cannot be created
    pub fn new(sources: Vec<Source>, lookup: Vec<Source>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("globex/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            sources,
            lookup,
            fallback: None,
        })
    }

    /// Builds a fetcher from configuration, including its fallback dataset.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fallback = FallbackDataset::from_config(&config.fallback)?;
        Ok(Self::new(
            config.sources.all.clone(),
            config.sources.lookup.clone(),
            config.fetch.timeout(),
        )?
        .with_fallback(fallback))
    }

    pub fn with_fallback(mut self, fallback: Option<FallbackDataset>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Loads the full collection from the first working source, else the
    /// fallback dataset.
    ///
    /// # Errors
    ///
    /// `GlobexError::DataUnavailable` when every source failed and no fallback
    /// dataset is configured.
    pub async fn load_all(&self) -> Result<Loaded> {
        if let Some((url, countries)) = self.first_success(&self.sources, Arity::Collection).await {
            return Ok(Loaded {
                countries,
                origin: Origin::Source(url),
            });
        }

        match &self.fallback {
            Some(dataset) => {
                warn!(
                    count = dataset.len(),
                    "all country sources failed; using bundled fallback data"
                );
                Ok(Loaded {
                    countries: dataset.countries().to_vec(),
                    origin: Origin::Bundled,
                })
            }
            None => Err(GlobexError::DataUnavailable {
                attempts: self.sources.len(),
            }),
        }
    }

    /// First country whose name matches `name` according to the lookup sources.
    pub async fn get_by_name(&self, name: &str) -> Result<CanonicalCountry> {
        self.lookup_one(LookupKind::Name, name).await
    }

    /// Country with the given alpha-2 or alpha-3 code.
    pub async fn get_by_code(&self, code: &str) -> Result<CanonicalCountry> {
        self.lookup_one(LookupKind::Code, code).await
    }

    async fn lookup_one(&self, kind: LookupKind, query: &str) -> Result<CanonicalCountry> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GlobexError::LookupNotFound(query.to_string()));
        }

        let candidates: Vec<Source> = self
            .lookup
            .iter()
            .filter_map(|base| match lookup_url(&base.url, kind, query) {
                Ok(url) => Some(Source::new(url, base.schema)),
                Err(e) => {
                    warn!(base = %base.url, error = %e, "skipping lookup base");
                    None
                }
            })
            .collect();

        self.first_success(&candidates, Arity::Single)
            .await
            .and_then(|(_, countries)| countries.into_iter().next())
            .ok_or_else(|| GlobexError::LookupNotFound(query.to_string()))
    }

    /// The fallback chain. Strictly sequential: the next candidate is only
    /// requested after the previous one has failed.
    async fn first_success(
        &self,
        candidates: &[Source],
        arity: Arity,
    ) -> Option<(String, Vec<CanonicalCountry>)> {
        let total = candidates.len();
        for (idx, source) in candidates.iter().enumerate() {
            info!("Trying endpoint {}/{}: {}", idx + 1, total, source.url);
            match self.attempt(source, arity).await {
                Ok(countries) => {
                    info!(
                        count = countries.len(),
                        url = %source.url,
                        "loaded countries"
                    );
                    return Some((source.url.clone(), countries));
                }
                Err(e) => warn!(error = %e, "source failed"),
            }
        }
        None
    }

    async fn attempt(&self, source: &Source, arity: Arity) -> Result<Vec<CanonicalCountry>> {
        let url = source.url.as_str();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| source_unreachable(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GlobexError::SourceRejected {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| source_unreachable(url, &e))?;
        let value: Value = serde_json::from_slice(&body).map_err(|e| malformed(url, e.to_string()))?;
        let raw = parse_payload(value, source.schema, arity).map_err(|reason| malformed(url, reason))?;

        let read = raw.len();
        let countries = normalize_all(raw);
        if countries.is_empty() && (arity == Arity::Single || read > 0) {
            return Err(malformed(url, format!("none of {read} records were usable")));
        }
        Ok(countries)
    }
}

/// `{base}/{name|alpha}/{query}`, with `query` percent-encoded as one path segment.
pub fn lookup_url(base: &str, kind: LookupKind, query: &str) -> Result<String> {
    let mut url = Url::parse(base).map_err(|e| GlobexError::Config(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| GlobexError::Config(format!("{base}: cannot be a base URL")))?
        .pop_if_empty()
        .push(kind.segment())
        .push(query);
    Ok(url.into())
}

fn source_unreachable(url: &str, e: &reqwest::Error) -> GlobexError {
    let reason = if e.is_timeout() {
        "timed out".to_string()
    } else {
        e.to_string()
    };
    GlobexError::SourceUnreachable {
        url: url.to_string(),
        reason,
    }
}

fn malformed(url: &str, reason: String) -> GlobexError {
    GlobexError::MalformedResponse {
        url: url.to_string(),
        reason,
    }
}
