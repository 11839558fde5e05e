// crates/globex-core/src/favorites.rs

//! # Favorites Store
//!
//! An ordered set of alpha-3 codes persisted under a single key as a JSON
//! array. Every mutation writes the whole set back before returning.

use crate::error::Result;
use crate::model::CanonicalCountry;
use crate::storage::{KeyValueStore, FAVORITES_KEY};
use std::fmt;
use tracing::{info, warn};

/// What a mutation did, for the user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

impl fmt::Display for FavoriteChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FavoriteChange::Added => "Added to favorites",
            FavoriteChange::Removed => "Removed from favorites",
        })
    }
}

#[derive(Debug)]
pub struct FavoritesStore<S: KeyValueStore> {
    store: S,
    codes: Vec<String>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Reads the persisted set. An absent or unparsable value starts empty.
    ///
    /// # Errors
    ///
    /// Only when the backend itself cannot be read.
    pub fn load(store: S) -> Result<Self> {
        let codes = match store.get(FAVORITES_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => dedupe(list),
                Err(e) => {
                    warn!(error = %e, "stored favorites are unreadable; starting empty");
                    Vec::new()
                }
            },
        };
        Ok(Self { store, codes })
    }

    /// Adds `code`. Already-present codes leave the set unchanged, but the set
    /// is still persisted and `Added` is still reported.
    pub fn add(&mut self, code: &str) -> Result<FavoriteChange> {
        let code = normalize_code(code);
        if !self.codes.contains(&code) {
            self.codes.push(code.clone());
        }
        self.persist()?;
        info!(%code, "added to favorites");
        Ok(FavoriteChange::Added)
    }

    pub fn remove(&mut self, code: &str) -> Result<FavoriteChange> {
        let code = normalize_code(code);
        self.codes.retain(|c| *c != code);
        self.persist()?;
        info!(%code, "removed from favorites");
        Ok(FavoriteChange::Removed)
    }

    pub fn toggle(&mut self, code: &str) -> Result<FavoriteChange> {
        if self.is_favorite(code) {
            self.remove(code)
        } else {
            self.add(code)
        }
    }

    pub fn is_favorite(&self, code: &str) -> bool {
        let code = normalize_code(code);
        self.codes.contains(&code)
    }

    /// Codes in insertion order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Favorite records in collection order; codes absent from `collection` are skipped.
    pub fn favorite_countries<'a>(
        &self,
        collection: &'a [CanonicalCountry],
    ) -> Vec<&'a CanonicalCountry> {
        collection
            .iter()
            .filter(|c| self.codes.iter().any(|code| *code == c.alpha3_code))
            .collect()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.codes)?;
        self.store.set(FAVORITES_KEY, &json)
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn dedupe(list: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(list.len());
    for code in list {
        let code = normalize_code(&code);
        if !code.is_empty() && !out.contains(&code) {
            out.push(code);
        }
    }
    out
}
