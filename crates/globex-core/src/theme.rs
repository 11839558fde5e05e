// crates/globex-core/src/theme.rs

//! Light/dark preference, persisted under the `theme` key.

use crate::error::Result;
use crate::storage::{KeyValueStore, THEME_KEY};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored value, or `Light` when absent or unrecognised.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(store
            .get(THEME_KEY)?
            .and_then(|v| v.parse().ok())
            .unwrap_or_default())
    }

    pub fn save<S: KeyValueStore + ?Sized>(self, store: &mut S) -> Result<()> {
        store.set(THEME_KEY, self.as_str())
    }

    /// Flips the theme and persists the new value.
    pub fn toggle<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Result<Theme> {
        *self = self.flipped();
        self.save(store)?;
        Ok(*self)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}
