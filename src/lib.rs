//! globex-rs
//!
//! Workspace host crate. Re-exports `globex-core` so the demos can use
//! `globex_rs::prelude::*`.

pub use globex_core::*;
