// crates/globex-core/src/traits.rs
use crate::model::CanonicalCountry;
use crate::text::{contains_ignore_case, equals_ignore_case};

/// Name-based matching helpers for types that expose a canonical display name.
///
/// Comparisons ignore case only; accented letters must match exactly.
/// Implementors provide a `&str` view of their name via
/// [`NameMatch::name_str`], and get:
/// - [`NameMatch::is_named`]: case-insensitive equality
/// - [`NameMatch::name_contains`]: case-insensitive substring match
///
/// # Examples
/// ```rust
/// use globex_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Curaçao").is_named("CURAÇAO"));
/// assert!(!Place("Curaçao").is_named("curacao"));
/// assert!(Place("United Kingdom").name_contains("UNITED"));
/// ```
pub trait NameMatch {
    /// Returns the canonical display name used for matching.
    fn name_str(&self) -> &str;

    #[inline]
    fn is_named(&self, q: &str) -> bool {
        equals_ignore_case(self.name_str(), q)
    }

    /// An empty query matches everything.
    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        contains_ignore_case(self.name_str(), q)
    }
}

impl NameMatch for CanonicalCountry {
    fn name_str(&self) -> &str {
        &self.name
    }
}
