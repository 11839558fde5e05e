// crates/globex-core/src/text.rs

/// Convert a string into a folded key suitable for ordering.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Åland` -> `Aland`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use globex_core::text::fold_key;
///
/// assert_eq!(fold_key("Côte d'Ivoire"), "cote d'ivoire");
/// assert_eq!(fold_key("ÅLAND"), "aland");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Case-insensitive substring test. Accents are significant: `é` does not
/// match `e`. An empty needle matches everything.
///
/// ```rust
/// use globex_core::text::contains_ignore_case;
///
/// assert!(contains_ignore_case("United Kingdom", "KINGDOM"));
/// assert!(contains_ignore_case("Åland Islands", "ÅLAND"));
/// assert!(!contains_ignore_case("Aland", "åland"));
/// ```
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive equality; accents are significant.
pub fn equals_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Compact population label used on country cards: `1.2M`, `45.3K`, or the
/// plain number below one thousand.
///
/// ```rust
/// use globex_core::text::format_population;
///
/// assert_eq!(format_population(83_240_525), "83.2M");
/// assert_eq!(format_population(1_500), "1.5K");
/// assert_eq!(format_population(999), "999");
/// ```
pub fn format_population(pop: u64) -> String {
    if pop >= 1_000_000 {
        format!("{:.1}M", pop as f64 / 1_000_000.0)
    } else if pop >= 1_000 {
        format!("{:.1}K", pop as f64 / 1_000.0)
    } else {
        pop.to_string()
    }
}
