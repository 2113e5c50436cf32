//! matching.rs — Name matching primitives shared by scoring and the
//! post-confirmation expectation check.

use strsim::jaro_winkler;

use crate::observe::normalize_name;

/// Jaro–Winkler floor for the typo-tolerant equality used after
/// confirmation. Deliberately strict; it must never equate distinct cards.
const NEAR_EQUAL_MIN: f64 = 0.93;

/// Case-insensitive bidirectional substring containment over normalized
/// names. This is intentionally loose ("island" matches "island sanctuary"
/// in both directions) and is kept as-is for compatibility with the known
/// catalogs; see DESIGN.md before tightening.
pub fn fuzzy_match(a: &str, b: &str) -> bool {
    let a = normalize_name(a);
    let b = normalize_name(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Strict-ish equality with a small typo tolerance. Used only when checking
/// whether a new play fits an already confirmed deck, never while scoring.
pub fn near_equal(a: &str, b: &str) -> bool {
    let a = normalize_name(a);
    let b = normalize_name(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || jaro_winkler(&a, &b) >= NEAR_EQUAL_MIN
}
