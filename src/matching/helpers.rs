//! Similarity scoring helpers.

use strsim::levenshtein;

/// Levenshtein similarity as a percentage (0.0-100.0). Two empty
/// strings are identical, hence 100. Char-counted, not byte-counted,
/// though normalized keys are ASCII anyway.
pub(crate) fn sim_levenshtein_pct(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0;
    }
    let dist = levenshtein(a, b);
    (1.0 - (dist as f64 / max_len as f64)) * 100.0
}
