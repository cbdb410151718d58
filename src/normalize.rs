//! Canonicalization of free-text names into comparable matching keys.

/// Normalize a display name into its matching key: lowercase, strip
/// everything that is not a lowercase ASCII letter, collapse whitespace
/// runs to a single space, trim. Accented characters are dropped as
/// typed, not transliterated. Idempotent and total; a missing name is
/// the caller's empty string.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        for lc in ch.to_lowercase() {
            if lc.is_ascii_lowercase() {
                out.push(lc);
            } else if lc.is_whitespace() && !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
        }
    }
    let new_len = out.trim_end().len();
    out.truncate(new_len);
    out
}

/// Normalize an optional cell value, treating null as empty.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}
