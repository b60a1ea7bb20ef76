//! Common utilities

use chrono::Utc;

/// Get current Unix timestamp in seconds
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Check that a name is non-empty and made only of ASCII decimal digits
pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Trim every trailing '/' from a path-like string
pub fn trim_trailing_slashes(s: &str) -> &str {
    s.trim_end_matches('/')
}

/// Trim a single leading '?' from a query string
pub fn trim_query_prefix(s: &str) -> &str {
    s.strip_prefix('?').unwrap_or(s)
}
