//! Period key helpers
//!
//! A period is a calendar month in the fixed textual form `YYYY-MM`. Lexical
//! order of valid keys equals chronological order, so the engine never parses
//! them for sorting; these helpers exist for validation and display only.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn period_regex() -> &'static Regex {
    static PERIOD_RE: OnceLock<Regex> = OnceLock::new();
    PERIOD_RE.get_or_init(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("valid period regex"))
}

/// True when `key` is a well-formed `YYYY-MM` period.
pub fn is_period_key(key: &str) -> bool {
    period_regex().is_match(key)
}

/// Short display label for a period.
///
/// # Examples
/// ```
/// use salescope::services::period::month_label;
///
/// assert_eq!(month_label("2025-08"), "Aug 2025");
/// assert_eq!(month_label("Unknown"), "Unknown");
/// ```
pub fn month_label(key: &str) -> String {
    if !is_period_key(key) {
        return key.to_string();
    }
    NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| key.to_string())
}
