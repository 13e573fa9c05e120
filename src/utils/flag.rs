//! Boolean column parsing.
//!
//! Inventory and request files encode flags as `0`/`1`. Spreadsheet exports
//! sometimes produce `true`/`false` instead, so both spellings are accepted.

use serde::de::{self, Deserialize, Deserializer};

/// Parse a flag column value
///
/// # Examples
/// ```
/// use vlan_router::utils::flag::parse_flag;
///
/// assert_eq!(parse_flag("1"), Some(true));
/// assert_eq!(parse_flag(" 0 "), Some(false));
/// assert_eq!(parse_flag("TRUE"), Some(true));
/// assert_eq!(parse_flag("yes"), None);
/// ```
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// `deserialize_with` helper for flag columns
pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid flag value '{}', expected 0 or 1", raw)))
}
