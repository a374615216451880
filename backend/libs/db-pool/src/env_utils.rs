//! Environment variable parsing utilities
//!
//! Missing variables fall back to a default; present but malformed values
//! are reported instead of being silently replaced.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when unset
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_or("PORT", 8080)?;
/// ```
pub fn parse_env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match parse_env_optional_raw(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

/// Read a required environment variable
pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, String> {
    let raw = parse_env_optional_raw(key)
        .ok_or_else(|| format!("Environment variable {} not found", key))?;
    raw.parse()
        .map_err(|_| format!("Failed to parse environment variable {}", key))
}

// Blank values count as unset
fn parse_env_optional_raw(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
