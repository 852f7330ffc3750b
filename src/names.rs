//! Display name hygiene and fallback generation
//!
//! This module validates the display names carried on `createRoom` and
//! `joinRoom` payloads and produces friendly generated names for players
//! who join without one. Validation enforces a length cap, rejects empty
//! names, and filters inappropriate content.

use heck::ToTitleCase;
use rustrict::CensorStr;
use thiserror::Error;

use crate::constants::name::MAX_LENGTH;

/// Errors that can occur during name validation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Sinful,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
}

/// Validates and normalizes a requested display name
///
/// Whitespace is trimmed before the emptiness check, so a name made of
/// spaces is rejected rather than accepted verbatim.
///
/// # Errors
///
/// * [`Error::TooLong`] - name exceeds [`MAX_LENGTH`] bytes
/// * [`Error::Empty`] - name is empty after trimming whitespace
/// * [`Error::Sinful`] - name contains inappropriate content
pub fn clean(name: &str) -> Result<String, Error> {
    if name.len() > MAX_LENGTH {
        return Err(Error::TooLong);
    }
    let name = rustrict::trim_whitespace(name);
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    Ok(name.to_owned())
}

/// Generates a random adjective-animal display name in title case
pub fn generated() -> String {
    loop {
        if let Some(name) = petname::petname(2, " ") {
            return name.to_title_case();
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_clean_accepts_plain_name() {
        assert_eq!(clean("Somchai").unwrap(), "Somchai");
    }

    #[test]
    fn test_clean_trims_whitespace() {
        assert_eq!(clean("  Somchai  ").unwrap(), "Somchai");
    }

    #[test]
    fn test_clean_rejects_empty() {
        assert_eq!(clean(""), Err(Error::Empty));
        assert_eq!(clean("   "), Err(Error::Empty));
    }

    #[test]
    fn test_clean_rejects_too_long() {
        assert_eq!(clean(&"a".repeat(MAX_LENGTH + 1)), Err(Error::TooLong));
    }

    #[test]
    fn test_clean_allows_max_length() {
        assert!(clean(&"a".repeat(MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_clean_rejects_inappropriate() {
        assert_eq!(clean("fuck"), Err(Error::Sinful));
    }

    #[test]
    fn test_clean_accepts_unicode() {
        assert_eq!(clean("สมชาย").unwrap(), "สมชาย");
    }

    #[test]
    fn test_generated_is_two_title_case_words() {
        let name = generated();
        assert_eq!(name.matches(' ').count(), 1);
        assert!(name.chars().next().unwrap().is_uppercase());
    }
}
