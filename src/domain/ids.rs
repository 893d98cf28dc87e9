//! Domain identifier types with validation
//!
//! Newtype wrappers keep country codes from being mixed up with the many
//! other strings (row codes, column codes) flowing through the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO-style country code newtype wrapper
///
/// FIGARO uses two-letter ISO codes plus a small number of synthetic
/// aggregates such as `WRL_REST` (rest of world).
///
/// # Examples
///
/// ```
/// use figaro_nam::domain::ids::CountryCode;
/// use std::str::FromStr;
///
/// let de = CountryCode::from_str("DE").unwrap();
/// assert_eq!(de.as_str(), "DE");
/// assert!(CountryCode::from_str("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a new CountryCode from a string
    ///
    /// Accepts uppercase ASCII letters, digits and underscores, 2 to 8
    /// characters, covering both ISO codes and FIGARO aggregates.
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.len() < 2 || trimmed.len() > 8 {
            return Err(format!(
                "Country code must be 2-8 characters, got: {code:?}"
            ));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(format!(
                "Country code must be uppercase letters, digits or '_', got: {code:?}"
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_code_valid() {
        assert_eq!(CountryCode::new("DE").unwrap().as_str(), "DE");
        assert_eq!(CountryCode::new("WRL_REST").unwrap().as_str(), "WRL_REST");
        assert_eq!(CountryCode::new(" FR ").unwrap().as_str(), "FR");
    }

    #[test]
    fn test_country_code_invalid() {
        assert!(CountryCode::new("").is_err());
        assert!(CountryCode::new("D").is_err());
        assert!(CountryCode::new("de").is_err());
        assert!(CountryCode::new("TOO_LONG_CODE").is_err());
    }

    #[test]
    fn test_country_code_display() {
        let code = CountryCode::new("GR").unwrap();
        assert_eq!(format!("{code}"), "GR");
    }

    #[test]
    fn test_country_code_ordering() {
        let mut codes = vec![
            CountryCode::new("FR").unwrap(),
            CountryCode::new("AT").unwrap(),
            CountryCode::new("DE").unwrap(),
        ];
        codes.sort();
        assert_eq!(codes[0].as_str(), "AT");
        assert_eq!(codes[2].as_str(), "FR");
    }
}
