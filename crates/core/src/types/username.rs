//! Admin username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input string is empty (after trimming).
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace or control characters.
    #[error("username cannot contain whitespace or control characters")]
    InvalidCharacter,
}

/// An administrator login name.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed before validation
/// - Length: 1-80 characters
/// - No inner whitespace or control characters
///
/// ## Examples
///
/// ```
/// use wfa_core::Username;
///
/// assert!(Username::parse("wfa_admin").is_ok());
/// assert_eq!(Username::parse("  wfa_admin ").unwrap().as_str(), "wfa_admin");
///
/// assert!(Username::parse("").is_err());
/// assert!(Username::parse("two words").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Maximum length of a username (matches the `VARCHAR(80)` column).
    pub const MAX_LENGTH: usize = 80;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than 80
    /// characters, or contains whitespace/control characters.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("wfa_admin").is_ok());
        assert!(Username::parse("a").is_ok());
        assert!(Username::parse("mecanic.sef-2").is_ok());
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(Username::parse("\twfa_admin \n").unwrap().as_str(), "wfa_admin");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Username::parse(""), Err(UsernameError::Empty));
        assert_eq!(Username::parse("   "), Err(UsernameError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(Username::MAX_LENGTH + 1);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { .. })
        ));
        assert!(Username::parse(&"a".repeat(Username::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_parse_inner_whitespace() {
        assert_eq!(
            Username::parse("wfa admin"),
            Err(UsernameError::InvalidCharacter)
        );
    }

    #[test]
    fn test_serde_transparent() {
        let username = Username::parse("wfa_admin").unwrap();
        let json = serde_json::to_string(&username).unwrap();
        assert_eq!(json, "\"wfa_admin\"");
    }
}
