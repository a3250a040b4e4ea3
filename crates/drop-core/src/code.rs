//! Share code generation and validation
//!
//! A share code is 6 characters drawn uniformly from `[A-Z0-9]`, giving a
//! 36^6 (~2.2 billion) space. Codes are human-shareable and double as the
//! store key; the lifecycle controller checks for collisions rather than
//! assuming the birthday bound away.

use crate::{DropError, Result};
use rand::{rngs::OsRng, Rng};
use std::fmt;
use std::str::FromStr;

/// The code alphabet: uppercase letters and digits
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a share code in characters
pub const CODE_LENGTH: usize = 6;

/// A validated 6-character share code
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShareCode(String);

impl ShareCode {
    /// Generate a random share code
    pub fn generate() -> Self {
        let mut code = String::with_capacity(CODE_LENGTH);
        for _ in 0..CODE_LENGTH {
            let idx = OsRng.gen_range(0..CODE_ALPHABET.len());
            code.push(CODE_ALPHABET[idx] as char);
        }
        Self(code)
    }

    /// Parse user input into a share code
    ///
    /// Normalizes to uppercase and enforces exactly 6 characters from the
    /// code alphabet, rejecting malformed input before any store query.
    pub fn parse(input: &str) -> Result<Self> {
        let code = input.trim().to_ascii_uppercase();
        if code.len() != CODE_LENGTH {
            return Err(DropError::InvalidCode(format!(
                "expected {} characters, got {}",
                CODE_LENGTH,
                code.len()
            )));
        }
        if !code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(DropError::InvalidCode(
                "codes use uppercase letters and digits only".to_string(),
            ));
        }
        Ok(Self(code))
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShareCode {
    type Err = DropError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShareCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_match_format() {
        for _ in 0..200 {
            let code = ShareCode::generate();
            assert_eq!(code.as_str().len(), CODE_LENGTH);
            assert!(code
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_parse_normalizes_case() {
        let code = ShareCode::parse("q9042y").unwrap();
        assert_eq!(code.as_str(), "Q9042Y");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let code = ShareCode::parse("  Q9042Y ").unwrap();
        assert_eq!(code.as_str(), "Q9042Y");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            ShareCode::parse("Q904"),
            Err(DropError::InvalidCode(_))
        ));
        assert!(matches!(
            ShareCode::parse("Q9042Y7"),
            Err(DropError::InvalidCode(_))
        ));
        assert!(matches!(ShareCode::parse(""), Err(DropError::InvalidCode(_))));
    }

    #[test]
    fn test_parse_rejects_bad_characters() {
        assert!(matches!(
            ShareCode::parse("Q90-2Y"),
            Err(DropError::InvalidCode(_))
        ));
        assert!(matches!(
            ShareCode::parse("Q90 2Y"),
            Err(DropError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_generate_roundtrips_through_parse() {
        let code = ShareCode::generate();
        let parsed = ShareCode::parse(code.as_str()).unwrap();
        assert_eq!(code, parsed);
    }
}
