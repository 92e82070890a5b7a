//! Token encoding for query-string injection.

use std::fmt;

/// A shared secret, percent-encoded for use in a query string.
///
/// Every character outside the unreserved set (`A-Z a-z 0-9 - _ . ~`) is
/// encoded, so the value is safe both in a query string and inside a quoted
/// nginx argument.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedToken(String);

impl EncodedToken {
    /// Encode a raw token. Empty tokens mean "no token".
    pub fn encode(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self(urlencoding::encode(raw).into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep secrets out of debug logs.
impl fmt::Debug for EncodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodedToken(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_reserved() {
        assert_eq!(EncodedToken::encode("abc&d").unwrap().as_str(), "abc%26d");
        assert_eq!(EncodedToken::encode("a b=c%").unwrap().as_str(), "a%20b%3Dc%25");
        assert_eq!(EncodedToken::encode("x/y?z#").unwrap().as_str(), "x%2Fy%3Fz%23");
    }

    #[test]
    fn test_unreserved_untouched() {
        assert_eq!(EncodedToken::encode("Az09-_.~").unwrap().as_str(), "Az09-_.~");
    }

    #[test]
    fn test_non_ascii() {
        assert_eq!(EncodedToken::encode("é").unwrap().as_str(), "%C3%A9");
    }

    #[test]
    fn test_empty_is_none() {
        assert!(EncodedToken::encode("").is_none());
    }

    #[test]
    fn test_debug_hides_value() {
        let token = EncodedToken::encode("secret").unwrap();
        assert_eq!(format!("{:?}", token), "EncodedToken(..)");
    }
}
