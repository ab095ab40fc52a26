//! Low-level primitives over the hex-string wire form.
//!
//! The forged wire format is lowercase hex with no separators, and the
//! decoders walk it left to right. These helpers are the smallest pieces of
//! that walk: cutting a fixed-length field off the front, and reading the
//! one-byte boolean the grammar uses for "delegate present" and
//! "parameters present".

use thiserror::Error;

/// Errors from the fixed-shape primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinaryError {
    /// A boolean byte was neither `ff` nor `00`.
    #[error("boolean value is invalid: {found:?}")]
    InvalidBoolean { found: String },
}

/// Splits `payload` into its first `len` characters and the remainder.
///
/// When the payload is shorter than `len`, the whole payload is returned and
/// the remainder is empty; callers that need exactly `len` characters check
/// the length of the first half themselves.
pub fn split_rest(payload: &str, len: usize) -> (&str, &str) {
    // A cut point inside a multi-byte character means the input was never
    // hex; hand everything back and let the hex parse reject it.
    if payload.len() <= len || !payload.is_char_boundary(len) {
        (payload, "")
    } else {
        payload.split_at(len)
    }
}

/// Reads a boolean byte: `ff` is true, `00` is false, anything else fails.
pub fn parse_boolean(hex: &str) -> Result<bool, BinaryError> {
    match hex {
        "ff" | "FF" => Ok(true),
        "00" => Ok(false),
        other => Err(BinaryError::InvalidBoolean {
            found: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_rest_cuts_at_the_requested_length() {
        let (first, rest) = split_rest("08ba0cb2fad622697145cf1665124096d25bc31e", 15);
        assert_eq!(first, "08ba0cb2fad6226");
        assert_eq!(rest, "97145cf1665124096d25bc31e");
    }

    #[test]
    fn split_rest_returns_everything_when_too_short() {
        let (first, rest) = split_rest("08ba0cb2fad622697145cf1665124096d25bc31e", 300);
        assert_eq!(first, "08ba0cb2fad622697145cf1665124096d25bc31e");
        assert_eq!(rest, "");
    }

    #[test]
    fn split_rest_at_exact_length() {
        let (first, rest) = split_rest("abcd", 4);
        assert_eq!(first, "abcd");
        assert_eq!(rest, "");
    }

    #[test]
    fn split_rest_never_panics_on_non_ascii() {
        let (first, rest) = split_rest("日本語", 2);
        assert_eq!(first, "日本語");
        assert_eq!(rest, "");
    }

    #[test]
    fn boolean_bytes() {
        assert_eq!(parse_boolean("ff"), Ok(true));
        assert_eq!(parse_boolean("00"), Ok(false));
        assert!(matches!(
            parse_boolean("dssdf"),
            Err(BinaryError::InvalidBoolean { .. })
        ));
        assert!(parse_boolean("01").is_err());
    }
}
