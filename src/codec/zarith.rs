//! The Zarith variable-length integer codec.
//!
//! Zarith is a base-128 varint, least-significant group first: each byte
//! carries seven value bits, and the high bit says "more bytes follow". The
//! forged wire form renders the bytes as lowercase hex. Zero is exactly
//! `"00"`, and every encoding uses the minimal number of bytes,
//! `ceil(bitlen(n) / 7)` with a floor of one.
//!
//! The encoder operates on the magnitude of its input. The protocol's use
//! sites (fees, counters, limits, amounts, balances) are all non-negative,
//! and the operation validator rejects negatives before they reach this
//! layer, but a negative handed directly to [`encode`] is encoded by
//! magnitude rather than panicking.

use num_bigint::BigUint;
use thiserror::Error;

use crate::model::BigInt;

/// Errors from walking or decoding a Zarith field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZarithError {
    /// A byte pair in the stream was not valid hex.
    #[error("malformed zarith: invalid hex at character {offset}")]
    InvalidHex { offset: usize },
    /// The stream ended before a byte with a clear high bit appeared.
    #[error("malformed zarith: no terminating byte before the stream ended")]
    Unterminated,
    /// The input held no bytes at all.
    #[error("malformed zarith: empty input")]
    Empty,
}

/// Encodes the magnitude of `value` as lowercase Zarith hex.
pub fn encode(value: &BigInt) -> String {
    // Base-128 digits are exactly the seven-bit groups, least significant
    // first; only the continuation bits are left to set.
    let mut digits = value.0.magnitude().to_radix_le(0x80);
    let last = digits.len() - 1;
    for digit in &mut digits[..last] {
        *digit |= 0x80;
    }
    hex::encode(digits)
}

/// Decodes a complete Zarith hex field back into an integer.
///
/// The input must be exactly one Zarith value, as carved out of a stream by
/// [`end_index`].
pub fn decode(hex_str: &str) -> Result<BigInt, ZarithError> {
    if hex_str.is_empty() {
        return Err(ZarithError::Empty);
    }
    let bytes = hex::decode(hex_str).map_err(|_| ZarithError::InvalidHex { offset: 0 })?;
    let groups: Vec<u8> = bytes.iter().map(|b| b & 0x7f).collect();
    let magnitude =
        BigUint::from_radix_le(&groups, 0x80).unwrap_or_default();
    Ok(BigInt(magnitude.into()))
}

/// Finds where the Zarith value at the head of `hex_str` ends.
///
/// Walks the stream two characters at a time and stops at the first byte
/// whose high bit is clear. Returns the one-past-the-end character index,
/// suitable for slicing the value off the front of the stream.
pub fn end_index(hex_str: &str) -> Result<usize, ZarithError> {
    let mut offset = 0;
    while offset + 2 <= hex_str.len() {
        let pair = hex_str
            .get(offset..offset + 2)
            .ok_or(ZarithError::InvalidHex { offset })?;
        let byte =
            u8::from_str_radix(pair, 16).map_err(|_| ZarithError::InvalidHex { offset })?;
        offset += 2;
        if byte & 0x80 == 0 {
            return Ok(offset);
        }
    }
    Err(ZarithError::Unterminated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn encodes_known_vector() {
        assert_eq!(encode(&big(302_393)), "b9ba12");
    }

    #[test]
    fn encodes_zero_as_one_byte() {
        assert_eq!(encode(&big(0)), "00");
    }

    #[test]
    fn encodes_negative_by_magnitude() {
        // Negatives never survive validation, but the low-level encoder
        // must not panic on them.
        assert_eq!(encode(&big(-302_393)), "b9ba12");
    }

    #[test]
    fn decodes_known_vector() {
        assert_eq!(decode("b9ba12").unwrap(), big(302_393));
        assert_eq!(decode("00").unwrap(), big(0));
    }

    #[test]
    fn decode_masks_continuation_bits() {
        // A terminating zero byte after two continuation bytes: the seven-bit
        // groups still reassemble positionally.
        assert_eq!(decode("b9ba00").unwrap(), big(7_481));
    }

    #[test]
    fn roundtrip_is_identity_for_non_negatives() {
        for v in [0i64, 1, 10, 30, 127, 128, 10_100, 302_393, 328_763_282, i64::MAX] {
            let n = big(v);
            assert_eq!(decode(&encode(&n)).unwrap(), n, "value {}", v);
        }
    }

    #[test]
    fn encoded_length_is_ceil_bitlen_over_seven() {
        for v in [1i64, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152] {
            let n = big(v);
            let bitlen = 64 - (v as u64).leading_zeros() as usize;
            let expected_bytes = bitlen.div_ceil(7);
            assert_eq!(encode(&n).len(), expected_bytes * 2, "value {}", v);
        }
    }

    #[test]
    fn end_index_stops_at_first_clear_high_bit() {
        // 0x08 terminates immediately.
        assert_eq!(end_index("08ba0cb2fad622697145cf1665124096d25bc31e").unwrap(), 2);
        // Two continuation bytes, then 0x12 terminates.
        assert_eq!(end_index("b9ba12f44e").unwrap(), 6);
    }

    #[test]
    fn end_index_rejects_non_hex() {
        assert!(matches!(
            end_index("^^^^^^---()*97145cf1665124096d25bc31e"),
            Err(ZarithError::InvalidHex { offset: 0 })
        ));
    }

    #[test]
    fn end_index_rejects_unterminated_stream() {
        // Every byte has its high bit set.
        assert_eq!(end_index("b9ba"), Err(ZarithError::Unterminated));
        assert_eq!(end_index(""), Err(ZarithError::Unterminated));
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(decode(""), Err(ZarithError::Empty));
        assert!(decode("zz").is_err());
    }

    #[test]
    fn end_index_never_panics_on_non_ascii() {
        assert!(end_index("日本語").is_err());
    }
}
