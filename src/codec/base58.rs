//! Prefix-tagged base58-check for addresses, keys, and hashes.
//!
//! Every human-readable identifier the node deals in (`tz1` accounts, `KT1`
//! contracts, `edpk` public keys, `B` block hashes) is base58 over a fixed
//! byte prefix plus the payload plus a four-byte checksum. The checksum is
//! the first four bytes of SHA-256 applied twice to the prefixed payload.
//!
//! The byte prefixes are a protocol constant: they are what makes a 20-byte
//! account payload render starting with `tz1` instead of arbitrary base58.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// A recognized identifier prefix: its human-readable form, the bytes
/// injected before base58-check, and the payload length it tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    /// The leading characters of the rendered text, e.g. `tz1`.
    pub human: &'static str,
    /// The bytes prepended to the payload before encoding.
    pub bytes: &'static [u8],
    /// The payload length in bytes this prefix tags.
    pub payload_len: usize,
}

/// Implicit account addresses (ed25519 public key hashes), 20-byte payload.
pub const TZ1: Prefix = Prefix {
    human: "tz1",
    bytes: &[0x06, 0xa1, 0x9f],
    payload_len: 20,
};

/// Originated contract addresses, 20-byte payload.
pub const KT1: Prefix = Prefix {
    human: "KT1",
    bytes: &[0x02, 0x5a, 0x79],
    payload_len: 20,
};

/// Ed25519 public keys, 32-byte payload.
pub const EDPK: Prefix = Prefix {
    human: "edpk",
    bytes: &[0x0d, 0x0f, 0x25, 0xd9],
    payload_len: 32,
};

/// Block hashes, 32-byte payload.
pub const BRANCH: Prefix = Prefix {
    human: "B",
    bytes: &[0x01, 0x34],
    payload_len: 32,
};

/// Ed25519 signatures, 64-byte payload.
pub const EDSIG: Prefix = Prefix {
    human: "edsig",
    bytes: &[0x09, 0xf5, 0xcd, 0x86, 0x12],
    payload_len: 64,
};

/// Operation hashes, 32-byte payload.
pub const OPERATION: Prefix = Prefix {
    human: "o",
    bytes: &[0x05, 0x74],
    payload_len: 32,
};

/// Chain identifiers, 4-byte payload.
pub const CHAIN_ID: Prefix = Prefix {
    human: "Net",
    bytes: &[0x57, 0x52, 0x00],
    payload_len: 4,
};

/// Errors from encoding or stripping a base58-check identifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Base58CheckError {
    /// The payload handed to the encoder was not valid hex.
    #[error("failed to encode to base58: payload is not valid hex")]
    EncodeFailed(#[source] hex::FromHexError),
    /// The text was not valid base58-check: bad alphabet, too short, or a
    /// checksum that does not match the body.
    #[error("failed to decode payload: {text}")]
    DecodeFailed { text: String },
    /// The decoded bytes do not start with the expected byte prefix.
    #[error("payload did not match prefix {expected}")]
    PrefixMismatch { expected: &'static str },
}

/// First four bytes of `SHA-256(SHA-256(data))`.
fn checksum(data: &[u8]) -> [u8; 4] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Encodes a hex payload under `prefix` as base58-check text.
///
/// # Examples
///
/// ```
/// use mxp_client::codec::base58;
///
/// let text = base58::encode("08ba0cb2fad622697145cf1665124096d25bc31e", &base58::TZ1).unwrap();
/// assert_eq!(text, "tz1LSAycAVcNdYnXCy18bwVksXci8gUC2YpA");
/// ```
pub fn encode(payload_hex: &str, prefix: &Prefix) -> Result<String, Base58CheckError> {
    let payload = hex::decode(payload_hex).map_err(Base58CheckError::EncodeFailed)?;
    let mut buf = Vec::with_capacity(prefix.bytes.len() + payload.len() + 4);
    buf.extend_from_slice(prefix.bytes);
    buf.extend_from_slice(&payload);
    let sum = checksum(&buf);
    buf.extend_from_slice(&sum);
    Ok(bs58::encode(buf).into_string())
}

/// Decodes base58-check text and strips `prefix`, returning the payload as
/// lowercase hex.
///
/// Fails with [`Base58CheckError::DecodeFailed`] if the text is not valid
/// base58-check, and [`Base58CheckError::PrefixMismatch`] if it decodes under
/// a different prefix than the caller expected.
pub fn strip_prefix(text: &str, prefix: &Prefix) -> Result<String, Base58CheckError> {
    let decode_failed = || Base58CheckError::DecodeFailed {
        text: text.to_string(),
    };

    let bytes = bs58::decode(text).into_vec().map_err(|_| decode_failed())?;
    if bytes.len() < prefix.bytes.len() + 4 {
        return Err(decode_failed());
    }
    let (body, sum) = bytes.split_at(bytes.len() - 4);
    if checksum(body) != sum {
        return Err(decode_failed());
    }
    let payload = body
        .strip_prefix(prefix.bytes)
        .ok_or(Base58CheckError::PrefixMismatch {
            expected: prefix.human,
        })?;
    Ok(hex::encode(payload))
}
