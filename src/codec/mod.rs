//! Wire-level codecs: hex-stream primitives, the Zarith varint, and
//! prefix-tagged base58-check.
//!
//! These are the leaves the operation codec in [`crate::forge`] is built
//! from. Everything here is pure and stateless.

pub mod base58;
pub mod binary;
pub mod zarith;

pub use base58::{Base58CheckError, Prefix};
pub use binary::BinaryError;
pub use zarith::ZarithError;
