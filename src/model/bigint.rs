//! Arbitrary-precision integers as the node speaks them.
//!
//! Every big-number field in the node's JSON (fees, counters, gas limits,
//! balances, amounts) is a **decimal string**, never a JSON number; the
//! values routinely exceed what a double can represent losslessly. [`BigInt`]
//! wraps an arbitrary-precision integer and implements exactly that wire
//! form: `"10100"` on the wire, full precision in memory.

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt as NumBigInt, ParseBigIntError};
use num_traits::Signed;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An arbitrary-precision signed integer with a JSON-string wire form.
///
/// The binary wire form inside forged operations is Zarith (see
/// [`crate::codec::zarith`]); this type only fixes the JSON side of the
/// contract. Round-trip through JSON is the identity for every value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BigInt(pub NumBigInt);

impl BigInt {
    /// Returns `true` if the value is strictly negative.
    ///
    /// The operation validator uses this to reject negative fees, counters,
    /// limits, amounts, and balances before they ever reach the Zarith
    /// encoder, which operates on magnitudes only.
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }
}

impl From<i64> for BigInt {
    fn from(v: i64) -> Self {
        Self(NumBigInt::from(v))
    }
}

impl From<NumBigInt> for BigInt {
    fn from(v: NumBigInt) -> Self {
        Self(v)
    }
}

impl FromStr for BigInt {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NumBigInt>().map(Self)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for BigInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<BigInt>()
            .map_err(|e| D::Error::custom(format!("invalid big integer {:?}: {}", s, e)))
    }
}
