//! Operation JSON structures: the `Operations` envelope and the `Contents`
//! tagged union.
//!
//! `Contents` is the value the forge codec consumes and the unforge codec
//! emits. On the JSON wire it is a single object discriminated by a lowercase
//! `"kind"` field; natively it is an enum with one variant per supported
//! kind. Header fields stay optional so that the validator, not the
//! deserializer, is the layer that reports what is missing, with every
//! problem aggregated into one error.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bigint::BigInt;
use super::block::{BalanceUpdate, OperationResult};

// ---------------------------------------------------------------------------
// OperationKind
// ---------------------------------------------------------------------------

/// Discriminant for the four operation kinds this codec supports.
///
/// The wire tag bytes are fixed by the protocol and observable by every
/// peer; the JSON form is the lowercase kind name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Value transfer between two addresses.
    Transaction,
    /// Publication of the public key behind an implicit account.
    Reveal,
    /// Creation of an originated (contract) account.
    Origination,
    /// (Re)assignment of an account's delegate.
    Delegation,
}

impl OperationKind {
    /// The one-byte tag that introduces this kind in the forged wire form.
    pub fn tag(self) -> u8 {
        match self {
            Self::Reveal => 0x6b,
            Self::Transaction => 0x6c,
            Self::Origination => 0x6d,
            Self::Delegation => 0x6e,
        }
    }

    /// Maps a wire tag byte back to its kind.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x6b => Some(Self::Reveal),
            0x6c => Some(Self::Transaction),
            0x6d => Some(Self::Origination),
            0x6e => Some(Self::Delegation),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transaction => write!(f, "transaction"),
            Self::Reveal => write!(f, "reveal"),
            Self::Origination => write!(f, "origination"),
            Self::Delegation => write!(f, "delegation"),
        }
    }
}

// ---------------------------------------------------------------------------
// Common header
// ---------------------------------------------------------------------------

/// The fields every operation kind carries: who pays, how much, and where the
/// operation sits in the account's sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OperationHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<BigInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<BigInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<BigInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_limit: Option<BigInt>,
}

impl OperationHeader {
    /// Builds a fully-populated header.
    pub fn new(
        source: impl Into<String>,
        fee: i64,
        counter: i64,
        gas_limit: i64,
        storage_limit: i64,
    ) -> Self {
        Self {
            source: Some(source.into()),
            fee: Some(fee.into()),
            counter: Some(counter.into()),
            gas_limit: Some(gas_limit.into()),
            storage_limit: Some(storage_limit.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-kind contents
// ---------------------------------------------------------------------------

/// A value transfer. Wire tag `0x6c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Transaction {
    #[serde(flatten)]
    pub header: OperationHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
}

/// A public key reveal. Wire tag `0x6b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Reveal {
    #[serde(flatten)]
    pub header: OperationHeader,
    /// The `edpk`-encoded public key being revealed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
}

/// A contract origination. Wire tag `0x6d`.
///
/// This codec only forges the delegated default-script shape: the delegate is
/// required and the script is the fixed manager-contract template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Origination {
    #[serde(flatten)]
    pub header: OperationHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<BigInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
}

/// A delegation. Wire tag `0x6e`. Withdrawals (no delegate) are unsupported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Delegation {
    #[serde(flatten)]
    pub header: OperationHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentsMetadata>,
}

// ---------------------------------------------------------------------------
// Contents
// ---------------------------------------------------------------------------

/// One protocol-level operation, discriminated by `kind` on the JSON wire.
///
/// Values are immutable once built; neither the codec nor the client mutates
/// them. Serialization emits only the fields the kind actually carries, and
/// deserialization dispatches on `kind` before reading anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Contents {
    Transaction(Transaction),
    Reveal(Reveal),
    Origination(Origination),
    Delegation(Delegation),
}

impl Contents {
    /// The kind discriminator of this value.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Transaction(_) => OperationKind::Transaction,
            Self::Reveal(_) => OperationKind::Reveal,
            Self::Origination(_) => OperationKind::Origination,
            Self::Delegation(_) => OperationKind::Delegation,
        }
    }

    /// The common header shared by every kind.
    pub fn header(&self) -> &OperationHeader {
        match self {
            Self::Transaction(c) => &c.header,
            Self::Reveal(c) => &c.header,
            Self::Origination(c) => &c.header,
            Self::Delegation(c) => &c.header,
        }
    }

    /// A copy with the node-set `metadata` cleared.
    pub fn without_metadata(&self) -> Contents {
        let mut copy = self.clone();
        match &mut copy {
            Self::Transaction(c) => c.metadata = None,
            Self::Reveal(c) => c.metadata = None,
            Self::Origination(c) => c.metadata = None,
            Self::Delegation(c) => c.metadata = None,
        }
        copy
    }

    /// Compares the input-bearing fields of two operations, ignoring
    /// metadata the node may have attached on its side.
    ///
    /// This is the equality the RPC-verified forge uses to decide whether
    /// the node forged what it was asked to forge.
    pub fn same_payload(&self, other: &Contents) -> bool {
        self.without_metadata() == other.without_metadata()
    }
}

/// Node-set metadata attached to a `Contents` inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentsMetadata {
    #[serde(default)]
    pub balance_updates: Vec<BalanceUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_result: Option<OperationResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_operation_results: Vec<InternalOperationResult>,
}

/// A result produced by an operation a contract emitted internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InternalOperationResult {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<OperationResult>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// A group of operations committed to one branch, as exchanged with the
/// node's forge, parse, preapply, and block endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Operations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub branch: String,
    pub contents: Vec<Contents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}
