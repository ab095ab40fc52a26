//! Block-level JSON structures returned by the node.
//!
//! These map the node's block document one-to-one. Unknown fields on inbound
//! JSON are ignored, and fields the node omits deserialize to their defaults,
//! so the model stays tolerant across protocol upgrades that only add data.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bigint::BigInt;
use super::operations::Operations;

// ---------------------------------------------------------------------------
// BlockId
// ---------------------------------------------------------------------------

/// Identifies a block in RPC paths: either by level or by hash.
///
/// The two cases are distinct constructors rather than a stringly-typed
/// parameter, so an id of the wrong shape is unrepresentable. `head` is not a
/// `BlockId`; use [`crate::MxpClient::head`] for the chain head.
///
/// # Examples
///
/// ```
/// use mxp_client::BlockId;
///
/// assert_eq!(BlockId::Level(50).to_string(), "50");
/// let id = BlockId::Hash("BLyvCRkxuTXkx1KeGvrcEXiPYj4p1tFxzvFDhoHE7SFKtmP1rbk".into());
/// assert!(id.to_string().starts_with('B'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockId {
    /// A block level (height).
    Level(i64),
    /// A base58-check block hash.
    Hash(String),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(level) => write!(f, "{}", level),
            Self::Hash(hash) => write!(f, "{}", hash),
        }
    }
}

// ---------------------------------------------------------------------------
// Block document
// ---------------------------------------------------------------------------

/// A full block as returned by `/chains/main/blocks/<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Block {
    pub protocol: String,
    pub chain_id: String,
    pub hash: String,
    pub header: Header,
    #[serde(default)]
    pub metadata: Metadata,
    /// Operations grouped into the block's validation passes.
    #[serde(default)]
    pub operations: Vec<Vec<Operations>>,
}

/// The header of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Header {
    pub level: i64,
    pub proto: i64,
    pub predecessor: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub validation_pass: i64,
    pub operations_hash: String,
    #[serde(default)]
    pub fitness: Vec<String>,
    pub context: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub proof_of_work_nonce: String,
    #[serde(default)]
    pub signature: String,
}

/// Block metadata set by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Metadata {
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub next_protocol: String,
    #[serde(default)]
    pub test_chain_status: TestChainStatus,
    #[serde(default)]
    pub max_operations_ttl: i64,
    #[serde(default)]
    pub max_operation_data_length: i64,
    #[serde(default)]
    pub max_block_header_length: i64,
    #[serde(default)]
    pub max_operation_list_length: Vec<MaxOperationListLength>,
    #[serde(default)]
    pub baker: String,
    #[serde(default)]
    pub level: LevelInfo,
    #[serde(default)]
    pub voting_period_kind: String,
    #[serde(default)]
    pub nonce_hash: Option<serde_json::Value>,
    #[serde(default)]
    pub consumed_gas: String,
    #[serde(default)]
    pub deactivated: Vec<String>,
    #[serde(default)]
    pub balance_updates: Vec<BalanceUpdate>,
}

/// Test chain status inside block metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TestChainStatus {
    #[serde(default)]
    pub status: String,
}

/// Per-pass operation list limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaxOperationListLength {
    pub max_size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_op: Option<i64>,
}

/// Cycle and voting position of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LevelInfo {
    pub level: i64,
    #[serde(default)]
    pub level_position: i64,
    #[serde(default)]
    pub cycle: i64,
    #[serde(default)]
    pub cycle_position: i64,
    #[serde(default)]
    pub voting_period: i64,
    #[serde(default)]
    pub voting_period_position: i64,
    #[serde(default)]
    pub expected_commitment: bool,
}

/// One entry in a `balance_updates` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BalanceUpdate {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(default)]
    pub change: Option<BigInt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
}

/// The result of applying one operation, set by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OperationResult {
    #[serde(default)]
    pub balance_updates: Vec<BalanceUpdate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub originated_contracts: Vec<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_gas: Option<BigInt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<NodeError>,
}

/// An error object as the node reports it, both inside operation results and
/// in the body of failed RPC responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NodeError {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}
