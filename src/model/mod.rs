//! The JSON data model exchanged with the node.
//!
//! Everything in here follows the node's own vocabulary: field names match
//! the RPC documents, big integers travel as decimal strings, and the
//! operation union is discriminated by a lowercase `kind` tag.

pub mod bigint;
pub mod block;
pub mod operations;

pub use bigint::BigInt;
pub use block::{
    BalanceUpdate, Block, BlockId, Header, LevelInfo, MaxOperationListLength, Metadata, NodeError,
    OperationResult, TestChainStatus,
};
pub use operations::{
    Contents, ContentsMetadata, Delegation, InternalOperationResult, OperationHeader,
    OperationKind, Operations, Origination, Reveal, Transaction,
};
