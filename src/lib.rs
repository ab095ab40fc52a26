// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # mxp-client
//!
//! A client library for MXP nodes. The heart of the crate is the operation
//! codec: forging transfer, reveal, origination, and delegation operations
//! into the node's binary wire form, decoding such bytes back into
//! structured values, and validating operations before they are encoded.
//! Around the codec sit a base58-check address/key codec, the Zarith
//! variable-length integer codec, the node's JSON data model, and a thin
//! stateless RPC client.
//!
//! The wire format is a contract: every forged byte string here is
//! byte-exact against what the node's own forge endpoint produces for the
//! supported operation shapes, and [`MxpClient::forge_operation_with_rpc`]
//! enforces exactly that: it forges through the node and refuses the
//! result unless the local decoder agrees with what was requested.
//!
//! ## Layout
//!
//! - [`model`] — `Block`, `Operations`, `Contents`, and the big-integer
//!   JSON type the node speaks.
//! - [`codec`] — the leaves: Zarith, base58-check, boolean bytes.
//! - [`forge`] — the operation codec and its validator.
//! - [`rpc`] + [`MxpClient`] — HTTP endpoint wrappers over a pluggable
//!   transport.
//!
//! ## Forging locally
//!
//! ```
//! use mxp_client::forge::{forge_operation, unforge_operation};
//! use mxp_client::{Contents, OperationHeader, Transaction};
//!
//! let source = "tz1LSAycAVcNdYnXCy18bwVksXci8gUC2YpA";
//! let branch = "BLyvCRkxuTXkx1KeGvrcEXiPYj4p1tFxzvFDhoHE7SFKtmP1rbk";
//!
//! let transfer = Contents::Transaction(Transaction {
//!     header: OperationHeader::new(source, 10100, 10, 10100, 0),
//!     amount: Some(30.into()),
//!     destination: Some(source.into()),
//!     metadata: None,
//! });
//!
//! let forged = forge_operation(branch, &[transfer.clone()]).unwrap();
//! let (decoded_branch, decoded) = unforge_operation(&forged, false).unwrap();
//! assert_eq!(decoded_branch, branch);
//! assert_eq!(decoded, vec![transfer]);
//! ```
//!
//! Signing is out of scope: the codec produces unsigned forged bytes and
//! accepts forged bytes that may or may not carry a signature.

pub mod client;
pub mod codec;
pub mod forge;
pub mod model;
pub mod rpc;

pub use client::{HttpTransport, MxpClient, RpcError, Transport, TransportError};
pub use forge::validate::{Problem, ValidationError};
pub use forge::ForgeError;
pub use model::{
    BigInt, Block, BlockId, Contents, ContentsMetadata, Delegation, Header, NodeError,
    OperationHeader, OperationKind, Operations, Origination, Reveal, Transaction,
};
pub use rpc::ForgedOperation;
