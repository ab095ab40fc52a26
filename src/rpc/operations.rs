//! Operation endpoints: remote forging with local verification, parsing,
//! preapply, and injection.

use serde::Serialize;

use crate::client::{MxpClient, RpcError};
use crate::forge;
use crate::model::{Block, Contents, Operations};

/// A forged operation paired with its branch, as the parse endpoint wants it.
#[derive(Debug, Clone, Serialize)]
pub struct ForgedOperation {
    pub branch: String,
    /// The forged hex, signed or unsigned.
    pub data: String,
}

#[derive(Serialize)]
struct ForgeRequest<'a> {
    branch: &'a str,
    contents: &'a [Contents],
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    operations: &'a [ForgedOperation],
    check_signature: bool,
}

impl MxpClient {
    /// Forges operations through the node and verifies the result locally.
    ///
    /// `POST /chains/main/blocks/<blockhash>/helpers/forge/operations`
    ///
    /// The returned hex is only trusted after the local decoder has parsed
    /// it and the decoded contents compare equal, element by element, to
    /// what was requested (metadata excluded). A node that silently alters
    /// the transaction (different destination, different amount) is
    /// caught here rather than at signing time. On failure the node's hex
    /// rides along in the error so the caller can log it before discarding.
    pub fn forge_operation_with_rpc(
        &self,
        blockhash: &str,
        branch: &str,
        contents: &[Contents],
    ) -> Result<String, RpcError> {
        let request = ForgeRequest { branch, contents };
        let forged: String = self.post_json(
            &format!("/chains/main/blocks/{}/helpers/forge/operations", blockhash),
            &request,
        )?;

        let decoded = match forge::unforge_operation(&forged, false) {
            Ok((_branch, decoded)) => decoded,
            Err(source) => return Err(RpcError::ForgeUnverifiable { forged, source }),
        };
        let matches = decoded.len() == contents.len()
            && decoded
                .iter()
                .zip(contents)
                .all(|(ours, theirs)| ours.same_payload(theirs));
        if !matches {
            return Err(RpcError::ForgeMismatch { forged });
        }
        Ok(forged)
    }

    /// Asks the node to parse forged bytes back into structured operations.
    ///
    /// `POST /chains/main/blocks/<blockhash>/helpers/parse/operations`
    ///
    /// The remote mirror of [`forge::unforge_operation`]; useful for
    /// cross-checking in the other direction.
    pub fn parse_operations_with_rpc(
        &self,
        blockhash: &str,
        operations: &[ForgedOperation],
        check_signature: bool,
    ) -> Result<Vec<Operations>, RpcError> {
        let request = ParseRequest {
            operations,
            check_signature,
        };
        self.post_json(
            &format!("/chains/main/blocks/{}/helpers/parse/operations", blockhash),
            &request,
        )
    }

    /// Simulates operations against a block's context without injecting.
    ///
    /// `POST /chains/main/blocks/<blockhash>/helpers/preapply/operations`
    ///
    /// Each `Operations` document carries its own branch, protocol,
    /// contents, and signature. The node answers with the same documents
    /// annotated with metadata and results.
    pub fn preapply_operations(
        &self,
        blockhash: &str,
        operations: &[Operations],
    ) -> Result<Vec<Operations>, RpcError> {
        self.post_json(
            &format!(
                "/chains/main/blocks/{}/helpers/preapply/operations",
                blockhash
            ),
            &operations,
        )
    }

    /// Injects a signed operation and returns its hash.
    ///
    /// `POST /injection/operation`
    pub fn inject_operation(&self, signed_operation: &str) -> Result<String, RpcError> {
        self.post_json("/injection/operation", &signed_operation)
    }

    /// Injects a block and returns the node's raw response.
    ///
    /// `POST /injection/block`
    pub fn inject_block(&self, block: &Block) -> Result<Vec<u8>, RpcError> {
        let payload = serde_json::to_vec(block).map_err(RpcError::Decode)?;
        self.post("/injection/block", payload)
    }
}
