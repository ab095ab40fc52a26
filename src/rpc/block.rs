//! Block queries.

use crate::client::{MxpClient, RpcError};
use crate::model::{Block, BlockId};

impl MxpClient {
    /// Fetches the chain head.
    ///
    /// `GET /chains/main/blocks/head`
    pub fn head(&self) -> Result<Block, RpcError> {
        self.get_json("/chains/main/blocks/head")
    }

    /// Fetches a block by level or hash.
    ///
    /// `GET /chains/main/blocks/<id>`
    pub fn block(&self, id: &BlockId) -> Result<Block, RpcError> {
        self.get_json(&format!("/chains/main/blocks/{}", id))
    }

    /// Fetches the hashes of every operation in a block, grouped by
    /// validation pass.
    ///
    /// `GET /chains/main/blocks/<blockhash>/operation_hashes`
    pub fn operation_hashes(&self, blockhash: &str) -> Result<Vec<Vec<String>>, RpcError> {
        self.get_json(&format!(
            "/chains/main/blocks/{}/operation_hashes",
            blockhash
        ))
    }
}
