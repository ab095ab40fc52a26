//! Contract context queries.

use crate::client::{MxpClient, RpcError};
use crate::model::BigInt;

impl MxpClient {
    /// Fetches a contract's storage as the node returns it (Michelson
    /// JSON), undecoded.
    ///
    /// `GET /chains/main/blocks/<blockhash>/context/contracts/<address>/storage`
    pub fn contract_storage(&self, blockhash: &str, address: &str) -> Result<Vec<u8>, RpcError> {
        self.get(&format!(
            "/chains/main/blocks/{}/context/contracts/{}/storage",
            blockhash, address
        ))
    }

    /// Fetches an account's current counter. The next operation from the
    /// account must carry this value plus one.
    ///
    /// `GET /chains/main/blocks/<blockhash>/context/contracts/<address>/counter`
    pub fn counter(&self, blockhash: &str, address: &str) -> Result<BigInt, RpcError> {
        self.get_json(&format!(
            "/chains/main/blocks/{}/context/contracts/{}/counter",
            blockhash, address
        ))
    }
}
