//! Node monitoring and network configuration queries.

use serde::{Deserialize, Serialize};

use crate::client::{MxpClient, RpcError};

/// The node's bootstrap status: the most recent block it considers final
/// and when it saw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Bootstrap {
    pub block: String,
    pub timestamp: i64,
}

/// One chain the node currently follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ActiveChain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopping: Option<String>,
}

/// A protocol substitution the network activates at a fixed level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProtocolOverride {
    pub replaced_protocol: String,
    pub replacement_protocol: String,
}

impl MxpClient {
    /// Fetches the node's bootstrap status.
    ///
    /// `GET /monitor/bootstrapped`
    pub fn bootstrap(&self) -> Result<Bootstrap, RpcError> {
        self.get_json("/monitor/bootstrapped")
    }

    /// Fetches the git commit the node was built from.
    ///
    /// `GET /monitor/commit_hash`
    pub fn commit(&self) -> Result<String, RpcError> {
        self.get_json("/monitor/commit_hash")
    }

    /// Fetches the chains the node is currently following.
    ///
    /// `GET /monitor/active_chains`
    pub fn active_chains(&self) -> Result<Vec<ActiveChain>, RpcError> {
        self.get_json("/monitor/active_chains")
    }

    /// Fetches the network's user-activated protocol overrides.
    ///
    /// `GET /config/network/user_activated_protocol_overrides`
    pub fn protocol_overrides(&self) -> Result<Vec<ProtocolOverride>, RpcError> {
        self.get_json("/config/network/user_activated_protocol_overrides")
    }
}
