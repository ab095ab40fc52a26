//! The RPC client: one base URL, one transport, no state.
//!
//! [`MxpClient`] is a thin wrapper over a node's HTTP RPC surface. It holds
//! nothing but the base URL and a [`Transport`], caches nothing, and every
//! method is an idempotent request/response round trip, safe to share
//! across threads and to retry at the caller's discretion.
//!
//! The transport is a trait so the HTTP layer stays an external
//! collaborator: production code uses the bundled reqwest-backed
//! [`HttpTransport`], tests plug in an in-memory mock. Timeouts belong to
//! the transport; the default one applies [`DEFAULT_TIMEOUT`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::forge::ForgeError;
use crate::model::NodeError;

/// Request deadline applied by the default transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// The opaque HTTP seam: `get(url) -> bytes` and `post(url, body) -> bytes`.
///
/// Implementations return the raw response body on 2xx and
/// [`TransportError::Status`] (body included) otherwise, so the client can
/// surface the node's structured error objects.
pub trait Transport: Send + Sync {
    /// Performs a GET and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
    /// Performs a POST with a JSON body and returns the response body.
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// Errors from the HTTP layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never completed: connection, TLS, or timeout failure.
    #[error("http request failed")]
    Http(#[from] reqwest::Error),
    /// The node answered with a non-success status.
    #[error("node responded with status {status}")]
    Status { status: u16, body: Vec<u8> },
}

/// The default transport: a blocking reqwest client with a fixed deadline.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a transport with [`DEFAULT_TIMEOUT`].
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Builds a transport with a caller-chosen deadline.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn read_response(
        response: reqwest::blocking::Response,
    ) -> Result<Vec<u8>, TransportError> {
        let status = response.status();
        let body = response.bytes()?.to_vec();
        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.client.get(url).send()?;
        Self::read_response(response)
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        Self::read_response(response)
    }
}

// ---------------------------------------------------------------------------
// RpcError
// ---------------------------------------------------------------------------

/// Errors surfaced by the RPC methods.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request failed at the transport layer.
    #[error("request to node failed")]
    Transport(#[source] TransportError),
    /// The node answered with an error status; `errors` holds its
    /// `[{kind, id}]` objects when the body carried them.
    #[error("node returned status {status}")]
    Node { status: u16, errors: Vec<NodeError> },
    /// A response body did not decode as the expected JSON document.
    #[error("failed to decode node response")]
    Decode(#[source] serde_json::Error),
    /// The node-forged bytes could not be parsed by the local decoder, so
    /// they cannot be trusted. The hex is retained for inspection.
    #[error("node-forged bytes failed local parsing")]
    ForgeUnverifiable {
        forged: String,
        #[source]
        source: ForgeError,
    },
    /// The node-forged bytes decode to different contents than requested.
    /// The hex is retained for inspection.
    #[error("node-forged bytes do not match the requested contents")]
    ForgeMismatch { forged: String },
}

impl From<TransportError> for RpcError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status { status, body } => {
                let errors = serde_json::from_slice::<Vec<NodeError>>(&body).unwrap_or_default();
                RpcError::Node { status, errors }
            }
            other => RpcError::Transport(other),
        }
    }
}

// ---------------------------------------------------------------------------
// MxpClient
// ---------------------------------------------------------------------------

/// A client for one MXP node.
///
/// # Examples
///
/// ```no_run
/// use mxp_client::MxpClient;
///
/// let client = MxpClient::new("http://127.0.0.1:8732").unwrap();
/// let head = client.head().unwrap();
/// println!("head is at level {}", head.header.level);
/// ```
pub struct MxpClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl MxpClient {
    /// Creates a client for `base_url` using the default HTTP transport.
    pub fn new(base_url: &str) -> Result<Self, RpcError> {
        let transport = HttpTransport::new().map_err(RpcError::Transport)?;
        Ok(Self::with_transport(base_url, Box::new(transport)))
    }

    /// Creates a client over a caller-supplied transport.
    pub fn with_transport(base_url: &str, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn get(&self, path: &str) -> Result<Vec<u8>, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        Ok(self.transport.get(&url)?)
    }

    pub(crate) fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, body_len = body.len(), "POST");
        Ok(self.transport.post(&url, body)?)
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RpcError> {
        let body = self.get(path)?;
        serde_json::from_slice(&body).map_err(RpcError::Decode)
    }

    pub(crate) fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RpcError> {
        let payload = serde_json::to_vec(body).map_err(RpcError::Decode)?;
        let response = self.post(path, payload)?;
        serde_json::from_slice(&response).map_err(RpcError::Decode)
    }
}
