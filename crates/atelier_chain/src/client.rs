use std::time::Duration;

use async_trait::async_trait;
use atelier_core::{AtelierConfig, AtelierError, Result, validate_url};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{AccountAddress, AccountData, MoveModuleBytecode, MoveResource, ViewRequest};

const API_PREFIX: &str = "/v1";

// ── Trait ──────────────────────────────────────────────────────────────

/// Read-only access to a Move ledger node.
///
/// The resolution pipeline only talks to the node through this trait, so
/// tests can substitute an in-memory ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch the account record.
    async fn get_account(&self, address: &AccountAddress) -> Result<AccountData>;

    /// List the modules published under an address.
    async fn get_account_modules(&self, address: &AccountAddress)
    -> Result<Vec<MoveModuleBytecode>>;

    /// List every resource stored under an address.
    async fn get_account_resources(&self, address: &AccountAddress) -> Result<Vec<MoveResource>>;

    /// Evaluate a view function; returns the function's return values in order.
    async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>>;
}

// ── REST client ────────────────────────────────────────────────────────

/// [`LedgerClient`] over the node's REST API.
pub struct RestLedgerClient {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl RestLedgerClient {
    /// Create a client for the node configured in `config`.
    pub fn from_config(config: &AtelierConfig) -> Result<Self> {
        Self::with_base_url(&config.node_url, config.request_timeout())
    }

    /// Create a client for `node_url`. A trailing `/v1` is optional.
    pub fn with_base_url(node_url: &str, timeout: Duration) -> Result<Self> {
        if !validate_url(node_url) {
            return Err(AtelierError::Config(format!("invalid node URL: {node_url}")));
        }
        let trimmed = node_url.trim_end_matches('/');
        let base_url = if trimmed.ends_with(API_PREFIX) {
            trimmed.to_string()
        } else {
            format!("{trimmed}{API_PREFIX}")
        };

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static("Atelier/0.1"));

        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AtelierError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            timeout,
            client,
        })
    }

    /// Return the API base URL, including the `/v1` prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn account_url(&self, address: &AccountAddress, suffix: &str) -> String {
        format!("{}/accounts/{address}{suffix}", self.base_url)
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Perform a GET request and deserialize the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_json(response).await
    }

    /// Perform a POST request with a JSON body and deserialize the response.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AtelierError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AtelierError::Decode(format!("failed to parse ledger response JSON: {e}")))
    }

    fn transport_error(&self, e: reqwest::Error) -> AtelierError {
        if e.is_timeout() {
            AtelierError::Timeout(self.timeout)
        } else {
            AtelierError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl LedgerClient for RestLedgerClient {
    async fn get_account(&self, address: &AccountAddress) -> Result<AccountData> {
        let url = self.account_url(address, "");
        debug!(url = %url, "getting account");
        self.get_json(&url).await
    }

    async fn get_account_modules(
        &self,
        address: &AccountAddress,
    ) -> Result<Vec<MoveModuleBytecode>> {
        let url = self.account_url(address, "/modules");
        debug!(url = %url, "getting account modules");
        self.get_json(&url).await
    }

    async fn get_account_resources(&self, address: &AccountAddress) -> Result<Vec<MoveResource>> {
        let url = self.account_url(address, "/resources");
        debug!(url = %url, "getting account resources");
        self.get_json(&url).await
    }

    async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/view", self.base_url);
        debug!(url = %url, function = %request.function, args = ?request.arguments, "calling view function");
        self.post_json(&url, request).await
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
