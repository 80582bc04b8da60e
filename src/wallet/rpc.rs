//! Wallet RPC backend
//!
//! JSON-RPC 2.0 client for a remote wallet daemon. The connection is
//! attempted exactly once at startup; if the daemon cannot be reached or
//! reports the wrong network, `connect` fails and the process exits.
//! There is no retry loop and no reconnection.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{AccountInfo, Balance, TxSummary, WalletStatus};
use crate::error::FrontendError;

/// Timeout for RPC requests
const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC request ID counter
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    method: String,
    params: Value,
    id: u64,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<T>,
    error: Option<JsonRpcError>,
    #[allow(dead_code)]
    id: u64,
}

/// JSON-RPC error
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[allow(dead_code)]
    data: Option<Value>,
}

/// Remote wallet daemon backend.
#[derive(Debug)]
pub struct RpcWallet {
    client: reqwest::Client,
    base_url: String,
    network: String,
}

impl RpcWallet {
    /// Connects to the wallet RPC daemon at `address` and verifies it
    /// serves the expected network. TLS is the default; `rpc_cert` adds a
    /// daemon certificate to the trust roots, `no_tls` drops to plain HTTP.
    pub async fn connect(
        address: &str,
        rpc_cert: Option<&Path>,
        no_tls: bool,
        expected_network: &str,
    ) -> Result<Self, FrontendError> {
        let wallet = Self::build(address, rpc_cert, no_tls, expected_network).map_err(|e| {
            FrontendError::Connection {
                address: address.to_string(),
                reason: e.to_string(),
            }
        })?;

        // One ping decides whether this run proceeds at all.
        let status = wallet
            .status()
            .await
            .map_err(|e| FrontendError::Connection {
                address: address.to_string(),
                reason: e.to_string(),
            })?;
        if status.network != expected_network {
            return Err(FrontendError::Connection {
                address: address.to_string(),
                reason: format!(
                    "daemon serves {} but {} was requested",
                    status.network, expected_network
                ),
            });
        }

        debug!(
            "connected to wallet RPC at {} ({}, height {})",
            address, status.network, status.sync_height
        );
        Ok(wallet)
    }

    fn build(
        address: &str,
        rpc_cert: Option<&Path>,
        no_tls: bool,
        network: &str,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(RPC_TIMEOUT);

        if let Some(cert_path) = rpc_cert {
            let pem = std::fs::read(cert_path)
                .map_err(|e| anyhow!("failed to read {}: {}", cert_path.display(), e))?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| anyhow!("invalid certificate {}: {}", cert_path.display(), e))?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder.build()?;
        let scheme = if no_tls { "http" } else { "https" };

        Ok(Self {
            client,
            base_url: format!("{scheme}://{address}"),
            network: network.to_string(),
        })
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id,
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }

        let json_response: JsonRpcResponse<T> = response.json().await?;

        if let Some(error) = json_response.error {
            return Err(anyhow!("RPC error {}: {}", error.code, error.message));
        }

        json_response
            .result
            .ok_or_else(|| anyhow!("missing result in RPC response"))
    }

    pub async fn create_wallet(&self) -> Result<()> {
        self.call::<Value>("wallet_create", json!({})).await?;
        Ok(())
    }

    pub async fn open_wallet(&self) -> Result<()> {
        self.call::<Value>("wallet_open", json!({})).await?;
        Ok(())
    }

    pub async fn sync_blockchain(&self) -> Result<u64> {
        let result: SyncResult = self.call("wallet_syncBlockchain", json!({})).await?;
        Ok(result.height)
    }

    pub async fn status(&self) -> Result<WalletStatus> {
        self.call("wallet_getStatus", json!({})).await
    }

    pub async fn balance(&self) -> Result<Balance> {
        self.call("wallet_getBalance", json!({})).await
    }

    pub async fn new_address(&self) -> Result<String> {
        let result: AddressResult = self.call("wallet_newAddress", json!({})).await?;
        Ok(result.address)
    }

    pub async fn send(&self, address: &str, amount: u64) -> Result<String> {
        let result: SendResult = self
            .call(
                "wallet_sendTransaction",
                json!({ "address": address, "amount": amount }),
            )
            .await?;
        Ok(result.tx_hash)
    }

    pub async fn transactions(&self, limit: usize) -> Result<Vec<TxSummary>> {
        self.call("wallet_listTransactions", json!({ "limit": limit }))
            .await
    }

    pub async fn accounts(&self) -> Result<Vec<AccountInfo>> {
        self.call("wallet_listAccounts", json!({})).await
    }

    pub async fn create_account(&self, name: &str) -> Result<AccountInfo> {
        self.call("wallet_nextAccount", json!({ "name": name }))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct SyncResult {
    height: u64,
}

#[derive(Debug, Deserialize)]
struct AddressResult {
    address: String,
}

#[derive(Debug, Deserialize)]
struct SendResult {
    tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_unreachable_daemon_fails_fast() {
        // Port 1 is never a wallet daemon.
        let err = RpcWallet::connect("127.0.0.1:1", None, true, "mainnet")
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("connect to wallet RPC at 127.0.0.1:1 failed"));
    }

    #[tokio::test]
    async fn test_connect_with_missing_cert_fails() {
        let err = RpcWallet::connect(
            "127.0.0.1:1",
            Some(Path::new("/nonexistent/rpc.cert")),
            false,
            "mainnet",
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_scheme_selection() {
        let tls = RpcWallet::build("localhost:19558", None, false, "mainnet").unwrap();
        assert_eq!(tls.base_url, "https://localhost:19558");

        let plain = RpcWallet::build("localhost:19558", None, true, "mainnet").unwrap();
        assert_eq!(plain.base_url, "http://localhost:19558");
    }
}
