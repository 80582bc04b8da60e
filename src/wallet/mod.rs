//! Wallet backends
//!
//! A `WalletHandle` is the capability object the rest of the front-end
//! works against. It is constructed at most once per run by
//! `connect_to_wallet` and shared by reference with exactly one consumer:
//! the command dispatcher, the HTTP server, or the desktop shell.
//!
//! Two backends exist:
//! - `EmbeddedWallet`: local wallet engine backed by the app data dir
//! - `RpcWallet`: remote wallet daemon reached over JSON-RPC

pub mod embedded;
pub mod rpc;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::FrontendError;

pub use embedded::EmbeddedWallet;
pub use rpc::RpcWallet;

/// Atomic units per whole VLA.
pub const ATOMS_PER_VLA: u64 = 100_000_000;

/// Wallet balance in atoms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub total: u64,
    pub spendable: u64,
    pub unconfirmed: u64,
}

/// One entry of the transaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxSummary {
    pub hash: String,
    /// "sent" or "received"
    pub direction: String,
    pub amount: u64,
    pub timestamp: i64,
    pub confirmations: u64,
}

/// A wallet account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub index: u32,
    pub name: String,
    pub balance: u64,
}

/// Backend status as reported to the HTTP API and desktop shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletStatus {
    pub network: String,
    pub sync_height: u64,
    pub synced: bool,
}

/// Connected wallet backend. Immutable once constructed; every operation
/// takes `&self`.
#[derive(Debug)]
pub enum WalletHandle {
    Embedded(EmbeddedWallet),
    Rpc(RpcWallet),
}

impl WalletHandle {
    pub fn network(&self) -> &str {
        match self {
            WalletHandle::Embedded(w) => w.network(),
            WalletHandle::Rpc(w) => w.network(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            WalletHandle::Embedded(_) => "embedded",
            WalletHandle::Rpc(_) => "rpc",
        }
    }

    pub async fn create_wallet(&self) -> Result<()> {
        match self {
            WalletHandle::Embedded(w) => w.create_wallet(),
            WalletHandle::Rpc(w) => w.create_wallet().await,
        }
    }

    pub async fn open_wallet(&self) -> Result<()> {
        match self {
            WalletHandle::Embedded(w) => w.open_wallet(),
            WalletHandle::Rpc(w) => w.open_wallet().await,
        }
    }

    /// Blocks until blockchain synchronization completes and returns the
    /// tip height the wallet is synced to.
    pub async fn sync_blockchain(&self) -> Result<u64> {
        match self {
            WalletHandle::Embedded(w) => w.sync_blockchain(),
            WalletHandle::Rpc(w) => w.sync_blockchain().await,
        }
    }

    pub async fn status(&self) -> Result<WalletStatus> {
        match self {
            WalletHandle::Embedded(w) => w.status(),
            WalletHandle::Rpc(w) => w.status().await,
        }
    }

    pub async fn balance(&self) -> Result<Balance> {
        match self {
            WalletHandle::Embedded(w) => w.balance(),
            WalletHandle::Rpc(w) => w.balance().await,
        }
    }

    pub async fn new_address(&self) -> Result<String> {
        match self {
            WalletHandle::Embedded(w) => w.new_address(),
            WalletHandle::Rpc(w) => w.new_address().await,
        }
    }

    /// Sends `amount` atoms to `address` and returns the transaction hash.
    pub async fn send(&self, address: &str, amount: u64) -> Result<String> {
        match self {
            WalletHandle::Embedded(w) => w.send(address, amount),
            WalletHandle::Rpc(w) => w.send(address, amount).await,
        }
    }

    pub async fn transactions(&self, limit: usize) -> Result<Vec<TxSummary>> {
        match self {
            WalletHandle::Embedded(w) => w.transactions(limit),
            WalletHandle::Rpc(w) => w.transactions(limit).await,
        }
    }

    pub async fn accounts(&self) -> Result<Vec<AccountInfo>> {
        match self {
            WalletHandle::Embedded(w) => w.accounts(),
            WalletHandle::Rpc(w) => w.accounts().await,
        }
    }

    pub async fn create_account(&self, name: &str) -> Result<AccountInfo> {
        match self {
            WalletHandle::Embedded(w) => w.create_account(name),
            WalletHandle::Rpc(w) => w.create_account(name).await,
        }
    }
}

/// Builds the wallet handle for this run.
///
/// Without `--use-wallet-rpc` the embedded engine is constructed from the
/// app data dir and the derived network tag; this cannot fail at this
/// layer. With it, a connection to the wallet RPC daemon is attempted
/// exactly once: either a fully connected handle is returned or a
/// `Connection` error, never a half-initialized state.
pub async fn connect_to_wallet(config: &AppConfig) -> Result<WalletHandle, FrontendError> {
    if !config.use_wallet_rpc {
        return Ok(WalletHandle::Embedded(EmbeddedWallet::new(
            config.data_dir(),
            config.network(),
        )));
    }

    let rpc = RpcWallet::connect(
        &config.wallet_rpc_server,
        config.rpc_cert.as_deref(),
        config.no_daemon_tls,
        config.network(),
    )
    .await?;
    Ok(WalletHandle::Rpc(rpc))
}

/// `connect_to_wallet` gated by Ctrl-C. Cancellation never leaves a
/// partially constructed handle observable.
pub async fn connect_or_cancel(config: &AppConfig) -> Result<WalletHandle, FrontendError> {
    tokio::select! {
        result = connect_to_wallet(config) => result,
        _ = tokio::signal::ctrl_c() => Err(FrontendError::Canceled),
    }
}

/// Formats atoms as a whole-unit amount, e.g. `1.50000000 VLA`.
pub fn format_amount(atoms: u64) -> String {
    format!(
        "{}.{:08} VLA",
        atoms / ATOMS_PER_VLA,
        atoms % ATOMS_PER_VLA
    )
}

/// Parses a whole-unit amount (optionally suffixed with `VLA`) into atoms.
pub fn parse_amount(input: &str) -> Result<u64> {
    let trimmed = input.trim().trim_end_matches("VLA").trim_end();
    if trimmed.is_empty() {
        return Err(anyhow!("amount is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(anyhow!("amount cannot be negative"));
    }

    let (whole, frac) = match trimmed.split_once('.') {
        None => (trimmed, ""),
        Some((whole, frac)) => (whole, frac),
    };
    if frac.contains('.') {
        return Err(anyhow!("invalid amount: {input}"));
    }
    if frac.len() > 8 {
        return Err(anyhow!("amount has too many decimal places (max 8): {input}"));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| anyhow!("invalid amount: {input}"))?
    };
    let frac_atoms: u64 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<8}")
            .parse()
            .map_err(|_| anyhow!("invalid amount: {input}"))?
    };

    whole
        .checked_mul(ATOMS_PER_VLA)
        .and_then(|atoms| atoms.checked_add(frac_atoms))
        .ok_or_else(|| anyhow!("amount too large: {input}"))
}
