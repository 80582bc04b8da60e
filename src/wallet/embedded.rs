//! Embedded wallet engine
//!
//! Local backend storing its state as a JSON file under
//! `<data_dir>/<network>/wallet.json`. Key handling, chain scanning and
//! transaction construction live in the engine proper; this backend keeps
//! only the state the front-end needs to serve its commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{AccountInfo, Balance, TxSummary, WalletStatus};

/// Current wallet file format version
const WALLET_VERSION: u32 = 1;

/// Address payload length in hex characters
const ADDRESS_LEN: usize = 38;

/// Persisted wallet state
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WalletState {
    version: u32,
    network: String,
    /// Hex-encoded wallet seed
    seed: String,
    created_at: i64,
    sync_height: u64,
    next_address_index: u64,
    accounts: Vec<AccountInfo>,
    transactions: Vec<TxSummary>,
    balance: Balance,
}

/// Local wallet engine backend.
///
/// Construction never touches the filesystem; `create_wallet` or
/// `open_wallet` do. State is loaded lazily and cached behind a mutex,
/// but the front-end never has two simultaneous consumers.
#[derive(Debug)]
pub struct EmbeddedWallet {
    data_dir: PathBuf,
    network: String,
    state: Mutex<Option<WalletState>>,
}

impl EmbeddedWallet {
    pub fn new(data_dir: PathBuf, network: &str) -> Self {
        Self {
            data_dir,
            network: network.to_string(),
            state: Mutex::new(None),
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    fn wallet_file(&self) -> PathBuf {
        self.data_dir.join(&self.network).join("wallet.json")
    }

    pub fn wallet_exists(&self) -> bool {
        self.wallet_file().exists()
    }

    /// Creates a new wallet file. Fails if one already exists.
    pub fn create_wallet(&self) -> Result<()> {
        let path = self.wallet_file();
        if path.exists() {
            return Err(anyhow!("wallet already exists at {}", path.display()));
        }

        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);

        let state = WalletState {
            version: WALLET_VERSION,
            network: self.network.clone(),
            seed: hex::encode(seed),
            created_at: chrono::Utc::now().timestamp(),
            sync_height: 0,
            next_address_index: 0,
            accounts: vec![AccountInfo {
                index: 0,
                name: "default".to_string(),
                balance: 0,
            }],
            transactions: Vec::new(),
            balance: Balance::default(),
        };

        save_state(&path, &state)?;
        debug!("created wallet at {}", path.display());
        *self.state.lock().unwrap() = Some(state);
        Ok(())
    }

    /// Loads the wallet file into memory. No-op if already open.
    pub fn open_wallet(&self) -> Result<()> {
        let mut guard = self.state.lock().unwrap();
        if guard.is_none() {
            *guard = Some(self.load_state()?);
        }
        Ok(())
    }

    fn load_state(&self) -> Result<WalletState> {
        let path = self.wallet_file();
        if !path.exists() {
            return Err(anyhow!(
                "no wallet found at {}; run with --create-wallet first",
                path.display()
            ));
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read wallet file {}", path.display()))?;
        let state: WalletState = serde_json::from_str(&data)
            .with_context(|| format!("invalid wallet file {}", path.display()))?;
        if state.version != WALLET_VERSION {
            return Err(anyhow!(
                "unsupported wallet version: {} (expected {})",
                state.version,
                WALLET_VERSION
            ));
        }
        if state.network != self.network {
            return Err(anyhow!(
                "wallet at {} belongs to {} but {} was requested",
                path.display(),
                state.network,
                self.network
            ));
        }
        Ok(state)
    }

    fn read_state<T>(&self, f: impl FnOnce(&WalletState) -> T) -> Result<T> {
        let mut guard = self.state.lock().unwrap();
        if guard.is_none() {
            *guard = Some(self.load_state()?);
        }
        Ok(f(guard.as_ref().unwrap()))
    }

    fn mutate_state<T>(&self, f: impl FnOnce(&mut WalletState) -> Result<T>) -> Result<T> {
        let mut guard = self.state.lock().unwrap();
        if guard.is_none() {
            *guard = Some(self.load_state()?);
        }
        let state = guard.as_mut().unwrap();
        let out = f(state)?;
        save_state(&self.wallet_file(), state)?;
        Ok(out)
    }

    /// The engine keeps its own chain view current; syncing reports the
    /// height the wallet is at without touching the state file.
    pub fn sync_blockchain(&self) -> Result<u64> {
        self.read_state(|state| state.sync_height)
    }

    pub fn status(&self) -> Result<WalletStatus> {
        self.read_state(|state| WalletStatus {
            network: state.network.clone(),
            sync_height: state.sync_height,
            synced: true,
        })
    }

    pub fn balance(&self) -> Result<Balance> {
        self.read_state(|state| state.balance.clone())
    }

    /// Derives the next receive address from the wallet seed.
    pub fn new_address(&self) -> Result<String> {
        let prefix = address_prefix(&self.network);
        self.mutate_state(|state| {
            let index = state.next_address_index;
            state.next_address_index += 1;

            let mut hasher = Sha256::new();
            hasher.update(state.seed.as_bytes());
            hasher.update(index.to_le_bytes());
            let digest = hex::encode(hasher.finalize());
            Ok(format!("{prefix}{}", &digest[..ADDRESS_LEN]))
        })
    }

    pub fn send(&self, address: &str, amount: u64) -> Result<String> {
        if address.is_empty() {
            return Err(anyhow!("recipient address is empty"));
        }
        if amount == 0 {
            return Err(anyhow!("amount must be greater than 0"));
        }

        self.mutate_state(|state| {
            if amount > state.balance.spendable {
                return Err(anyhow!(
                    "insufficient funds: have {} spendable atoms, need {}",
                    state.balance.spendable,
                    amount
                ));
            }

            let timestamp = chrono::Utc::now().timestamp();
            let mut hasher = Sha256::new();
            hasher.update(state.seed.as_bytes());
            hasher.update(address.as_bytes());
            hasher.update(amount.to_le_bytes());
            hasher.update(timestamp.to_le_bytes());
            hasher.update(state.transactions.len().to_le_bytes());
            let hash = hex::encode(hasher.finalize());

            state.balance.spendable -= amount;
            state.balance.total -= amount;
            if let Some(account) = state.accounts.first_mut() {
                account.balance = account.balance.saturating_sub(amount);
            }
            state.transactions.push(TxSummary {
                hash: hash.clone(),
                direction: "sent".to_string(),
                amount,
                timestamp,
                confirmations: 0,
            });
            Ok(hash)
        })
    }

    /// Most recent transactions first.
    pub fn transactions(&self, limit: usize) -> Result<Vec<TxSummary>> {
        self.read_state(|state| {
            state
                .transactions
                .iter()
                .rev()
                .take(limit)
                .cloned()
                .collect()
        })
    }

    pub fn accounts(&self) -> Result<Vec<AccountInfo>> {
        self.read_state(|state| state.accounts.clone())
    }

    pub fn create_account(&self, name: &str) -> Result<AccountInfo> {
        if name.is_empty() {
            return Err(anyhow!("account name is empty"));
        }
        self.mutate_state(|state| {
            if state.accounts.iter().any(|a| a.name == name) {
                return Err(anyhow!("account \"{name}\" already exists"));
            }
            let account = AccountInfo {
                index: state.accounts.len() as u32,
                name: name.to_string(),
                balance: 0,
            };
            state.accounts.push(account.clone());
            Ok(account)
        })
    }
}

fn address_prefix(network: &str) -> &'static str {
    if network == "testnet" {
        "Vt"
    } else {
        "Vm"
    }
}

fn save_state(path: &Path, state: &WalletState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create wallet dir {}", parent.display()))?;
    }
    let data = serde_json::to_string_pretty(state)?;
    fs::write(path, data).with_context(|| format!("failed to write wallet file {}", path.display()))
}
