//! Run configuration
//!
//! All global options of the front-end, parsed once at startup and
//! read-only afterwards. Command names and command arguments are captured
//! as trailing tokens and handed to the command parser untouched.
//!
//! clap's built-in help flag is disabled so that `-h`/`--help` flows
//! through the parse-outcome classifier together with command-scoped help.

use std::path::PathBuf;

use clap::Parser;

use crate::error::FrontendError;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "vela-wallet",
    version,
    about = "Vela wallet client - interactive CLI, HTTP API and desktop front-end",
    disable_help_flag = true
)]
pub struct AppConfig {
    /// Connect to the Vela test network
    #[arg(long)]
    pub testnet: bool,

    /// Use a remote wallet RPC daemon instead of the embedded wallet engine
    #[arg(long)]
    pub use_wallet_rpc: bool,

    /// Address of the wallet RPC daemon (host:port)
    #[arg(long, default_value = "127.0.0.1:19558")]
    pub wallet_rpc_server: String,

    /// Path to the wallet RPC daemon TLS certificate
    #[arg(long)]
    pub rpc_cert: Option<PathBuf>,

    /// Connect to the wallet RPC daemon without TLS
    #[arg(long)]
    pub no_daemon_tls: bool,

    /// Application data directory (defaults to the platform data dir)
    #[arg(long)]
    pub app_data_dir: Option<PathBuf>,

    /// Serve the HTTP API instead of running a command
    #[arg(long, conflicts_with = "desktop_mode")]
    pub http_mode: bool,

    /// Launch the desktop shell instead of running a command
    #[arg(long)]
    pub desktop_mode: bool,

    /// Also serve the HTTP API while in desktop mode
    #[arg(long, requires = "desktop_mode")]
    pub desktop_http: bool,

    /// Listen address for the HTTP API
    #[arg(long, default_value = "127.0.0.1:7777")]
    pub http_server_address: String,

    /// Create a new wallet before doing anything else
    #[arg(long)]
    pub create_wallet: bool,

    /// Sync the blockchain before running a command
    #[arg(long = "sync")]
    pub sync_blockchain: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print help information
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Command name and command arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command_args: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Network tag derived from the testnet flag.
    pub fn network(&self) -> &'static str {
        if self.testnet {
            "testnet"
        } else {
            "mainnet"
        }
    }

    /// Resolved application data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.app_data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vela-wallet")
        })
    }

    /// HTTP mode accepts no leftover command tokens. Any residual
    /// positional argument or flag is a user error and the server must
    /// not be started.
    pub fn http_mode_conflict(&self) -> Option<FrontendError> {
        if self.http_mode && !self.command_args.is_empty() {
            Some(FrontendError::ModeConflict(self.command_args.join(" ")))
        } else {
            None
        }
    }
}
