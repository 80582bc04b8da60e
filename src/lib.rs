//! Vela Wallet Front-End
//!
//! Entry layer of the Vela wallet client. It selects a wallet backend
//! (embedded local engine or remote RPC daemon), chooses exactly one
//! interaction surface per run (interactive CLI, HTTP API, or desktop
//! shell), and routes parsed commands to their handlers, injecting a
//! live wallet connection only where a handler declares it needs one.
//!
//! ## Run modes
//!
//! - Interactive CLI: parse a command, dispatch it, exit
//! - HTTP API: serve wallet operations over HTTP for the process lifetime
//! - Desktop shell: hand the wallet to the desktop front-end

pub mod cli;
pub mod config;
pub mod desktop;
pub mod error;
pub mod wallet;
pub mod web;

pub use config::AppConfig;
pub use error::FrontendError;
pub use wallet::{connect_to_wallet, WalletHandle};
