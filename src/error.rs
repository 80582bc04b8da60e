//! Front-end error taxonomy
//!
//! These are the errors the entry layer raises on its own behalf. Errors
//! returned by command handlers propagate unchanged as `anyhow::Error`
//! and are printed once at the top level.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    /// The wallet RPC daemon could not be reached. Fatal: every downstream
    /// wallet operation would be meaningless, so there is no retry.
    #[error("connect to wallet RPC at {address} failed: {reason}")]
    Connection { address: String, reason: String },

    /// A registered command has no handler attached. This is a registration
    /// defect in the command tree, not user error.
    #[error("the command \"{0}\" was not properly set up.\nPlease report this bug at https://github.com/vela-project/vela-wallet/issues")]
    InternalSetup(String),

    /// Positional arguments or flags that are incompatible with the
    /// selected run mode.
    #[error("unexpected command or flag: {0}")]
    ModeConflict(String),

    /// The user interrupted a connection or sync step before it completed.
    #[error("operation canceled")]
    Canceled,
}
