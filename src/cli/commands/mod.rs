//! CLI Commands
//!
//! Implementation of the interactive wallet commands and the registry
//! that wires them into the command tree. Every command here is either
//! a wallet command (receives the live connection) or a plain command
//! (runs on its arguments alone); the registry records which is which.

pub mod accounts;
pub mod balance;
pub mod history;
pub mod receive;
pub mod send;
pub mod version;

use anyhow::Result;
use std::io::{self, Write};

use super::parser::CommandSpec;

/// Builds the full command tree served by the interactive mode.
pub fn registry() -> CommandSpec {
    CommandSpec::group(
        "vela-wallet",
        "Vela wallet commands",
        vec![
            CommandSpec::wallet("balance", "Show the wallet balance", |w, a| {
                Box::pin(balance::run(w, a))
            }),
            CommandSpec::wallet("receive", "Generate a receive address", |w, a| {
                Box::pin(receive::run(w, a))
            }),
            CommandSpec::wallet("send", "Send funds to an address", |w, a| {
                Box::pin(send::run(w, a))
            }),
            CommandSpec::wallet("history", "Show recent transactions", |w, a| {
                Box::pin(history::run(w, a))
            }),
            CommandSpec::group(
                "account",
                "Manage wallet accounts",
                vec![
                    CommandSpec::wallet("list", "List accounts", |w, a| {
                        Box::pin(accounts::list(w, a))
                    }),
                    CommandSpec::wallet("new", "Create an account", |w, a| {
                        Box::pin(accounts::new(w, a))
                    }),
                ],
            ),
            CommandSpec::plain("version", "Print version information", |a| {
                Box::pin(version::run(a))
            }),
        ],
    )
}

/// Prompt for confirmation before an irreversible action. Anything but
/// an explicit yes declines.
pub fn prompt_confirm(message: &str) -> Result<bool> {
    print!("{message} [y/N]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();

    Ok(matches!(answer.as_str(), "y" | "yes"))
}

/// Print a highlighted result line
pub fn print_success(message: &str) {
    println!("\x1b[32m{message}\x1b[0m");
}
