//! Interactive CLI mode
//!
//! Parses the residual command tokens, runs the create/sync preamble if
//! requested, dispatches at most one command and maps the parse outcome
//! to an exit code. A wallet connection is only established when the
//! resolved command (or the preamble) actually needs one.

pub mod commands;
pub mod parser;

use std::io::Write;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::CommandFactory;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::FrontendError;
use crate::wallet::{self, WalletHandle};

use parser::{rendered_name, write_command_help, CommandParser, CommandSpec, Exec, ParseOutcome};

/// Runs the interactive mode to completion.
pub async fn run(config: &AppConfig) -> ExitCode {
    // Error printing stays with the classifier so genuine parse errors
    // land on stdout, once.
    let command_parser = CommandParser::new(commands::registry());
    let outcome = command_parser.parse(&config.command_args);

    // Creating a wallet always forces a sync afterwards.
    let sync_requested = config.sync_blockchain || config.create_wallet;
    let needs_wallet = config.create_wallet
        || sync_requested
        || matches!(
            outcome,
            ParseOutcome::Run {
                command: Some(command),
                ..
            } if command.needs_wallet()
        );

    let wallet = if needs_wallet {
        match wallet::connect_or_cancel(config).await {
            Ok(wallet) => {
                debug!("using {} wallet backend", wallet.backend_name());
                Some(wallet)
            }
            Err(e) => {
                println!("{e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    if let Some(wallet) = &wallet {
        if config.create_wallet {
            if let Err(e) = wallet.create_wallet().await {
                println!("{e}");
                return ExitCode::FAILURE;
            }
            println!("Wallet created.");
        }
        if sync_requested {
            if let Err(e) = run_sync(wallet).await {
                println!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let code = handle_outcome(&command_parser, outcome, wallet.as_ref(), sync_requested).await;
    ExitCode::from(code)
}

/// Opens the wallet and blocks until blockchain sync completes, or until
/// the user interrupts it.
async fn run_sync(wallet: &WalletHandle) -> Result<()> {
    wallet.open_wallet().await?;
    println!("Syncing blockchain...");
    let height = tokio::select! {
        result = wallet.sync_blockchain() => result?,
        _ = tokio::signal::ctrl_c() => return Err(FrontendError::Canceled.into()),
    };
    println!("Synced to block {height}");
    Ok(())
}

/// Maps a parse outcome to the process exit code, running the resolved
/// command if there is one.
async fn handle_outcome(
    command_parser: &CommandParser,
    outcome: ParseOutcome<'_>,
    wallet: Option<&WalletHandle>,
    sync_requested: bool,
) -> u8 {
    match outcome {
        ParseOutcome::Run {
            command,
            chain,
            args,
        } => match dispatch(command, &chain, &args, wallet).await {
            Ok(()) => 0,
            Err(e) => {
                println!("{e}");
                1
            }
        },
        ParseOutcome::NoCommand { chain } => {
            // A run that synced is complete without a command.
            if sync_requested {
                return 0;
            }
            let node = chain.last().copied().unwrap_or_else(|| command_parser.root());
            let mut stderr = std::io::stderr();
            let _ = report_no_command(&mut stderr, node);
            1
        }
        ParseOutcome::Help { chain } => {
            let mut stderr = std::io::stderr();
            if chain.is_empty() {
                let _ = print_full_help(command_parser, &mut stderr);
            } else {
                let _ = write_command_help(&mut stderr, &chain);
            }
            0
        }
        ParseOutcome::Error { message, printed } => {
            if !printed {
                println!("{message}");
            }
            1
        }
    }
}

/// Runs the resolved command, injecting the wallet connection only into
/// commands registered as wallet commands.
async fn dispatch(
    command: Option<&CommandSpec>,
    chain: &[&CommandSpec],
    args: &[String],
    wallet: Option<&WalletHandle>,
) -> Result<()> {
    let command = match command {
        Some(command) => command,
        None => return Err(FrontendError::InternalSetup(rendered_name(chain)).into()),
    };

    match command.exec {
        Some(Exec::Wallet(run)) => match wallet {
            Some(wallet) => run(wallet, args).await,
            None => Err(anyhow!(
                "internal error: no wallet connection for command \"{}\"",
                rendered_name(chain)
            )),
        },
        Some(Exec::Plain(run)) => run(args).await,
        None => Err(FrontendError::InternalSetup(rendered_name(chain)).into()),
    }
}

/// Lists the commands available at `node`, one line, sorted.
fn report_no_command<W: Write>(out: &mut W, node: &CommandSpec) -> std::io::Result<()> {
    writeln!(
        out,
        "Available Commands: {}",
        node.available_commands().join(", ")
    )
}

/// Full top-level help: the global options followed by the command list.
pub fn print_full_help<W: Write>(
    command_parser: &CommandParser,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(out, "{}", AppConfig::command().render_long_help())?;
    writeln!(out, "Available Commands:")?;
    for child in &command_parser.root().children {
        writeln!(out, "  {:<12} {}", child.name, child.about)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static SEEN_WALLET: AtomicUsize = AtomicUsize::new(0);

    fn record_wallet<'a>(
        wallet: &'a WalletHandle,
        _args: &'a [String],
    ) -> BoxFuture<'a, Result<()>> {
        SEEN_WALLET.store(wallet as *const _ as usize, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }

    fn failing(_args: &[String]) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Err(anyhow!("boom")) })
    }

    fn test_wallet() -> WalletHandle {
        let dir = std::env::temp_dir();
        WalletHandle::Embedded(crate::wallet::EmbeddedWallet::new(dir, "testnet"))
    }

    fn test_parser() -> CommandParser {
        CommandParser::new(CommandSpec::group(
            "vela-wallet",
            "test tree",
            vec![
                CommandSpec::wallet("probe", "records its wallet", record_wallet),
                CommandSpec::plain("fail", "always fails", failing),
                CommandSpec::group("empty", "no children, no handler", vec![]),
            ],
        ))
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_wallet_command_receives_the_connected_handle() {
        let command_parser = test_parser();
        let wallet = test_wallet();
        let outcome = command_parser.parse(&args(&["probe"]));

        let code = handle_outcome(&command_parser, outcome, Some(&wallet), false).await;
        assert_eq!(code, 0);
        assert_eq!(
            SEEN_WALLET.load(Ordering::SeqCst),
            &wallet as *const _ as usize
        );
    }

    #[tokio::test]
    async fn test_plain_command_runs_without_wallet() {
        let command_parser = test_parser();
        let outcome = command_parser.parse(&args(&["fail"]));
        let code = handle_outcome(&command_parser, outcome, None, false).await;
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_missing_handler_is_an_internal_setup_error() {
        let command_parser = test_parser();
        let chain_node = command_parser.parse(&args(&["empty"]));
        let ParseOutcome::Run {
            command: None,
            chain,
            args,
        } = chain_node
        else {
            panic!("expected handler-less Run");
        };

        let err = dispatch(None, &chain, &args, None).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("the command \"empty\" was not properly set up"));
        assert!(message.contains("Please report this bug"));
    }

    #[tokio::test]
    async fn test_no_command_lists_available_commands_and_fails() {
        let command_parser = test_parser();
        let outcome = command_parser.parse(&[]);
        let code = handle_outcome(&command_parser, outcome, None, false).await;
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_bare_sync_run_needs_no_command() {
        let command_parser = test_parser();
        let outcome = command_parser.parse(&[]);
        let code = handle_outcome(&command_parser, outcome, None, true).await;
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_help_exits_zero() {
        let command_parser = test_parser();
        let outcome = command_parser.parse(&args(&["--help"]));
        let code = handle_outcome(&command_parser, outcome, None, false).await;
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_interactive_parser_defers_error_printing_to_the_classifier() {
        // The interactive mode builds its parser without error printing,
        // so an unknown command reaches the classifier unprinted and goes
        // to stdout there.
        let command_parser = CommandParser::new(commands::registry());
        match command_parser.parse(&args(&["frobnicate"])) {
            ParseOutcome::Error { printed, message } => {
                assert!(!printed);
                assert_eq!(message, "unknown command or flag: frobnicate");
            }
            _ => panic!("expected Error"),
        }
        let outcome = command_parser.parse(&args(&["frobnicate"]));
        let code = handle_outcome(&command_parser, outcome, None, false).await;
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_already_printed_error_is_not_printed_again() {
        let command_parser = test_parser();
        let outcome = ParseOutcome::Error {
            message: "unknown command or flag: x".to_string(),
            printed: true,
        };
        let code = handle_outcome(&command_parser, outcome, None, false).await;
        assert_eq!(code, 1);
    }

    #[test]
    fn test_no_command_listing_format() {
        let command_parser = test_parser();
        let mut out = Vec::new();
        report_no_command(&mut out, command_parser.root()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Available Commands: empty, fail, probe\n"
        );
    }

    #[test]
    fn test_full_help_includes_commands() {
        let command_parser = test_parser();
        let mut out = Vec::new();
        print_full_help(&command_parser, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Available Commands:"));
        assert!(text.contains("probe"));
    }
}
