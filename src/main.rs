//! Vela Wallet Front-End
//!
//! Entry point of the wallet client. Parses the global options, picks
//! the run mode (interactive CLI, HTTP API or desktop shell) and hands
//! off to it. Exactly one mode runs per invocation.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vela_wallet::cli::parser::CommandParser;
use vela_wallet::cli::{self, commands, print_full_help};
use vela_wallet::config::AppConfig;
use vela_wallet::wallet::connect_or_cancel;
use vela_wallet::{desktop, web};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            // clap renders its own message for bad global options.
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if config.help {
        let command_parser = CommandParser::new(commands::registry());
        let _ = print_full_help(&command_parser, &mut std::io::stderr());
        return ExitCode::SUCCESS;
    }

    if config.http_mode {
        if let Some(conflict) = config.http_mode_conflict() {
            println!("{conflict}");
            return ExitCode::FAILURE;
        }

        let wallet = match connect_or_cancel(&config).await {
            Ok(wallet) => wallet,
            Err(e) => {
                println!("{e}");
                return ExitCode::FAILURE;
            }
        };

        println!("Running in http mode");
        return match web::serve(config.http_server_address.clone(), wallet).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                println!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    if config.desktop_mode {
        let wallet = match connect_or_cancel(&config).await {
            Ok(wallet) => wallet,
            Err(e) => {
                println!("{e}");
                return ExitCode::FAILURE;
            }
        };

        return match desktop::run(wallet, &config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                println!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    cli::run(&config).await
}
