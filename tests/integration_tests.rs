//! Integration tests for vela-wallet
//!
//! These tests verify end-to-end front-end functionality including:
//! - Backend selection (embedded vs RPC)
//! - Embedded wallet lifecycle (create, reopen, send, history)
//! - Command resolution through the registered command tree
//! - Amount parsing and formatting

use clap::Parser;
use tempfile::TempDir;

use vela_wallet::{
    cli::commands::registry,
    cli::parser::{rendered_name, CommandParser, ParseOutcome},
    config::AppConfig,
    wallet::{connect_to_wallet, format_amount, parse_amount, ATOMS_PER_VLA},
};

fn config_for(dir: &TempDir, extra: &[&str]) -> AppConfig {
    let mut args = vec![
        "vela-wallet".to_string(),
        "--app-data-dir".to_string(),
        dir.path().display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    AppConfig::try_parse_from(args).unwrap()
}

// ============================================================================
// Backend Selection Tests
// ============================================================================

mod backend_selection {
    use super::*;

    #[tokio::test]
    async fn test_default_backend_is_embedded_mainnet() {
        let dir = TempDir::new().unwrap();
        let wallet = connect_to_wallet(&config_for(&dir, &[])).await.unwrap();
        assert_eq!(wallet.backend_name(), "embedded");
        assert_eq!(wallet.network(), "mainnet");
    }

    #[tokio::test]
    async fn test_testnet_flag_selects_testnet() {
        let dir = TempDir::new().unwrap();
        let wallet = connect_to_wallet(&config_for(&dir, &["--testnet"]))
            .await
            .unwrap();
        assert_eq!(wallet.network(), "testnet");
    }

    #[tokio::test]
    async fn test_unreachable_rpc_daemon_fails_fast() {
        let dir = TempDir::new().unwrap();
        let config = config_for(
            &dir,
            &[
                "--use-wallet-rpc",
                "--wallet-rpc-server",
                "127.0.0.1:1",
                "--no-daemon-tls",
            ],
        );
        let err = connect_to_wallet(&config).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("connect to wallet RPC at 127.0.0.1:1 failed"));
    }
}

// ============================================================================
// Embedded Wallet Lifecycle Tests
// ============================================================================

mod wallet_lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_create_reopen_and_derive_addresses() {
        let dir = TempDir::new().unwrap();

        // 1. Create a wallet
        let wallet = connect_to_wallet(&config_for(&dir, &["--testnet"]))
            .await
            .unwrap();
        wallet.create_wallet().await.unwrap();

        // 2. Derive an address
        let first = wallet.new_address().await.unwrap();
        assert!(first.starts_with("Vt"));

        // 3. A fresh handle over the same data dir continues the chain
        let reopened = connect_to_wallet(&config_for(&dir, &["--testnet"]))
            .await
            .unwrap();
        reopened.open_wallet().await.unwrap();
        let second = reopened.new_address().await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_fresh_wallet_state() {
        let dir = TempDir::new().unwrap();
        let wallet = connect_to_wallet(&config_for(&dir, &[])).await.unwrap();
        wallet.create_wallet().await.unwrap();

        let balance = wallet.balance().await.unwrap();
        assert_eq!(balance.total, 0);

        let accounts = wallet.accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "default");

        let history = wallet.transactions(10).await.unwrap();
        assert!(history.is_empty());

        let status = wallet.status().await.unwrap();
        assert_eq!(status.network, "mainnet");
    }

    #[tokio::test]
    async fn test_open_without_create_fails() {
        let dir = TempDir::new().unwrap();
        let wallet = connect_to_wallet(&config_for(&dir, &[])).await.unwrap();
        let err = wallet.open_wallet().await.unwrap_err();
        assert!(err.to_string().contains("--create-wallet"));
    }

    #[tokio::test]
    async fn test_send_from_empty_wallet_fails() {
        let dir = TempDir::new().unwrap();
        let wallet = connect_to_wallet(&config_for(&dir, &[])).await.unwrap();
        wallet.create_wallet().await.unwrap();

        let err = wallet.send("Vmabc", ATOMS_PER_VLA).await.unwrap_err();
        assert!(err.to_string().contains("insufficient funds"));
    }

    #[tokio::test]
    async fn test_account_creation_persists() {
        let dir = TempDir::new().unwrap();
        let wallet = connect_to_wallet(&config_for(&dir, &[])).await.unwrap();
        wallet.create_wallet().await.unwrap();
        wallet.create_account("savings").await.unwrap();

        let reopened = connect_to_wallet(&config_for(&dir, &[])).await.unwrap();
        reopened.open_wallet().await.unwrap();
        let accounts = reopened.accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].name, "savings");
        assert_eq!(accounts[1].index, 1);
    }
}

// ============================================================================
// Command Resolution Tests
// ============================================================================

mod command_resolution {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_registered_commands_are_listed_sorted() {
        let parser = CommandParser::new(registry());
        assert_eq!(
            parser.root().available_commands(),
            vec!["account", "balance", "history", "receive", "send", "version"]
        );
    }

    #[test]
    fn test_nested_command_resolves_with_full_name() {
        let parser = CommandParser::new(registry());
        match parser.parse(&args(&["account", "new", "savings"])) {
            ParseOutcome::Run {
                command: Some(command),
                chain,
                args,
            } => {
                assert_eq!(command.name, "new");
                assert_eq!(rendered_name(&chain), "account new");
                assert_eq!(args, vec!["savings"]);
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn test_wallet_capability_is_declared_per_command() {
        let parser = CommandParser::new(registry());
        let needs_wallet = |tokens: &[&str]| match parser.parse(&args(tokens)) {
            ParseOutcome::Run {
                command: Some(command),
                ..
            } => command.needs_wallet(),
            _ => panic!("expected Run"),
        };
        assert!(needs_wallet(&["balance"]));
        assert!(needs_wallet(&["send", "Vmabc", "1"]));
        assert!(!needs_wallet(&["version"]));
    }

    #[test]
    fn test_unknown_command_is_a_genuine_error() {
        let parser = CommandParser::new(registry());
        match parser.parse(&args(&["stake"])) {
            ParseOutcome::Error { message, printed } => {
                assert_eq!(message, "unknown command or flag: stake");
                assert!(!printed);
            }
            _ => panic!("expected Error"),
        }
    }

    #[test]
    fn test_group_alone_requires_a_subcommand() {
        let parser = CommandParser::new(registry());
        match parser.parse(&args(&["account"])) {
            ParseOutcome::NoCommand { chain } => {
                assert_eq!(chain[0].available_commands(), vec!["list", "new"]);
            }
            _ => panic!("expected NoCommand"),
        }
    }

    #[test]
    fn test_help_is_classified_not_an_error() {
        let parser = CommandParser::new(registry());
        assert!(matches!(
            parser.parse(&args(&["--help"])),
            ParseOutcome::Help { .. }
        ));
        assert!(matches!(
            parser.parse(&args(&["send", "-h"])),
            ParseOutcome::Help { .. }
        ));
    }
}

// ============================================================================
// Amount Handling Tests
// ============================================================================

mod amounts {
    use super::*;

    #[test]
    fn test_parse_and_format_roundtrip() {
        for text in ["0.00000001", "1.00000000", "42.50000000"] {
            let atoms = parse_amount(text).unwrap();
            assert_eq!(format_amount(atoms), format!("{text} VLA"));
        }
    }

    #[test]
    fn test_parse_rejects_malformed_amounts() {
        for text in ["", "abc", "-1", "1.2.3", "0.123456789"] {
            assert!(parse_amount(text).is_err(), "accepted {text:?}");
        }
    }
}
