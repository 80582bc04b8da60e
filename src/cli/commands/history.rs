//! Transaction history command

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};

use crate::wallet::{format_amount, WalletHandle};

use super::print_success;

/// Default number of transactions shown
const DEFAULT_LIMIT: usize = 20;

/// Run the history command
pub async fn run(wallet: &WalletHandle, args: &[String]) -> Result<()> {
    let limit = match args {
        [] => DEFAULT_LIMIT,
        [limit] => limit
            .parse()
            .map_err(|_| anyhow!("invalid limit: {limit}"))?,
        _ => return Err(anyhow!("usage: history [limit]")),
    };

    wallet.open_wallet().await?;
    let transactions = wallet.transactions(limit).await?;

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    print_success(&format!(
        "Transaction History ({} transactions)",
        transactions.len()
    ));
    println!();
    println!(
        "{:<20} {:<10} {:<16} {:<6} {:<12}",
        "Time", "Direction", "Amount", "Conf", "Tx Hash"
    );
    println!("{}", "-".repeat(70));

    for tx in &transactions {
        let time = Utc
            .timestamp_opt(tx.timestamp, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| tx.timestamp.to_string());
        let hash_short = if tx.hash.len() > 12 {
            &tx.hash[..12]
        } else {
            &tx.hash
        };

        println!(
            "{:<20} {:<10} {:<16} {:<6} {}...",
            time,
            tx.direction,
            format_amount(tx.amount),
            tx.confirmations,
            hash_short
        );
    }

    Ok(())
}
