//! Balance check command

use anyhow::{anyhow, Result};

use crate::wallet::{format_amount, WalletHandle};

use super::print_success;

/// Run the balance command
pub async fn run(wallet: &WalletHandle, args: &[String]) -> Result<()> {
    let detailed = match args {
        [] => false,
        [flag] if flag == "--detailed" => true,
        _ => return Err(anyhow!("usage: balance [--detailed]")),
    };

    wallet.open_wallet().await?;
    let balance = wallet.balance().await?;

    print_success(&format!("Balance: {}", format_amount(balance.total)));

    if detailed {
        println!();
        println!("  Spendable:   {}", format_amount(balance.spendable));
        println!("  Unconfirmed: {}", format_amount(balance.unconfirmed));
    }

    Ok(())
}
