//! Account management commands

use anyhow::{anyhow, Result};

use crate::wallet::{format_amount, WalletHandle};

use super::print_success;

/// Run the account list command
pub async fn list(wallet: &WalletHandle, args: &[String]) -> Result<()> {
    if !args.is_empty() {
        return Err(anyhow!("usage: account list"));
    }

    wallet.open_wallet().await?;
    let accounts = wallet.accounts().await?;

    println!("{:<8} {:<16} {}", "Index", "Name", "Balance");
    println!("{}", "-".repeat(44));
    for account in &accounts {
        println!(
            "{:<8} {:<16} {}",
            account.index,
            account.name,
            format_amount(account.balance)
        );
    }

    Ok(())
}

/// Run the account new command
pub async fn new(wallet: &WalletHandle, args: &[String]) -> Result<()> {
    let name = match args {
        [name] => name.as_str(),
        _ => return Err(anyhow!("usage: account new <name>")),
    };

    wallet.open_wallet().await?;
    let account = wallet.create_account(name).await?;

    print_success(&format!(
        "Created account \"{}\" (index {})",
        account.name, account.index
    ));

    Ok(())
}
