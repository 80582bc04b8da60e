//! Send command

use anyhow::{anyhow, Result};

use crate::wallet::{format_amount, parse_amount, WalletHandle};

use super::{print_success, prompt_confirm};

/// Run the send command
pub async fn run(wallet: &WalletHandle, args: &[String]) -> Result<()> {
    let (address, amount_str) = match args {
        [address, amount] => (address.as_str(), amount.as_str()),
        _ => return Err(anyhow!("usage: send <address> <amount>")),
    };

    let amount = parse_amount(amount_str)?;

    wallet.open_wallet().await?;

    let message = format!("Send {} to {}?", format_amount(amount), address);
    if !prompt_confirm(&message)? {
        println!("Canceled.");
        return Ok(());
    }

    let tx_hash = wallet.send(address, amount).await?;

    print_success("Transaction submitted");
    println!("Tx hash: {}", tx_hash);

    Ok(())
}
