//! Receive address command

use anyhow::{anyhow, Result};

use crate::wallet::WalletHandle;

use super::print_success;

/// Run the receive command
pub async fn run(wallet: &WalletHandle, args: &[String]) -> Result<()> {
    if !args.is_empty() {
        return Err(anyhow!("usage: receive"));
    }

    wallet.open_wallet().await?;
    let address = wallet.new_address().await?;

    print_success("Receive address:");
    println!("{}", address);

    Ok(())
}
