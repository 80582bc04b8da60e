//! Version command

use anyhow::{anyhow, Result};

/// Run the version command
pub async fn run(args: &[String]) -> Result<()> {
    if !args.is_empty() {
        return Err(anyhow!("usage: version"));
    }

    println!("vela-wallet {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
