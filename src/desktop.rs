//! Desktop shell mode
//!
//! Hand-off boundary to the desktop front-end. The shell owns the wallet
//! connection for the rest of the process lifetime; rendering proper
//! lives outside this crate, so this module drives a minimal periodic
//! status view until interrupted. With `--desktop-http` the HTTP API is
//! served alongside it on the configured address.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::wallet::{format_amount, WalletHandle};
use crate::web;

/// Seconds between status refreshes
const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Runs the desktop shell until the user quits.
pub async fn run(wallet: WalletHandle, config: &AppConfig) -> Result<()> {
    println!("Running in desktop mode");

    let wallet = Arc::new(wallet);

    if config.desktop_http {
        let api_wallet = Arc::clone(&wallet);
        let api_addr = config.http_server_address.clone();
        tokio::spawn(async move {
            if let Err(e) = web::serve_shared(api_addr, api_wallet).await {
                warn!("HTTP API stopped: {}", e);
            }
        });
    }

    wallet.open_wallet().await?;
    info!("desktop shell attached to {} wallet", wallet.backend_name());

    let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                render_status(&wallet).await;
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Shutting down.");
                return Ok(());
            }
        }
    }
}

async fn render_status(wallet: &WalletHandle) {
    match wallet.status().await {
        Ok(status) => {
            let balance = wallet
                .balance()
                .await
                .map(|b| format_amount(b.total))
                .unwrap_or_else(|_| "unavailable".to_string());
            println!(
                "[{}] height {} | balance {}",
                status.network, status.sync_height, balance
            );
        }
        Err(e) => warn!("status refresh failed: {}", e),
    }
}
