use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use homework_bot::config;
use homework_bot::logging::{self, CRITICAL_TARGET};
use homework_bot::notifier::TelegramSink;
use homework_bot::practicum::PracticumClient;
use homework_bot::watcher::Watcher;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    config::load_env_file(Path::new(".env"))?;

    let cfg = match config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(target: CRITICAL_TARGET, "{}", err);
            return Err(err.into());
        }
    };

    let api = PracticumClient::from_config(&cfg)?;
    let sink = TelegramSink::from_config(&cfg);
    let watcher = Watcher::new(Arc::new(api), Arc::new(sink), cfg.retry_interval);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            shutdown.cancel();
        }
    });

    info!("starting homework status bot");
    watcher.run(cancel).await;
    Ok(())
}
