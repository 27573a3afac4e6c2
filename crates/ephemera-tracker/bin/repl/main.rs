mod cli;
mod repl;

use crate::cli::{GatewayArg, StorageBackendArg, CLI};
use clap::Parser;
use ephemera_core::SystemClock;
use ephemera_gateway::{Gateway, SeqGateway, TinyUrlGateway};
use ephemera_storage::{DurableStore, FileStore, InMemoryStore};
use ephemera_tracker::{Session, SessionSettings};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_TRACING_LEVEL: &str = "ephemera=info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_TRACING_LEVEL.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::try_parse()?;

    info!(
        storage_backend = %config.storage,
        data_dir = %config.data_dir.display(),
        gateway = %config.gateway,
        sweep_interval_secs = config.sweep_interval_secs,
        "starting ephemera"
    );

    let durable: Arc<dyn DurableStore> = match config.storage {
        StorageBackendArg::File => {
            let store = FileStore::open(&config.data_dir)?;
            match config.quota_bytes {
                Some(quota) => Arc::new(store.with_quota(quota)),
                None => Arc::new(store),
            }
        }
        StorageBackendArg::InMemory => Arc::new(InMemoryStore::new()),
    };

    let gateway: Arc<dyn Gateway> = match config.gateway {
        GatewayArg::TinyUrl => Arc::new(TinyUrlGateway::with_endpoint(config.tinyurl_endpoint)),
        GatewayArg::Offline => Arc::new(SeqGateway::new(config.offline_base_url, "wh")),
    };

    let settings = SessionSettings::builder()
        .sweep_interval(Duration::from_secs(config.sweep_interval_secs))
        .gateway_timeout(Duration::from_secs(config.gateway_timeout_secs))
        .build();

    let session = Session::init(settings, durable, gateway, SystemClock).await?;
    let outcome = repl::run(&session).await;
    session.teardown().await;

    outcome
}
