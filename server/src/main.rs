use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_server::{DocumentStore, MemoryStore, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();
    let store: Arc<dyn DocumentStore> = match &config.data_file {
        Some(path) => Arc::new(
            MemoryStore::open(path)
                .await
                .with_context(|| format!("opening document store at {}", path.display()))?,
        ),
        None => Arc::new(MemoryStore::new()),
    };

    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, persisted = config.data_file.is_some(), "todo server listening");

    let server = todo_server::serve(listener, todo_server::app_with_store(store));
    tokio::select! {
        result = server => result.context("serving HTTP")?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    Ok(())
}
