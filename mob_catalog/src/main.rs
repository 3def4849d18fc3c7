#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Mob Catalog **
//! HTTP server for browsing and editing mob records

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use mob_catalog::config::DEFAULT_CONFIG_FILE;
use mob_catalog::{AppState, CATALOG_VERSION, CatalogConfig, JsonFileStore, load_config, router};

#[derive(Parser)]
#[command(author, version, about = "Serve the mob catalog over HTTP.")]
struct Cli {
    /// TOML configuration file. Missing is fine; defaults are used.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Listen address, e.g. 0.0.0.0:5000.
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Mob catalog JSON file.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Directory served for non-API paths (index.html and friends).
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut CatalogConfig) {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(data) = self.data {
            config.data_file = data;
        }
        if let Some(dir) = self.static_dir {
            config.static_dir = Some(dir);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config(&cli.config);
    config.apply_env().context("while reading environment overrides")?;
    cli.apply(&mut config);

    info!(
        "mob_catalog {CATALOG_VERSION}: data file '{}', static dir {:?}",
        config.data_file.display(),
        config.static_dir
    );

    let store = Arc::new(JsonFileStore::new(&config.data_file));
    let app = router(AppState::new(store), config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!("listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("while serving HTTP")?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
