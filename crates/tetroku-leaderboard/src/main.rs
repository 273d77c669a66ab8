use std::{
    future,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tetroku_leaderboard::{AnyVerifier, AppState, ScoreStore, ServerConfig, router};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Tetroku leaderboard server", long_about = None)]
struct Args {
    /// Server configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to listen on; overrides the config file
    #[arg(long)]
    listen: Option<SocketAddr>,
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(level)
        .init();

    let mut config = match &args.config {
        Some(path) => load_config(path).await?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    let verifier = config.verifier.build().context("Invalid captcha verifier")?;
    if let AnyVerifier::Static(tokens) = &verifier {
        if tokens.is_empty() {
            tracing::warn!("no captcha verifier configured; every submission will be rejected");
        } else {
            tracing::warn!("using static captcha tokens; do not expose this server");
        }
    }
    let store = match &config.store_path {
        Some(path) => ScoreStore::open(path).await?,
        None => ScoreStore::in_memory(),
    };
    let origins = config.cors_origins()?;
    let app = router(Arc::new(AppState { store, verifier }), origins);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to listen on {}", config.listen))?;
    tracing::info!(addr = %config.listen, "leaderboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to open server config file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse server config JSON file: {}", path.display()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c");
        future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
