use aki_backend::{
    create_router, AppState, AudioFile, Config, FileSink, MemoryStore, WebSocketFactory,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "aki-backend", about = "Live voice chat backend")]
struct Cli {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/aki")]
    config: String,

    /// Override the HTTP port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config).context("Failed to load config")?;
    if let Some(port) = cli.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Live model: {}", cfg.live.model);
    info!("Memory file: {}", cfg.memory.path);
    if cfg.live.api_key.is_none() {
        warn!("No live API key configured (set GEMINI_API_KEY)");
    }

    let sink = Arc::new(FileSink::new(&cfg.turn.audio_output));
    info!("Reply audio: per-session files beside {}", sink.base().display());

    // Report the last persisted reply, if any
    match sink.latest() {
        Ok(Some(reply_path)) => match AudioFile::open(&reply_path) {
            Ok(audio) => info!(
                "Last reply {}: {:.1}s at {}Hz ({} channels)",
                reply_path.display(),
                audio.duration_seconds,
                audio.format.sample_rate,
                audio.format.channels
            ),
            Err(e) => warn!("Could not read last reply {}: {:#}", reply_path.display(), e),
        },
        Ok(None) => {}
        Err(e) => warn!("Could not look for previous replies: {:#}", e),
    }

    let transports = WebSocketFactory::new(cfg.live.endpoint.clone(), cfg.live.api_key.clone());
    let state = AppState::new(
        Arc::new(MemoryStore::new(&cfg.memory.path, cfg.memory.history_limit)),
        Arc::new(transports),
        sink,
        cfg.session_config(),
    );
    let shutdown = state.shutdown.clone();

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
            shutdown.cancel();
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}
