use anyhow::Result;
use clap::Parser;
use pulse_core::config::AuthPolicy;
use pulse_core::notify::{NoopNotifier, Notifier, WebhookNotifier};
use pulse_core::storage::store::Store;
use pulse_server::config::ServerConfig;
use pulse_server::routes;
use pulse_server::state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pulse-server", version, about = "Satisfaction survey service")]
struct Args {
    /// Overrides PULSE_DB.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Overrides PULSE_PORT.
    #[arg(long)]
    port: Option<u16>,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = ServerConfig::from_env();
    if let Some(db) = args.db {
        cfg.db_path = db;
    }
    if let Some(port) = args.port {
        cfg.port = port;
    }
    init_logging(&cfg.log_level);

    let policy = AuthPolicy::from_env();
    let store = Store::open(&cfg.db_path)?;
    store.init_schema()?;

    let notifier: Arc<dyn Notifier> = match &cfg.notify_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(NoopNotifier),
    };

    let state = AppState::shared(store, policy, notifier);
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        event = "server_start",
        addr = %addr,
        db = ?cfg.db_path,
        notify = cfg.notify_url.is_some()
    );
    axum::serve(listener, app).await?;
    Ok(())
}
