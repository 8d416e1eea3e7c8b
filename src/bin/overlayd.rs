use clap::Parser;
use overlayd::db::OverlayStore;
use overlayd::server::{self, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "overlayd", about = "Livestream overlay API server", version)]
struct Args {
  #[arg(long, env = "OVERLAYD_STORE_PATH")]
  store: Option<String>,
  #[arg(short, long)]
  port: Option<u16>,
  #[arg(long)]
  host: Option<String>,
  #[arg(short, long)]
  config: Option<String>,
  #[arg(long)]
  log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
  let args = Args::parse();

  // Load config: explicit path > auto-detect > defaults
  let mut config = if let Some(path) = &args.config {
    ServerConfig::from_file(path)?
  } else {
    ServerConfig::find_and_load()?.unwrap_or_default()
  };

  // CLI args override config file
  if let Some(path) = args.store {
    config.store.path = path;
  }
  if let Some(port) = args.port {
    config.server.port = port;
  }
  if let Some(host) = args.host {
    config.server.host = host;
  }
  if let Some(level) = args.log_level {
    config.logging.level = level;
  }

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  // Initialization is best-effort: a store that cannot be opened serves
  // 503s instead of failing the whole process.
  let store = Arc::new(OverlayStore::open(&config.store.path).await);
  if !store.is_available().await {
    tracing::warn!("starting degraded: every overlay operation will answer 503");
  }

  server::run(&config, store).await
}
