use clap::Parser;
use overlayd::relay::{RelayConfig, StreamRelay};
use overlayd::server::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
  name = "overlay-relay",
  about = "Pipe a network stream into HLS segments via ffmpeg",
  version
)]
struct Args {
  /// Source stream address (e.g. rtsp://example.com/stream)
  #[arg(env = "OVERLAY_RELAY_URL")]
  url: Option<String>,
  #[arg(long, env = "OVERLAY_RELAY_OUTPUT_DIR")]
  output_dir: Option<String>,
  #[arg(long)]
  segment_seconds: Option<u32>,
  #[arg(short, long)]
  config: Option<String>,
  #[arg(long)]
  log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
  let args = Args::parse();

  let mut config = if let Some(path) = &args.config {
    ServerConfig::from_file(path)?
  } else {
    ServerConfig::find_and_load()?.unwrap_or_default()
  };

  // CLI args override config file
  if let Some(url) = args.url {
    config.relay.source_url = Some(url);
  }
  if let Some(dir) = args.output_dir {
    config.relay.output_dir = dir;
  }
  if let Some(seconds) = args.segment_seconds {
    config.relay.segment_seconds = seconds;
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

  let source_url = config
    .relay
    .source_url
    .ok_or_else(|| anyhow::anyhow!("no source URL given (argument, env, or relay.source_url)"))?;

  let relay = StreamRelay::new(RelayConfig {
    source_url,
    output_dir: config.relay.output_dir.into(),
    segment_seconds: config.relay.segment_seconds,
  });

  relay.run(shutdown_signal()).await
}

async fn shutdown_signal() {
  let ctrl_c = async {
    tokio::signal::ctrl_c()
      .await
      .expect("Failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
      .expect("Failed to install SIGTERM handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => tracing::info!("Received SIGINT"),
    _ = terminate => tracing::info!("Received SIGTERM"),
  }
}
