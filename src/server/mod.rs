mod config;
mod error;
mod routes;

pub use config::{LoggingSection, RelaySection, ServerConfig, ServerSection, StoreSection};
pub use error::ApiError;
pub use routes::build_router;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::db::OverlayStore;

/// Bind and serve the overlay API until a shutdown signal arrives.
pub async fn run(config: &ServerConfig, store: Arc<OverlayStore>) -> Result<(), anyhow::Error> {
  let app = build_router(store);
  let addr = config.address();
  let listener = TcpListener::bind(&addr).await?;
  tracing::info!("Overlay API listening on {}", addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  tracing::info!("Overlay API stopped");
  Ok(())
}

/// Resolve on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
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
