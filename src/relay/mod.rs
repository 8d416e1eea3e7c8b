use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use tokio::fs;
use tokio::process::Command;

/// Settings for one RTSP-to-HLS conversion.
#[derive(Debug, Clone)]
pub struct RelayConfig {
  /// Source stream address (e.g. rtsp://host:554/stream).
  pub source_url: String,
  /// Directory receiving the playlist and segment files.
  pub output_dir: PathBuf,
  /// Duration of each segment in seconds.
  pub segment_seconds: u32,
}

impl RelayConfig {
  pub fn playlist_path(&self) -> PathBuf {
    self.output_dir.join("stream.m3u8")
  }

  pub fn segment_pattern(&self) -> PathBuf {
    self.output_dir.join("segment_%03d.ts")
  }
}

/// Supervises one external encoder process that converts a network stream
/// into a rolling HLS playlist. The encoder is an opaque collaborator: the
/// relay only builds its fixed argument list and keeps it alive until a
/// termination signal arrives.
pub struct StreamRelay {
  config: RelayConfig,
}

impl StreamRelay {
  pub fn new(config: RelayConfig) -> Self {
    Self { config }
  }

  /// The fixed ffmpeg argument list: TCP-transport input, H.264/AAC
  /// transcode, HLS muxing with a 5-segment rolling window and
  /// old-segment deletion.
  pub fn encoder_args(&self) -> Vec<String> {
    vec![
      "-rtsp_transport".into(),
      "tcp".into(),
      "-i".into(),
      self.config.source_url.clone(),
      "-c:v".into(),
      "libx264".into(),
      "-c:a".into(),
      "aac".into(),
      "-f".into(),
      "hls".into(),
      "-hls_time".into(),
      self.config.segment_seconds.to_string(),
      "-hls_list_size".into(),
      "5".into(),
      "-hls_flags".into(),
      "delete_segments".into(),
      "-hls_segment_filename".into(),
      self.config.segment_pattern().to_string_lossy().into_owned(),
      self.config.playlist_path().to_string_lossy().into_owned(),
    ]
  }

  /// Run until the encoder exits on its own (an error) or `shutdown`
  /// resolves (normal termination, encoder killed). The caller supplies
  /// the shutdown future, typically a signal listener.
  pub async fn run(
    &self,
    shutdown: impl std::future::Future<Output = ()>,
  ) -> Result<(), anyhow::Error> {
    fs::create_dir_all(&self.config.output_dir)
      .await
      .with_context(|| {
        format!(
          "failed to create output directory {}",
          self.config.output_dir.display()
        )
      })?;

    tracing::info!(
      "Converting {} to HLS at {}",
      self.config.source_url,
      self.config.playlist_path().display()
    );

    let mut child = Command::new("ffmpeg")
      .args(self.encoder_args())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .kill_on_drop(true)
      .spawn()
      .context("failed to spawn ffmpeg (is it installed and on PATH?)")?;

    tokio::select! {
      status = child.wait() => {
        let status = status.context("failed to wait on ffmpeg")?;
        anyhow::bail!("ffmpeg exited unexpectedly with {}", status);
      }
      _ = shutdown => {
        tracing::info!("Stopping stream conversion...");
        child.kill().await.context("failed to stop ffmpeg")?;
        tracing::info!("Stream stopped");
        Ok(())
      }
    }
  }
}
