//! Stream relay tests - encoder command construction

use overlayd::relay::{RelayConfig, StreamRelay};
use std::path::PathBuf;

fn relay(dir: &str, seconds: u32) -> StreamRelay {
  StreamRelay::new(RelayConfig {
    source_url: "rtsp://example.com/stream".into(),
    output_dir: PathBuf::from(dir),
    segment_seconds: seconds,
  })
}

#[test]
fn test_encoder_argument_list() {
  let args = relay("hls_streams", 4).encoder_args();
  assert_eq!(
    args,
    vec![
      "-rtsp_transport",
      "tcp",
      "-i",
      "rtsp://example.com/stream",
      "-c:v",
      "libx264",
      "-c:a",
      "aac",
      "-f",
      "hls",
      "-hls_time",
      "4",
      "-hls_list_size",
      "5",
      "-hls_flags",
      "delete_segments",
      "-hls_segment_filename",
      "hls_streams/segment_%03d.ts",
      "hls_streams/stream.m3u8",
    ]
  );
}

#[test]
fn test_segment_duration_is_configurable() {
  let args = relay("out", 10).encoder_args();
  let at = args.iter().position(|a| a == "-hls_time").unwrap();
  assert_eq!(args[at + 1], "10");
}

#[test]
fn test_output_paths_follow_output_dir() {
  let config = RelayConfig {
    source_url: "rtsp://example.com/stream".into(),
    output_dir: PathBuf::from("/srv/hls"),
    segment_seconds: 4,
  };
  assert_eq!(config.playlist_path(), PathBuf::from("/srv/hls/stream.m3u8"));
  assert_eq!(
    config.segment_pattern(),
    PathBuf::from("/srv/hls/segment_%03d.ts")
  );
}
