//! Configuration tests - defaults, YAML parsing, env expansion

use overlayd::server::ServerConfig;

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_defaults() {
  let config = ServerConfig::default();
  assert_eq!(config.server.host, "0.0.0.0");
  assert_eq!(config.server.port, 5000);
  assert_eq!(config.store.path, "overlays.json");
  assert_eq!(config.logging.level, "info");
  assert!(config.relay.source_url.is_none());
  assert_eq!(config.relay.output_dir, "hls_streams");
  assert_eq!(config.relay.segment_seconds, 4);
}

#[test]
fn test_address() {
  let mut config = ServerConfig::default();
  config.server.host = "127.0.0.1".into();
  config.server.port = 8080;
  assert_eq!(config.address(), "127.0.0.1:8080");
}

// =============================================================================
// YAML parsing
// =============================================================================

#[test]
fn test_full_yaml() {
  let yaml = r#"
server:
  host: 127.0.0.1
  port: 9001
store:
  path: /var/lib/overlayd/overlays.json
logging:
  level: debug
relay:
  source_url: rtsp://cam.local/stream
  output_dir: /srv/hls
  segment_seconds: 6
"#;

  let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();
  assert_eq!(config.server.host, "127.0.0.1");
  assert_eq!(config.server.port, 9001);
  assert_eq!(config.store.path, "/var/lib/overlayd/overlays.json");
  assert_eq!(config.logging.level, "debug");
  assert_eq!(
    config.relay.source_url.as_deref(),
    Some("rtsp://cam.local/stream")
  );
  assert_eq!(config.relay.output_dir, "/srv/hls");
  assert_eq!(config.relay.segment_seconds, 6);
}

#[test]
fn test_partial_yaml_keeps_defaults() {
  let yaml = r#"
server:
  port: 6000
"#;

  let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();
  assert_eq!(config.server.port, 6000);
  assert_eq!(config.server.host, "0.0.0.0");
  assert_eq!(config.store.path, "overlays.json");
}

#[test]
fn test_empty_sections_are_fine() {
  let config: ServerConfig = serde_yaml::from_str("{}").unwrap();
  assert_eq!(config.server.port, 5000);
}

// =============================================================================
// File loading with env expansion
// =============================================================================

#[test]
fn test_from_file_expands_env_vars() {
  std::env::set_var("OVERLAYD_TEST_STORE_DIR", "/tmp/overlayd-test");
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("overlayd.yaml");
  std::fs::write(
    &path,
    "store:\n  path: ${OVERLAYD_TEST_STORE_DIR}/overlays.json\n",
  )
  .unwrap();

  let config = ServerConfig::from_file(&path).unwrap();
  assert_eq!(config.store.path, "/tmp/overlayd-test/overlays.json");
}

#[test]
fn test_from_file_missing_is_an_error() {
  assert!(ServerConfig::from_file("/definitely/not/here.yaml").is_err());
}
