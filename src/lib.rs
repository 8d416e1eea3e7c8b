pub mod db;
pub mod relay;
pub mod server;
pub mod types;
