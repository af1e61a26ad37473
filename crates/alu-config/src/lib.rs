//! alu-config
//!
//! Persistent operator preferences and backend selection.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{resolve_home_dir, BackendConfig, BackendKind, Config};
