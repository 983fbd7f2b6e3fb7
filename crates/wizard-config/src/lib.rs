//! wizard-config
//!
//! Persistent study configuration: validation policy inputs, autosave
//! cadence, and where progress and exports live on disk.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, ValidationSettings};
