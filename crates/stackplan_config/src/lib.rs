//! Parsing and validation of `stackplan.toml` run configuration files.
//!
//! This crate reads the run configuration and produces a strongly-typed
//! [`RunConfig`] holding sample-design sizes, annealing schedule, energy
//! weights, and output locations.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_or_default, CONFIG_FILE_NAME};
pub use types::*;
