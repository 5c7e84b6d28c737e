//! Configuration for the Terrarum Sans shaping engine.
//!
//! Every font instance owns its own [`FontConfig`]; nothing here is global.
//! The crate provides:
//!
//! - The `FontConfig` struct with serde defaults
//! - YAML persistence (`load_from` / `save_to`, atomic writes)
//! - Typed [`ConfigError`] variants for I/O, parse and validation failures
//! - The initial charset override selector ([`CharsetOverride`])

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::{FontConfig, MAX_SCALE};
pub use error::ConfigError;
pub use types::CharsetOverride;
