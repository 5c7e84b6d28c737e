//! Typed error variants for the terrarum-sans-config crate.
//!
//! Callers that go through `anyhow` can still recover the variant with
//! `downcast_ref::<ConfigError>()`.

use std::fmt;

/// Errors that can occur when loading, saving or validating a [`FontConfig`].
///
/// [`FontConfig`]: crate::FontConfig
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    Io(std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    Parse(serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and the reason.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error reading font config: {e}"),
            ConfigError::Parse(e) => write!(f, "YAML parse error in font config: {e}"),
            ConfigError::Validation(msg) => write!(f, "Font config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ConfigError::Parse(e)
    }
}
