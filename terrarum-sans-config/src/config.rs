//! The per-instance font configuration and its YAML persistence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::CharsetOverride;

/// Largest accepted pixel scale.
pub const MAX_SCALE: u32 = 64;

/// Settings owned by a single font instance.
///
/// Two fonts built from different configs never influence each other; the
/// scale and spacing that used to be process-wide live here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Integer pixel scale applied to every position the font reports
    #[serde(default = "crate::defaults::scale")]
    pub scale: u32,

    /// Extra pixels inserted between consecutive base glyphs
    #[serde(default = "crate::defaults::interchar")]
    pub interchar: i32,

    /// Apply pairwise kerning rules
    #[serde(default = "crate::defaults::kerning")]
    pub kerning: bool,

    /// Fail a shaping call on a codepoint with no metadata instead of
    /// falling back to the default glyph property
    #[serde(default = "crate::defaults::strict_metadata")]
    pub strict_metadata: bool,

    /// Maximum number of shaped runs kept by the shaping cache
    #[serde(default = "crate::defaults::cache_capacity")]
    pub cache_capacity: usize,

    /// Rebuild the first cached run requested after construction even when
    /// its hash is already present
    #[serde(default = "crate::defaults::first_use_rebuild")]
    pub first_use_rebuild: bool,

    /// Seed for the cache's eviction generator; `None` seeds from the
    /// process's random hasher state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_seed: Option<u64>,

    /// Charset in effect at the start of every run
    #[serde(default)]
    pub charset: CharsetOverride,

    /// Directory holding the sprite sheets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_dir: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            scale: crate::defaults::scale(),
            interchar: crate::defaults::interchar(),
            kerning: crate::defaults::kerning(),
            strict_metadata: crate::defaults::strict_metadata(),
            cache_capacity: crate::defaults::cache_capacity(),
            first_use_rebuild: crate::defaults::first_use_rebuild(),
            cache_seed: None,
            charset: CharsetOverride::default(),
            asset_dir: None,
        }
    }
}

impl FontConfig {
    /// Builder-style setter for the asset directory.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }

    /// Check field values that serde cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale == 0 {
            return Err(ConfigError::Validation(
                "scale must be at least 1".to_string(),
            ));
        }
        if self.scale > MAX_SCALE {
            return Err(ConfigError::Validation(format!(
                "scale must be at most {MAX_SCALE}, got {}",
                self.scale
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Read and validate a config from a YAML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading font config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        let config: FontConfig = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as YAML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Load the config from [`default_path`](Self::default_path), or fall
    /// back to defaults when no file exists yet.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::default_path();
        log::info!("Font config path: {:?}", config_path);

        if config_path.exists() {
            Ok(Self::load_from(&config_path)?)
        } else {
            log::info!("Font config not found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Default config location: `~/.config/terrarum-sans/font.yaml`.
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("terrarum-sans").join("font.yaml")
            } else {
                PathBuf::from("font.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("terrarum-sans")
                    .join("font.yaml")
            } else {
                PathBuf::from("font.yaml")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FontConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_scale_rejected() {
        let config = FontConfig {
            scale: 0,
            ..FontConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_huge_scale_rejected() {
        let at_limit = FontConfig {
            scale: MAX_SCALE,
            ..FontConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        for scale in [MAX_SCALE + 1, i32::MAX as u32 + 1, u32::MAX] {
            let config = FontConfig {
                scale,
                ..FontConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "scale {scale} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = FontConfig {
            cache_capacity: 0,
            ..FontConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: FontConfig = serde_yaml_ng::from_str("interchar: 2\n").unwrap();
        assert_eq!(config.interchar, 2);
        assert_eq!(config.scale, 1);
        assert!(config.kerning);
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.charset, CharsetOverride::Default);
    }

    #[test]
    fn test_default_path_file_name() {
        assert!(FontConfig::default_path().ends_with("font.yaml"));
    }
}
