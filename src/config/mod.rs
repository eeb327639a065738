//! Configuration file management
//!
//! Loads TOML configuration files and provides generator settings.
//! Default config path: ~/.config/fontgen/config.toml

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_CHARSET, DEFAULT_DPI, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_PADDING,
    IMAGE_POSTFIX, MAX_PADDING, MINIMAL_ATLAS_SIZE, RESOURCE_PREFIX,
};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font settings
    pub font: FontConfig,
    /// Packing settings
    pub atlas: AtlasConfig,
    /// Characters to pack
    pub charset: CharsetConfig,
    /// Output naming and location
    pub output: OutputConfig,
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Family name (looked up via fontconfig) or font file path
    pub family: String,
    /// Size in points
    pub size: f32,
    /// Style passed to fontconfig ("Bold", "Italic", ...), empty = regular
    pub style: String,
    /// Resolution used to convert points to pixels
    pub dpi: f32,
}

/// Packing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Margin added to every cell (0-32 pixels)
    pub padding: u32,
    /// Largest glyph box accepted while measuring (pixels)
    pub scratch_size: u32,
}

/// Character set settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharsetConfig {
    /// Ordered characters to pack (duplicates are packed twice)
    pub chars: String,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the .ffnt and PNG are written to
    pub dir: String,
    /// Prefix of the image resource name in the descriptor
    pub resource_prefix: String,
    /// Suffix shared by the image file and resource names
    pub image_postfix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            atlas: AtlasConfig::default(),
            charset: CharsetConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            style: String::new(),
            dpi: DEFAULT_DPI,
        }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            scratch_size: MINIMAL_ATLAS_SIZE,
        }
    }
}

impl Default for CharsetConfig {
    fn default() -> Self {
        Self {
            chars: DEFAULT_CHARSET.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            resource_prefix: RESOURCE_PREFIX.to_string(),
            image_postfix: IMAGE_POSTFIX.to_string(),
        }
    }
}

impl FontConfig {
    /// fontconfig style, None for regular
    pub fn style(&self) -> Option<&str> {
        let style = self.style.trim();
        if style.is_empty() {
            None
        } else {
            Some(style)
        }
    }

    /// Rasterize size in pixels per em
    pub fn pixel_size(&self) -> f32 {
        self.size * self.dpi / crate::constants::POINTS_PER_INCH
    }
}

impl Config {
    /// User config path: ~/.config/fontgen/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fontgen").join("config.toml"))
    }

    /// Load configuration with priority:
    /// 1. Explicit path (must exist and parse)
    /// 2. ~/.config/fontgen/config.toml (falls back to defaults if broken)
    /// 3. Built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!("Loaded config: {}", path.display());
            return Ok(config);
        }

        if let Some(path) = Self::default_path().filter(|p| p.exists()) {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return Ok(config);
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }

        info!("Using built-in default config");
        Ok(Self::default())
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.atlas.padding > MAX_PADDING {
            bail!(
                "atlas.padding = {} is out of range (0-{})",
                self.atlas.padding,
                MAX_PADDING
            );
        }
        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            bail!("font.size must be positive (got {})", self.font.size);
        }
        if !(self.font.dpi.is_finite() && self.font.dpi > 0.0) {
            bail!("font.dpi must be positive (got {})", self.font.dpi);
        }
        if self.atlas.scratch_size == 0 {
            bail!("atlas.scratch_size must be positive");
        }
        if self.font.family.trim().is_empty() {
            bail!("font.family is empty");
        }
        Ok(())
    }

    /// Write the default config template to `path`
    pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        let content = format!(
            "# fontgen configuration\n# Command line flags override these values.\n\n{}",
            content
        );
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [font]
            family = "Liberation Serif"

            [atlas]
            padding = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.font.family, "Liberation Serif");
        assert_eq!(config.font.size, DEFAULT_FONT_SIZE);
        assert_eq!(config.atlas.padding, 4);
        assert_eq!(config.atlas.scratch_size, MINIMAL_ATLAS_SIZE);
        assert_eq!(config.charset.chars, DEFAULT_CHARSET);
        assert_eq!(config.output.resource_prefix, "Fonts.");
    }

    #[test]
    fn test_validate_padding() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.atlas.padding = 33;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pixel_size() {
        let font = FontConfig {
            size: 24.0,
            dpi: 96.0,
            ..FontConfig::default()
        };
        assert!((font.pixel_size() - 32.0).abs() < 1e-4);
        assert_eq!(font.style(), None);
    }

    #[test]
    fn test_write_and_reload_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::write_default_config(&path, false).unwrap();
        assert!(Config::write_default_config(&path, false).is_err());
        Config::write_default_config(&path, true).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(dir.path().join("missing.toml").as_path())).is_err());
    }
}
