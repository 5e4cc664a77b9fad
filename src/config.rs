//! Explicit configuration values passed into every construction call.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{MemeError, MemeResult};
use crate::text::MAX_FONT_SIZE;

/// Environment variable overriding [`MemeConfig::font`].
pub const FONT_ENV_VAR: &str = "MEMEOID_FONT";

/// Font sizing and box geometry policy for a layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Smallest font size the resolver may pick.
    pub min_font_size: f32,
    /// Largest font size the resolver tries first.
    pub max_font_size: f32,
    /// Fraction of the image dimension reserved as margin.
    pub border: f32,
    /// Fraction of the line height used as spacing between wrapped lines.
    pub line_spacing: f32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_font_size: 8.0,
            max_font_size: 52.0,
            border: 0.01,
            line_spacing: 0.3,
        }
    }
}

impl FitConfig {
    /// Same policy with a different font size range.
    pub fn with_font_sizes(mut self, max_font_size: f32, min_font_size: f32) -> Self {
        self.max_font_size = max_font_size;
        self.min_font_size = min_font_size;
        self
    }

    /// Check the ranges are usable.
    pub fn validate(&self) -> MemeResult<()> {
        if !self.min_font_size.is_finite() || self.min_font_size <= 0.0 {
            return Err(MemeError::config("min_font_size must be finite and > 0"));
        }
        if !self.max_font_size.is_finite() || self.max_font_size < self.min_font_size {
            return Err(MemeError::config(
                "max_font_size must be finite and >= min_font_size",
            ));
        }
        if self.max_font_size > MAX_FONT_SIZE {
            return Err(MemeError::config(format!(
                "max_font_size must be <= {MAX_FONT_SIZE}"
            )));
        }
        // Default boxes are `1/3 - border` of the image height tall.
        if !(0.0..1.0 / 3.0).contains(&self.border) {
            return Err(MemeError::config("border must be in [0, 1/3)"));
        }
        if !self.line_spacing.is_finite() || self.line_spacing < 0.0 {
            return Err(MemeError::config("line_spacing must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Process-level settings for the CLI and the request service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemeConfig {
    /// Font name looked up in the host font database.
    pub font: String,
    /// Directory holding source gifs.
    pub image_dir: PathBuf,
    /// Directory receiving generated memes.
    pub meme_dir: PathBuf,
    /// URL prefix under which generated memes are served.
    pub meme_url: String,
    /// Compositor worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Font sizing policy.
    pub fit: FitConfig,
}

impl Default for MemeConfig {
    fn default() -> Self {
        Self {
            font: "DejaVuSans".to_string(),
            image_dir: PathBuf::from("./fixtures"),
            meme_dir: PathBuf::from("./memes"),
            meme_url: "meme".to_string(),
            threads: None,
            fit: FitConfig::default(),
        }
    }
}

impl MemeConfig {
    /// Load a JSON config file, or defaults when `path` is `None`.
    ///
    /// The font can be overridden with the `MEMEOID_FONT` environment variable.
    pub fn load(path: Option<&Path>) -> MemeResult<Self> {
        let mut cfg = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p).map_err(|e| {
                    MemeError::config(format!("failed to read config '{}': {e}", p.display()))
                })?;
                serde_json::from_str::<Self>(&raw).map_err(|e| {
                    MemeError::config(format!("failed to parse config '{}': {e}", p.display()))
                })?
            }
            None => Self::default(),
        };
        if let Ok(font) = std::env::var(FONT_ENV_VAR)
            && !font.trim().is_empty()
        {
            cfg.font = font;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field is usable.
    pub fn validate(&self) -> MemeResult<()> {
        if self.font.trim().is_empty() {
            return Err(MemeError::config("font must be non-empty"));
        }
        if let Some(0) = self.threads {
            return Err(MemeError::config("threads must be >= 1 when set"));
        }
        self.fit.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
