//! Optional TOML configuration.
//!
//! ```toml
//! [ela]
//! scale = 20
//! quality = 90
//! wrap = false
//!
//! [sweep]
//! start = 0.0
//! end = 360.0
//! step = 0.5
//! every = 30
//! ```
//!
//! Missing tables and keys fall back to the defaults. Command-line flags
//! override whatever the file says.

use std::path::Path;

use anyhow::{Context, Result};
use elacrop_core::ela::{DEFAULT_QUALITY, DEFAULT_SCALE};
use elacrop_core::sweep::AngleSweep;
use elacrop_core::AmplifyMode;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ela: ElaConfig,
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElaConfig {
    pub scale: u8,
    pub quality: u8,
    pub wrap: bool,
}

impl Default for ElaConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            quality: DEFAULT_QUALITY,
            wrap: false,
        }
    }
}

impl ElaConfig {
    pub fn mode(&self) -> AmplifyMode {
        if self.wrap {
            AmplifyMode::Wrap
        } else {
            AmplifyMode::Saturate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    /// Save every Nth frame.
    pub every: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let sweep = AngleSweep::default();
        Self {
            start: sweep.start,
            end: sweep.end,
            step: sweep.step,
            every: 1,
        }
    }
}

impl SweepConfig {
    pub fn angles(&self) -> AngleSweep {
        AngleSweep::new(self.start, self.end, self.step)
    }
}

impl Config {
    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                let config = Self::parse(&content)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?;
                tracing::debug!(path = %path.display(), ?config, "loaded config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
