//! Popup controller options
//!
//! Loaded from TOML. The camelCase spellings (`inTransition`,
//! `outTransition`) are accepted as aliases so option files written for
//! other popup toolkits keep working.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::PopupError;
use crate::paths;
use crate::transition::TransitionOptions;

/// Easing curve name, passed through to the transition controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Curve {
    Linear,
    #[default]
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// Curve plus duration for one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSpec {
    #[serde(default)]
    pub curve: Curve,
    /// Milliseconds
    #[serde(rename = "duration", default = "default_duration_ms")]
    pub duration_ms: u64,
}

fn default_duration_ms() -> u64 {
    constants::transition::DEFAULT_DURATION_MS
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            curve: Curve::EaseIn,
            duration_ms: default_duration_ms(),
        }
    }
}

impl TransitionSpec {
    pub fn new(curve: Curve, duration_ms: u64) -> Self {
        Self { curve, duration_ms }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Background binding options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOptions {
    /// Delay before the hide re-check runs
    pub debounce_ms: u64,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            debounce_ms: constants::background::DEBOUNCE.as_millis() as u64,
        }
    }
}

impl BackgroundOptions {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Options recognized by the popup controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupOptions {
    /// Run outgoing and incoming animations concurrently
    pub overlap: bool,
    /// Subscribe commands on the engine under `<namespace>-<command>`
    pub global: bool,
    pub namespace: String,
    #[serde(alias = "inTransition")]
    pub in_transition: TransitionSpec,
    #[serde(alias = "outTransition")]
    pub out_transition: TransitionSpec,
    pub background: BackgroundOptions,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            overlap: false,
            global: false,
            namespace: constants::topics::DEFAULT_NAMESPACE.to_string(),
            in_transition: TransitionSpec::default(),
            out_transition: TransitionSpec::default(),
            background: BackgroundOptions::default(),
        }
    }
}

impl PopupOptions {
    /// Parse options from TOML text; absent keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, PopupError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load options from the default location (`~/.popstack/config.toml`)
    pub fn load() -> Result<Self> {
        Self::load_from_path(&paths::config_file())
    }

    /// Load options from a specific path. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No options file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options from {}", path.display()))?;
        let options = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse options in {}", path.display()))?;
        Ok(options)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The subset handed to the transition controller
    pub fn transition_options(&self) -> TransitionOptions {
        TransitionOptions {
            in_transition: self.in_transition,
            out_transition: self.out_transition,
            overlap: self.overlap,
        }
    }
}
