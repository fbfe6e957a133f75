//! Popup controller error types

use thiserror::Error;

/// Popup error type
#[derive(Debug, Error)]
pub enum PopupError {
    /// `hide(target)` was asked to remove a popup that is not queued
    #[error("couldn't find popup to hide: {0}")]
    TargetNotFound(String),

    /// Global command routing was requested without an engine to route from
    #[error("global commands enabled but no engine was supplied")]
    MissingEngine,

    /// Options could not be parsed
    #[error("invalid popup options: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result alias for popup operations
pub type PopupResult<T> = Result<T, PopupError>;
