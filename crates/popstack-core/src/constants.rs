//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

use std::time::Duration;

/// Transition defaults handed to the transition controller
pub mod transition {
    /// Default enter/exit animation duration in milliseconds
    pub const DEFAULT_DURATION_MS: u64 = 200;
}

/// Background (dimmer) configuration
pub mod background {
    use super::*;

    /// Delay before re-checking whether the background should hide.
    /// Long enough to let a hide followed by a push land in the same turn.
    pub const DEBOUNCE: Duration = Duration::from_millis(1);

    /// Crossfade duration used by the default show/hide style
    pub const FADE_DURATION_MS: u64 = 300;

    /// Translation that parks the dimmer off-screen
    pub const HIDDEN_OFFSET: (f32, f32, f32) = (-1000.0, -1000.0, -1000.0);

    /// Translation that brings the dimmer in front of the scene
    pub const VISIBLE_OFFSET: (f32, f32, f32) = (0.0, 0.0, 1000.0);
}

/// Event topics
pub mod topics {
    /// Emitted when a popup becomes the shown element
    pub const POPUP: &str = "popup";

    /// Emitted when a popup leaves the queue (payload absent on clear)
    pub const HIDE: &str = "hide";

    /// Engine topic for structured, non-fatal error reports
    pub const ERROR: &str = "error";

    /// Default namespace for controller commands on the engine (`popup-push`, ...)
    pub const DEFAULT_NAMESPACE: &str = "popup";
}

/// Paths and file names
pub mod ui {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".popstack";

    /// Config file name inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}
