//! Filesystem locations used by popstack

use std::path::PathBuf;

use crate::constants::ui::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Root config directory (`~/.popstack`), falling back to the working directory
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default options file
pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}
