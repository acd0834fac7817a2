use std::path::PathBuf;
use std::{env, fs};

use serde::Deserialize;
use tracing::debug;

const CONFIG_FILE: &str = "othello.toml";

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory save files are written to and read from.
    pub save_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saved"),
        }
    }
}

/// Layers settings: built-in defaults, then `othello.toml` from the
/// working directory if present, then the `OTHELLO_SAVE_DIR` environment
/// variable.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        match toml::from_str::<Settings>(&raw) {
            Ok(file_cfg) => settings = file_cfg,
            Err(err) => debug!(%err, "ignoring malformed {CONFIG_FILE}"),
        }
    }

    if let Ok(dir) = env::var("OTHELLO_SAVE_DIR") {
        settings.save_dir = PathBuf::from(dir);
    }

    settings
}
