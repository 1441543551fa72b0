//! Application configuration.
//!
//! Resolution order:
//!
//! 1. Built-in defaults (directories under the platform data dir)
//! 2. `<internal_dir>/config.toml`, or the file given with `--config`
//! 3. `--internal-dir` from the command line
//!
//! A missing default config file is fine; a missing explicit one is not.
//!
//! ```toml
//! user_dir = "/home/me/notes"
//! internal_dir = "/home/me/notes/.notefold"
//!
//! [search]
//! enabled = true
//! engine = "local"
//! ```

use std::path::{Path, PathBuf};

use notefold_core::{Error, Result};
use notefold_search::SearchConfig;
use serde::{Deserialize, Serialize};

/// Name of the config file inside the internal directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Subdirectory of `user_dir` holding the notes.
pub const DATA_DIR: &str = "data";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root of the user's knowledge base.
    #[serde(default = "default_user_dir")]
    pub user_dir: PathBuf,

    /// Application-private state (config, local index snapshot).
    #[serde(default = "default_internal_dir")]
    pub internal_dir: PathBuf,

    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_dir: default_user_dir(),
            internal_dir: default_internal_dir(),
            search: SearchConfig::default(),
        }
    }
}

fn default_user_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("notefold"))
        .unwrap_or_else(|| PathBuf::from("notefold"))
}

fn default_internal_dir() -> PathBuf {
    default_user_dir().join(".notefold")
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// `config_path` names an explicit file that must exist. Otherwise
    /// `<internal_dir>/config.toml` is read if present, where `internal_dir`
    /// is the override or the default. The override always wins over the
    /// file's own `internal_dir`.
    pub fn load(config_path: Option<&Path>, internal_dir: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let dir = internal_dir
                    .map(Path::to_path_buf)
                    .unwrap_or_else(default_internal_dir);
                let path = dir.join(CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    log::debug!("No config file at {:?}, using defaults", path);
                    Self::default()
                }
            }
        };

        if let Some(dir) = internal_dir {
            config.internal_dir = dir.to_path_buf();
        }

        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Directory the notes are read from.
    pub fn data_dir(&self) -> PathBuf {
        self.user_dir.join(DATA_DIR)
    }

    /// Create `<user_dir>/data` and `internal_dir` if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.data_dir(), self.internal_dir.clone()] {
            std::fs::create_dir_all(&dir).map_err(|e| Error::io_with_path(e, &dir))?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
