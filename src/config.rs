// Menu configuration loaded from RON or JSON

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "instance_menu";

/// File name looked up when no explicit path is given
const CONFIG_FILE_NAME: &str = "config.ron";

/// Settings for an interactive menu session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Maximum number of actions that can be undone (None = unbounded)
    pub history_limit: Option<usize>,
    /// Selection that ends the session
    pub exit_sentinel: i64,
    /// Print undo/redo counts after every selection
    pub show_status: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            exit_sentinel: -1,
            show_status: false,
        }
    }
}

impl MenuConfig {
    /// Load a config file, picking the format from its extension
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: MenuConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("ron") => ron::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Load from an explicit path, else the default location, else defaults
    pub fn discover(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/instance_menu/config.ron`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> ConfigResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Invalid(format!("Failed to serialize to RON: {}", e)))
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "history_limit must be at least 1".to_string(),
            ));
        }

        if self.exit_sentinel > 0 {
            return Err(ConfigError::Invalid(format!(
                "exit_sentinel {} collides with a menu number, use 0 or a negative value",
                self.exit_sentinel
            )));
        }

        Ok(())
    }

    /// Apply command-line values on top of this config and validate the result
    ///
    /// A flag that was not given leaves the file value alone; `status` can
    /// only switch the status line on.
    pub fn with_overrides(mut self, history_limit: Option<usize>, status: bool) -> ConfigResult<Self> {
        if let Some(limit) = history_limit {
            self.history_limit = Some(limit);
        }
        if status {
            self.show_status = true;
        }

        self.validate()?;
        Ok(self)
    }

    /// History limit in the form the invoker takes
    pub fn history_limit(&self) -> Option<NonZeroUsize> {
        self.history_limit.and_then(NonZeroUsize::new)
    }
}
