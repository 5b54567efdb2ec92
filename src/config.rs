use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::game::Dimensions;
use crate::oracle::HttpOracleConfig;

/// Largest board side accepted from configuration.
const MAX_BOARD_SIDE: usize = 32;

/// Move oracle settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub base_url: String,
    /// Opponent variant sent to the oracle and used as the tally key
    pub variant: String,
    pub timeout_ms: u64,
    /// Pause before each opponent move so it does not appear instantly
    pub move_delay_ms: u64,
    /// Play against the built-in random oracle instead of the API
    pub offline: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            base_url: "https://api-connect4.eshaanarora.com/connect4-api".to_string(),
            variant: "cnn".to_string(),
            timeout_ms: 10_000,
            move_delay_ms: 300,
            offline: false,
        }
    }
}

impl OracleConfig {
    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    pub fn http(&self) -> HttpOracleConfig {
        HttpOracleConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

/// Tally persistence settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub path: PathBuf,
}

impl Default for StatsConfig {
    fn default() -> Self {
        StatsConfig {
            path: PathBuf::from("connect4_stats.json"),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: Dimensions,
    pub oracle: OracleConfig,
    pub stats: StatsConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;
        if board.rows == 0 || board.rows > MAX_BOARD_SIDE {
            return Err(ConfigError::Validation(format!(
                "board.rows must be in [1, {}]",
                MAX_BOARD_SIDE
            )));
        }
        if board.cols == 0 || board.cols > MAX_BOARD_SIDE {
            return Err(ConfigError::Validation(format!(
                "board.cols must be in [1, {}]",
                MAX_BOARD_SIDE
            )));
        }
        if board.connect < 2 {
            return Err(ConfigError::Validation(
                "board.connect must be >= 2".into(),
            ));
        }
        if board.connect > board.rows.max(board.cols) {
            return Err(ConfigError::Validation(
                "board.connect must fit on the board".into(),
            ));
        }

        if self.oracle.variant.trim().is_empty() {
            return Err(ConfigError::Validation(
                "oracle.variant must not be empty".into(),
            ));
        }
        if !self.oracle.offline
            && !(self.oracle.base_url.starts_with("http://")
                || self.oracle.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(
                "oracle.base_url must be an http(s) URL".into(),
            ));
        }
        if self.oracle.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "oracle.timeout_ms must be > 0".into(),
            ));
        }

        if self.stats.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "stats.path must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
