use std::path::PathBuf;

/// Errors raised while asking the move oracle for a column.
///
/// None of these reach the player: the turn controller falls back to the
/// lowest open column whenever the oracle fails.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("oracle returned HTTP {0}")]
    Status(u16),

    #[error("oracle rejected the request: {0}")]
    Rejected(String),

    #[error("malformed oracle response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("oracle response has no numeric best_move")]
    MissingMove,

    #[error("oracle answered with a move that is not a column: {0}")]
    InvalidMove(String),

    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

impl OracleError {
    /// True when the oracle could not be reached or did not serve the request.
    /// Errors about the content of an answer mean the oracle is up.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            OracleError::Transport(_) | OracleError::Status(_) | OracleError::Unavailable(_)
        )
    }
}

/// Errors that can occur while persisting outcome tallies.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("I/O error on tally store {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
