//! The move oracle: the external service that picks the opponent's column.
//!
//! The engine only knows the [`MoveOracle`] trait. [`HttpOracle`] talks to the
//! hosted model API; [`RandomOracle`] plays uniformly random legal moves for
//! offline games and tests.

pub mod encoding;
mod http;
mod random;

use async_trait::async_trait;

use crate::error::OracleError;

pub use encoding::{encode_board, OracleBoard};
pub use http::{HttpOracle, HttpOracleConfig};
pub use random::RandomOracle;

/// Transport-agnostic source of opponent moves.
#[async_trait]
pub trait MoveOracle: Send + Sync {
    /// Display name, used in logs and the UI header.
    fn name(&self) -> &str;

    /// Ask for a zero-based column given the encoded board and the opponent
    /// variant (e.g. "cnn", "transformer"). The answer is not validated here.
    async fn best_move(&self, board: &[Vec<u8>], variant: &str) -> Result<usize, OracleError>;

    /// Cheap reachability check. Only used for an advisory status message.
    async fn health(&self) -> Result<(), OracleError>;
}
