//! Core Connect Four game logic: a board parameterized by size and run
//! length, the two sides and their colors, and the per-game session.

mod board;
mod session;
mod side;

pub use board::{Board, Cell, Dimensions, MoveError, COLS, CONNECT, ROWS};
pub use session::{GameOutcome, GameSession, Phase};
pub use side::{DiscColor, Side};
