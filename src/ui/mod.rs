//! Terminal UI: the board, status line, connectivity advisory and tallies,
//! driven by keyboard input while oracle replies arrive over a channel.

mod app;
mod game_view;

pub use app::App;
