//! Turn sequencing: the synchronous state machine in [`turn`] and the async
//! opponent step in [`opponent`] that feeds it oracle replies.

pub mod opponent;
mod turn;

pub use opponent::{
    fetch_move, play_opponent_turn, probe_health, spawn_health_probe, spawn_move_request,
    OracleEvent,
};
pub use turn::{
    Connectivity, MoveReply, MoveRequest, MoveSource, Resolution, TurnController, IDLE_STATUS,
    THINKING_STATUS, YOUR_TURN_STATUS,
};
