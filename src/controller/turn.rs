use tracing::{debug, info, warn};

use crate::error::OracleError;
use crate::game::{Board, Dimensions, DiscColor, GameOutcome, GameSession, Phase, Side};
use crate::oracle::{encode_board, OracleBoard};
use crate::stats::{record_outcome, variant_key, Tally, TallyStore, TOTAL_KEY};

pub const IDLE_STATUS: &str = "Choose who goes first, then start the game.";
pub const THINKING_STATUS: &str = "Opponent is thinking...";
pub const YOUR_TURN_STATUS: &str = "Your turn.";

/// Advisory state of the oracle connection. Never blocks play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Unknown,
    Connected,
    Unreachable,
}

impl Connectivity {
    pub fn message(self) -> &'static str {
        match self {
            Connectivity::Unknown => "Checking server...",
            Connectivity::Connected => "Server connected.",
            Connectivity::Unreachable => "Server not reachable. Opponent may fall back.",
        }
    }
}

/// A request for the opponent's move, tied to the session that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    generation: u64,
    pub board: OracleBoard,
    pub variant: String,
}

impl MoveRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pair an oracle result with this request's session.
    pub fn reply(&self, result: Result<usize, OracleError>) -> MoveReply {
        MoveReply {
            generation: self.generation,
            result,
        }
    }
}

/// The oracle's answer (or failure) for a [`MoveRequest`].
#[derive(Debug)]
pub struct MoveReply {
    generation: u64,
    pub result: Result<usize, OracleError>,
}

impl MoveReply {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Where an applied opponent move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Oracle,
    Fallback,
}

/// What happened to an opponent reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The reply targeted a session that has since been reset, restarted or resigned.
    Stale,
    /// No column was open, so the game ended as a draw.
    NoLegalMoves,
    Applied {
        column: usize,
        row: usize,
        source: MoveSource,
    },
}

/// Drives one game at a time: human moves, the opponent step, resignation,
/// reset, and recording each finished game into the tally store.
pub struct TurnController<S> {
    dims: Dimensions,
    variant: String,
    session: GameSession,
    next_generation: u64,
    store: S,
    tallies: (Tally, Tally),
    status: String,
    connectivity: Connectivity,
}

impl<S: TallyStore> TurnController<S> {
    pub fn new(dims: Dimensions, variant: impl Into<String>, store: S) -> Self {
        let variant = variant.into();
        let tallies = load_tallies(&store, &variant);
        TurnController {
            dims,
            variant,
            session: GameSession::idle(dims, 0),
            next_generation: 1,
            store,
            tallies,
            status: IDLE_STATUS.to_string(),
            connectivity: Connectivity::Unknown,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn board(&self) -> &Board {
        self.session.board()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn color_of(&self, side: Side) -> DiscColor {
        self.session.color_of(side)
    }

    /// Tallies against this variant and across all variants, as of the last
    /// finished game.
    pub fn tallies(&self) -> (Tally, Tally) {
        self.tallies
    }

    /// Record the result of a health probe.
    pub fn note_health(&mut self, reachable: bool) {
        self.connectivity = if reachable {
            Connectivity::Connected
        } else {
            Connectivity::Unreachable
        };
    }

    fn fresh_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Start a new game. Any game in progress is abandoned without touching
    /// the tallies. Returns the opponent's move request when it moves first.
    pub fn start_game(&mut self, human_first: bool) -> Option<MoveRequest> {
        if self.session.is_active() {
            debug!(generation = self.session.generation(), "abandoning game in progress");
        }

        let generation = self.fresh_generation();
        self.session = GameSession::started(self.dims, human_first, generation);
        info!(generation, human_first, variant = %self.variant, "game started");

        if human_first {
            self.status = format!(
                "Your turn. You are {}.",
                self.session.color_of(Side::Human).name()
            );
            None
        } else {
            self.status = format!(
                "Opponent is going first... You are {}.",
                self.session.color_of(Side::Human).name()
            );
            Some(self.move_request())
        }
    }

    /// Play the human's piece. Ignored unless it is the human's turn or when
    /// the column cannot take a piece.
    pub fn submit_human_move(&mut self, column: usize) -> Option<MoveRequest> {
        if self.session.phase() != Phase::AwaitingHuman {
            debug!(column, phase = ?self.session.phase(), "human move ignored");
            return None;
        }

        let (row, outcome) = match self.session.play(Side::Human, column) {
            Ok(played) => played,
            Err(e) => {
                debug!(column, error = %e, "human move rejected");
                return None;
            }
        };
        debug!(column, row, "human move applied");

        if let Some(outcome) = outcome {
            self.finish(outcome, None);
            return None;
        }

        self.session.set_phase(Phase::AwaitingOpponent);
        self.status = THINKING_STATUS.to_string();
        Some(self.move_request())
    }

    fn move_request(&self) -> MoveRequest {
        MoveRequest {
            generation: self.session.generation(),
            board: encode_board(self.session.board(), self.session.human_first()),
            variant: self.variant.clone(),
        }
    }

    /// Apply the oracle's reply, falling back to the lowest open column when
    /// the oracle failed or named a column that cannot be played.
    pub fn resolve_opponent_move(&mut self, reply: MoveReply) -> Resolution {
        if reply.generation != self.session.generation()
            || self.session.phase() != Phase::AwaitingOpponent
        {
            debug!(
                reply_generation = reply.generation,
                generation = self.session.generation(),
                "discarding stale opponent reply"
            );
            return Resolution::Stale;
        }

        self.connectivity = match &reply.result {
            Err(e) if e.is_unreachable() => Connectivity::Unreachable,
            _ => Connectivity::Connected,
        };

        let board = self.session.board();
        let (column, source) = match reply.result {
            Ok(col) if !board.is_column_full(col) => (Some(col), MoveSource::Oracle),
            Ok(col) => {
                warn!(column = col, "oracle chose an unplayable column, falling back");
                (board.lowest_open_column(), MoveSource::Fallback)
            }
            Err(e) => {
                warn!(error = %e, "oracle failed, falling back");
                (board.lowest_open_column(), MoveSource::Fallback)
            }
        };

        let column = match column {
            Some(column) => column,
            None => {
                self.finish(GameOutcome::Draw, Some("No moves left."));
                return Resolution::NoLegalMoves;
            }
        };

        let (row, outcome) = match self.session.play(Side::Opponent, column) {
            Ok(played) => played,
            Err(e) => {
                // Unreachable: the column was checked above.
                warn!(column, error = %e, "opponent move rejected");
                self.finish(GameOutcome::Draw, Some("No moves left."));
                return Resolution::NoLegalMoves;
            }
        };
        debug!(column, row, ?source, "opponent move applied");

        match outcome {
            Some(outcome) => self.finish(outcome, None),
            None => {
                self.session.set_phase(Phase::AwaitingHuman);
                self.status = YOUR_TURN_STATUS.to_string();
            }
        }

        Resolution::Applied {
            column,
            row,
            source,
        }
    }

    /// Concede the game. Only meaningful while a game is in progress.
    pub fn resign(&mut self) -> bool {
        if !self.session.is_active() {
            return false;
        }
        self.finish(
            GameOutcome::Winner(Side::Opponent),
            Some("You resigned. Opponent takes the win."),
        );
        true
    }

    /// Drop the current game, if any, and go back to idle.
    pub fn reset_game(&mut self) {
        let generation = self.fresh_generation();
        self.session = GameSession::idle(self.dims, generation);
        self.status = IDLE_STATUS.to_string();
        info!(generation, "game reset");
    }

    /// Enter the finished phase and record the outcome. Runs once per game:
    /// only active sessions can reach it.
    fn finish(&mut self, outcome: GameOutcome, message: Option<&str>) {
        if !self.session.is_active() {
            return;
        }
        self.session.set_phase(Phase::Finished(outcome));

        self.status = match message {
            Some(message) => message.to_string(),
            None => match outcome {
                GameOutcome::Winner(Side::Human) => "You win! Great game.".to_string(),
                GameOutcome::Winner(Side::Opponent) => "Opponent wins. Try again!".to_string(),
                GameOutcome::Draw => "It's a draw.".to_string(),
            },
        };
        info!(?outcome, generation = self.session.generation(), variant = %self.variant, "game finished");

        if let Err(e) = record_outcome(&mut self.store, &self.variant, outcome) {
            warn!(error = %e, "failed to record game outcome");
        }
        self.tallies = load_tallies(&self.store, &self.variant);
    }
}

fn load_tallies<S: TallyStore>(store: &S, variant: &str) -> (Tally, Tally) {
    (store.load(&variant_key(variant)), store.load(TOTAL_KEY))
}
