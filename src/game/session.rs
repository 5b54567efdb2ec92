use super::board::{Board, Dimensions, MoveError};
use super::side::{DiscColor, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Side),
    Draw,
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingHuman,
    AwaitingOpponent,
    Finished(GameOutcome),
}

impl Phase {
    pub fn is_active(self) -> bool {
        matches!(self, Phase::AwaitingHuman | Phase::AwaitingOpponent)
    }
}

/// One game: its board, phase, who moved first, and a generation number
/// that tells replies for this game apart from replies for earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    board: Board,
    phase: Phase,
    human_first: bool,
    generation: u64,
}

impl GameSession {
    /// An idle session with an empty board
    pub fn idle(dims: Dimensions, generation: u64) -> Self {
        GameSession {
            board: Board::new(dims),
            phase: Phase::Idle,
            human_first: true,
            generation,
        }
    }

    /// A freshly started session with the first mover to play
    pub fn started(dims: Dimensions, human_first: bool, generation: u64) -> Self {
        let phase = if human_first {
            Phase::AwaitingHuman
        } else {
            Phase::AwaitingOpponent
        };
        GameSession {
            board: Board::new(dims),
            phase,
            human_first,
            generation,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn human_first(&self) -> bool {
        self.human_first
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn color_of(&self, side: Side) -> DiscColor {
        side.color(self.human_first)
    }

    /// Drop a piece for `side` and report the outcome the move produced, if any
    pub fn play(&mut self, side: Side, column: usize) -> Result<(usize, Option<GameOutcome>), MoveError> {
        let row = self.board.drop_piece(column, side.to_cell())?;

        let outcome = if self.board.is_winning_move(side.to_cell()) {
            Some(GameOutcome::Winner(side))
        } else if self.board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        };

        Ok((row, outcome))
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
