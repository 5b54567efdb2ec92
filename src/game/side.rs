use super::board::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Human,
    Opponent,
}

/// Disc color shown for a side. The first mover always plays Red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscColor {
    Red,
    Blue,
}

impl Side {
    /// Convert side to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Side::Human => Cell::Human,
            Side::Opponent => Cell::Opponent,
        }
    }

    /// Label used in the header and controls
    pub fn name(self) -> &'static str {
        match self {
            Side::Human => "You",
            Side::Opponent => "Opponent",
        }
    }

    /// Color of this side given who moved first
    pub fn color(self, human_first: bool) -> DiscColor {
        let moves_first = match self {
            Side::Human => human_first,
            Side::Opponent => !human_first,
        };
        if moves_first {
            DiscColor::Red
        } else {
            DiscColor::Blue
        }
    }

    /// Which side owns a cell, if any
    pub fn from_cell(cell: Cell) -> Option<Side> {
        match cell {
            Cell::Empty => None,
            Cell::Human => Some(Side::Human),
            Cell::Opponent => Some(Side::Opponent),
        }
    }
}

impl DiscColor {
    pub fn name(self) -> &'static str {
        match self {
            DiscColor::Red => "Red",
            DiscColor::Blue => "Blue",
        }
    }
}
