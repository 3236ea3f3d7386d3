use std::fmt::{Display, Formatter};

/// The largest number a cell can show; a cell has at most eight neighbors.
pub const MAX_NUMBER: u8 = 8;

/// One grid position.
///
/// In a puzzle, [`Unknown`](Cell::Unknown) cells are the ones to solve for.
/// In a solved grid, a cell still [`Unknown`](Cell::Unknown) is empty: safe, but not a gem.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Cell {
    /// Not revealed.
    #[default]
    Unknown,
    /// A revealed count of trap cells among the eight neighbors.
    Number(u8),
    Trap,
    Gem,
}

impl Cell {
    /// Text tokens for the non-number cells. Numbers are written as their digit.
    pub const UNKNOWN_TOKEN: char = '_';
    pub const TRAP_TOKEN: char = 'T';
    pub const GEM_TOKEN: char = 'G';

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn is_trap(&self) -> bool {
        matches!(self, Self::Trap)
    }

    pub fn is_gem(&self) -> bool {
        matches!(self, Self::Gem)
    }

    /// The count shown, if this is a number cell.
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The single character this cell is written as.
    pub fn token(&self) -> char {
        match self {
            Self::Unknown => Self::UNKNOWN_TOKEN,
            // numbers above 9 never pass the builder, but don't panic on them
            Self::Number(n) => char::from_digit(u32::from(*n), 10).unwrap_or('?'),
            Self::Trap => Self::TRAP_TOKEN,
            Self::Gem => Self::GEM_TOKEN,
        }
    }

    /// Parse a single character as written by [`Self::token`].
    pub fn from_token(token: char) -> Option<Self> {
        match token {
            Self::UNKNOWN_TOKEN => Some(Self::Unknown),
            Self::TRAP_TOKEN => Some(Self::Trap),
            Self::GEM_TOKEN => Some(Self::Gem),
            digit => digit.to_digit(10).map(|n| Self::Number(n as u8)),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
