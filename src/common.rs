//! Common types shared across the engine: coordinates, shot outcomes, cell
//! projections and the board/state error enums.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::bitboard::BitBoardError;

/// A cell on the board, addressed by zero-based row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const SURROUNDING: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True when the coordinate lies on a `dim`×`dim` board.
    #[inline]
    pub fn in_bounds(&self, dim: usize) -> bool {
        self.row < dim && self.col < dim
    }

    /// The cell `dist` steps further along `orientation`, or `None` if the
    /// index overflows.
    #[inline]
    pub fn step(self, orientation: Orientation, dist: usize) -> Option<Self> {
        match orientation {
            Orientation::Horizontal => Some(Self::new(self.row, self.col.checked_add(dist)?)),
            Orientation::Vertical => Some(Self::new(self.row.checked_add(dist)?, self.col)),
        }
    }

    /// Offset by a signed delta, returning `None` when it leaves the board.
    pub fn offset(self, dr: isize, dc: isize, dim: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let c = Self::new(row, col);
        c.in_bounds(dim).then_some(c)
    }

    /// Orthogonal neighbours (up, down, left, right) that are on the board.
    pub fn neighbors(self, dim: usize) -> impl Iterator<Item = Coord> {
        ORTHOGONAL
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc, dim))
    }

    /// All eight surrounding cells that are on the board.
    pub fn surrounding(self, dim: usize) -> impl Iterator<Item = Coord> {
        SURROUNDING
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc, dim))
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// The other axis.
    pub fn perpendicular(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Axis shared by two distinct cells, if they sit on one row or column.
    pub fn between(a: Coord, b: Coord) -> Option<Self> {
        if a == b {
            None
        } else if a.row == b.row {
            Some(Orientation::Horizontal)
        } else if a.col == b.col {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }
}

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Human,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Ai,
            Side::Ai => Side::Human,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => write!(f, "human"),
            Side::Ai => write!(f, "ai"),
        }
    }
}

/// A ship that went down, with every cell it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SunkShip {
    pub name: String,
    pub cells: Vec<Coord>,
}

/// Result of firing at a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    /// The cell was shot before or lies off the board; nothing changed.
    AlreadyShot,
    /// Open water.
    Miss,
    /// A ship segment was hit and the ship is still afloat.
    Hit,
    /// The hit sank the ship.
    HitAndSunk(SunkShip),
}

impl ShotOutcome {
    /// True for `Hit` and `HitAndSunk`.
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotOutcome::Hit | ShotOutcome::HitAndSunk(_))
    }

    /// The sunk ship, when this shot sank one.
    pub fn sunk(&self) -> Option<&SunkShip> {
        match self {
            ShotOutcome::HitAndSunk(ship) => Some(ship),
            _ => None,
        }
    }
}

/// Read-only projection of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    Empty,
    Ship,
    Hit,
    Miss,
    Invalid,
}

/// Errors returned by Board and Fleet operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error (e.g., invalid index).
    BitBoardError(BitBoardError),
    /// Named ship is not on the roster still waiting to be placed.
    NameNotFound,
    /// Attempted to place a ship that is already placed.
    ShipAlreadyPlaced,
    /// Another ship with the same name is already on the board.
    DuplicateShip,
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// Ship placement touches another ship, diagonals included.
    ShipTouches,
    /// Ship placement runs off the board.
    ShipOutOfBounds,
    /// Ship has an empty name or zero length.
    InvalidShip,
    /// Random placement could not find a layout within its retry budget.
    PlacementExhausted,
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoardError(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            BoardError::NameNotFound => write!(f, "Ship name not found in remaining roster"),
            BoardError::ShipAlreadyPlaced => write!(f, "Ship is already placed on the board"),
            BoardError::DuplicateShip => write!(f, "A ship with this name is already placed"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::ShipTouches => write!(f, "Ship placement touches another ship"),
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::InvalidShip => write!(f, "Ship needs a name and a positive length"),
            BoardError::PlacementExhausted => {
                write!(f, "No valid fleet layout found within the retry budget")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

/// Reasons a saved match is refused on restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The embedded configuration is not playable.
    Config(crate::config::ConfigError),
    /// A ship in the save could not be re-placed.
    Placement { ship: String, reason: BoardError },
    /// A ship's cells are not a straight run matching its length/orientation.
    MalformedShip(String),
    /// A coordinate lies outside the board.
    OutOfBounds(Coord),
    /// A cell appears in both the hit and the miss set.
    HitAndMiss(Coord),
    /// A recorded hit does not lie on any ship.
    HitOnWater(Coord),
    /// A recorded miss lies on a ship.
    MissOnShip(Coord),
    /// A ship's own hit list disagrees with the board's hit set.
    ShipHitsMismatch(String),
    /// Roster, placed ships and configuration do not add up.
    RosterMismatch,
    /// The shot log disagrees with the board's shot set.
    ShotLogMismatch,
    /// Phase, turn and winner are not consistent with the boards.
    PhaseMismatch,
    /// The targeting state references cells the board never hit.
    TargetingMismatch,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Config(e) => write!(f, "invalid configuration: {}", e),
            StateError::Placement { ship, reason } => {
                write!(f, "ship {} cannot be restored: {}", ship, reason)
            }
            StateError::MalformedShip(name) => write!(f, "ship {} has malformed cells", name),
            StateError::OutOfBounds(c) => write!(f, "coordinate {} is off the board", c),
            StateError::HitAndMiss(c) => write!(f, "cell {} is both a hit and a miss", c),
            StateError::HitOnWater(c) => write!(f, "hit at {} does not lie on a ship", c),
            StateError::MissOnShip(c) => write!(f, "miss at {} lies on a ship", c),
            StateError::ShipHitsMismatch(name) => {
                write!(f, "ship {} hit list disagrees with the board", name)
            }
            StateError::RosterMismatch => write!(f, "fleet roster does not match configuration"),
            StateError::ShotLogMismatch => write!(f, "shot log disagrees with the board"),
            StateError::PhaseMismatch => write!(f, "phase, turn and winner are inconsistent"),
            StateError::TargetingMismatch => {
                write!(f, "targeting state references unknown hits")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateError {}

impl From<crate::config::ConfigError> for StateError {
    fn from(err: crate::config::ConfigError) -> Self {
        StateError::Config(err)
    }
}
