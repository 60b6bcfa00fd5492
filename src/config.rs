//! Game configuration: board size, fleet roster and placement budgets.
//!
//! A `GameConfig` is passed explicitly into every match; nothing here is
//! process-wide state.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::common::Side;

/// Board sizes offered by the standard game.
pub const STANDARD_SIZES: [usize; 2] = [10, 15];
/// Default board size.
pub const DEFAULT_BOARD_SIZE: usize = 10;
/// Smallest accepted board side.
pub const MIN_BOARD_SIZE: usize = 5;
/// Largest accepted board side; columns are labelled A..Z.
pub const MAX_BOARD_SIZE: usize = 26;

/// The standard roster, in placement order.
pub const STANDARD_ROSTER: [(&str, usize); 5] = [
    ("Aircraft Carrier", 5),
    ("Battleship", 4),
    ("Submarine", 3),
    ("Destroyer", 3),
    ("Patrol Boat", 2),
];

/// Name and length of a ship before it is placed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipDef {
    name: String,
    length: usize,
}

impl ShipDef {
    pub fn new(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// Retry budgets for random fleet placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementLimits {
    /// Backtracks allowed within one pass before the pass is abandoned.
    pub ship_attempts: usize,
    /// Fresh passes allowed before placement reports exhaustion.
    pub fleet_attempts: usize,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            ship_attempts: 20,
            fleet_attempts: 200,
        }
    }
}

/// Everything a match needs to know before the first ship is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub board_size: usize,
    pub roster: Vec<ShipDef>,
    pub placement: PlacementLimits,
    pub first_turn: Side,
}

impl GameConfig {
    /// Standard roster on a `board_size`×`board_size` board, human first.
    pub fn standard(board_size: usize) -> Self {
        Self {
            board_size,
            roster: STANDARD_ROSTER
                .iter()
                .map(|(name, len)| ShipDef::new(*name, *len))
                .collect(),
            placement: PlacementLimits::default(),
            first_turn: Side::Human,
        }
    }

    /// Same settings with a different roster.
    pub fn with_roster(mut self, roster: Vec<ShipDef>) -> Self {
        self.roster = roster;
        self
    }

    /// Same settings with a different opening side.
    pub fn with_first_turn(mut self, side: Side) -> Self {
        self.first_turn = side;
        self
    }

    /// Check that the configuration describes a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        if self.roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        let mut seen = BTreeSet::new();
        for def in &self.roster {
            if def.name().trim().is_empty() {
                return Err(ConfigError::UnnamedShip);
            }
            if def.length() == 0 || def.length() > self.board_size {
                return Err(ConfigError::ShipLength {
                    name: def.name().into(),
                    length: def.length(),
                });
            }
            if !seen.insert(def.name()) {
                return Err(ConfigError::DuplicateName(def.name().into()));
            }
        }
        if self.placement.fleet_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }

    /// Roster entry for `name`.
    pub fn ship(&self, name: &str) -> Option<&ShipDef> {
        self.roster.iter().find(|d| d.name() == name)
    }

    /// Total number of ship cells in the roster.
    pub fn total_ship_cells(&self) -> usize {
        self.roster.iter().map(ShipDef::length).sum()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard(DEFAULT_BOARD_SIZE)
    }
}

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Board side outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    BoardSize(usize),
    /// No ships to place.
    EmptyRoster,
    /// A ship has an empty name.
    UnnamedShip,
    /// A ship is zero-length or longer than the board.
    ShipLength { name: String, length: usize },
    /// Two ships share a name.
    DuplicateName(String),
    /// Placement would never be attempted.
    ZeroAttempts,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BoardSize(n) => write!(
                f,
                "board size {} outside {}..={}",
                n, MIN_BOARD_SIZE, MAX_BOARD_SIZE
            ),
            ConfigError::EmptyRoster => write!(f, "roster has no ships"),
            ConfigError::UnnamedShip => write!(f, "ship names must not be empty"),
            ConfigError::ShipLength { name, length } => {
                write!(f, "ship {} has unusable length {}", name, length)
            }
            ConfigError::DuplicateName(name) => write!(f, "ship name {} is used twice", name),
            ConfigError::ZeroAttempts => write!(f, "placement needs at least one attempt"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
