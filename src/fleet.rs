//! One side's fleet: its board, the ships still waiting to be placed and the
//! log of shots received.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use rand::Rng;

use crate::board::{Board, BoardState};
use crate::common::{BoardError, Coord, Orientation, ShotOutcome, StateError};
use crate::config::{GameConfig, PlacementLimits, ShipDef};
use crate::placement;
use crate::ship::Ship;

/// Serializable fleet state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetState {
    pub board: BoardState,
    pub remaining: Vec<ShipDef>,
    pub shot_log: Vec<Coord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fleet {
    board: Board,
    roster: Vec<ShipDef>,
    remaining: Vec<ShipDef>,
    shot_log: Vec<Coord>,
}

impl Fleet {
    /// Empty board with the whole roster waiting to be placed.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            board: Board::new(config.board_size),
            roster: config.roster.clone(),
            remaining: config.roster.clone(),
            shot_log: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Ships not placed yet, in roster order.
    pub fn remaining_roster(&self) -> &[ShipDef] {
        &self.remaining
    }

    pub fn is_setup_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn placed_ship(&self, name: &str) -> Option<&Ship> {
        self.board.ship(name)
    }

    pub fn placed(&self) -> impl Iterator<Item = &Ship> {
        self.board.ships().iter()
    }

    /// Place the roster ship `name` with its first cell at `origin`.
    pub fn place_ship(
        &mut self,
        name: &str,
        origin: Coord,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        let Some(pos) = self.remaining.iter().position(|d| d.name() == name) else {
            return Err(if self.board.ship(name).is_some() {
                BoardError::ShipAlreadyPlaced
            } else {
                BoardError::NameNotFound
            });
        };
        let ship = Ship::from_def(&self.remaining[pos]).ok_or(BoardError::InvalidShip)?;
        self.board.place(ship, origin, orientation)?;
        self.remaining.remove(pos);
        Ok(())
    }

    /// Fill the rest of the roster at random. On failure nothing changes.
    pub fn place_remaining_randomly<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        limits: PlacementLimits,
    ) -> Result<(), BoardError> {
        if self.remaining.is_empty() {
            return Ok(());
        }
        placement::place_randomly(&mut self.board, &self.remaining, rng, limits)?;
        self.remaining.clear();
        Ok(())
    }

    /// Resolve an incoming shot. Only resolved shots are logged.
    pub fn receive_shot(&mut self, coord: Coord) -> ShotOutcome {
        let outcome = self.board.resolve_shot(coord);
        if outcome != ShotOutcome::AlreadyShot {
            self.shot_log.push(coord);
        }
        outcome
    }

    pub fn all_sunk(&self) -> bool {
        self.board.all_sunk()
    }

    /// Shots received, in the order they landed.
    pub fn shot_log(&self) -> &[Coord] {
        &self.shot_log
    }

    /// Back to an empty board and a full roster.
    pub fn reset(&mut self) {
        self.board.clear();
        self.remaining = self.roster.clone();
        self.shot_log.clear();
    }

    pub fn state(&self) -> FleetState {
        FleetState {
            board: self.board.state(),
            remaining: self.remaining.clone(),
            shot_log: self.shot_log.clone(),
        }
    }

    /// Rebuild a fleet from a save made under `config`.
    pub fn from_state(state: FleetState, config: &GameConfig) -> Result<Self, StateError> {
        if state.board.dimension != config.board_size {
            return Err(StateError::RosterMismatch);
        }
        let board = Board::try_from(state.board)?;

        let mut accounted = BTreeSet::new();
        for ship in board.ships() {
            let def = config.ship(ship.name()).ok_or(StateError::RosterMismatch)?;
            if def.length() != ship.length() || !accounted.insert(def.name()) {
                return Err(StateError::RosterMismatch);
            }
        }
        for def in &state.remaining {
            if config.ship(def.name()) != Some(def) || !accounted.insert(def.name()) {
                return Err(StateError::RosterMismatch);
            }
        }
        if accounted.len() != config.roster.len() {
            return Err(StateError::RosterMismatch);
        }

        let logged: BTreeSet<Coord> = state.shot_log.iter().copied().collect();
        let shots: BTreeSet<Coord> = board.shots().iter_set_bits().collect();
        if logged.len() != state.shot_log.len() || logged != shots {
            return Err(StateError::ShotLogMismatch);
        }
        if !shots.is_empty() && !state.remaining.is_empty() {
            return Err(StateError::PhaseMismatch);
        }

        Ok(Self {
            board,
            roster: config.roster.clone(),
            remaining: state.remaining,
            shot_log: state.shot_log,
        })
    }
}
