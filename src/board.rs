//! Game board state: ship placements, hits and misses.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::bitboard::BitBoard;
use crate::common::{BoardError, CellState, Coord, Orientation, ShotOutcome, StateError, SunkShip};
use crate::config::{ConfigError, MAX_BOARD_SIZE};
use crate::ship::Ship;

/// Serializable board state for saving and resuming games.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardState {
    pub dimension: usize,
    pub ships: Vec<Ship>,
    pub hits: Vec<Coord>,
    pub misses: Vec<Coord>,
}

/// Main board state: ship placements, hits, misses.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    dimension: usize,
    cells: Vec<Option<usize>>,
    ships: Vec<Ship>,
    ship_map: BitBoard,
    hits: BitBoard,
    misses: BitBoard,
}

/// What an opponent may see of a board: its size and the shot history.
#[derive(Clone, Copy, Debug)]
pub struct TargetView<'a> {
    dimension: usize,
    hits: &'a BitBoard,
    misses: &'a BitBoard,
}

impl<'a> TargetView<'a> {
    pub fn new(dimension: usize, hits: &'a BitBoard, misses: &'a BitBoard) -> Self {
        Self {
            dimension,
            hits,
            misses,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn hits(&self) -> &'a BitBoard {
        self.hits
    }

    pub fn misses(&self) -> &'a BitBoard {
        self.misses
    }

    pub fn is_shot(&self, coord: Coord) -> bool {
        self.hits.contains(coord) || self.misses.contains(coord)
    }

    /// On the board and not fired upon yet.
    pub fn is_open(&self, coord: Coord) -> bool {
        coord.in_bounds(self.dimension) && !self.is_shot(coord)
    }

    /// Every cell still open, row-major.
    pub fn open_cells(&self) -> impl Iterator<Item = Coord> + 'a {
        let dim = self.dimension;
        let (hits, misses) = (self.hits, self.misses);
        (0..dim * dim)
            .map(move |i| Coord::new(i / dim, i % dim))
            .filter(move |c| !hits.contains(*c) && !misses.contains(*c))
    }

    pub fn shot_count(&self) -> usize {
        self.hits.count_ones() + self.misses.count_ones()
    }
}

impl Board {
    /// Create an empty `dimension`×`dimension` board.
    pub fn new(dimension: usize) -> Self {
        let mut cells = Vec::with_capacity(dimension * dimension);
        cells.resize(dimension * dimension, None);
        Board {
            dimension,
            cells,
            ships: Vec::new(),
            ship_map: BitBoard::new(dimension),
            hits: BitBoard::new(dimension),
            misses: BitBoard::new(dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Placed ships, in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, name: &str) -> Option<&Ship> {
        self.ships.iter().find(|s| s.name() == name)
    }

    /// Ship occupying `coord`, if any.
    pub fn ship_at(&self, coord: Coord) -> Option<&Ship> {
        self.index(coord)
            .and_then(|i| self.cells[i])
            .map(|s| &self.ships[s])
    }

    /// Board occupancy mask of all ships.
    pub fn ship_map(&self) -> &BitBoard {
        &self.ship_map
    }

    pub fn hits(&self) -> &BitBoard {
        &self.hits
    }

    pub fn misses(&self) -> &BitBoard {
        &self.misses
    }

    /// Every cell fired upon.
    pub fn shots(&self) -> BitBoard {
        &self.hits | &self.misses
    }

    pub fn is_shot(&self, coord: Coord) -> bool {
        self.hits.contains(coord) || self.misses.contains(coord)
    }

    /// Opponent-facing projection; never exposes unhit ship cells.
    pub fn target_view(&self) -> TargetView<'_> {
        TargetView::new(self.dimension, &self.hits, &self.misses)
    }

    /// Returns `true` when at least one ship is placed and all ships are sunk.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }

    /// Cells occupied by ships plus every cell touching them. A new ship may
    /// not use any cell in this zone.
    pub fn exclusion_zone(&self) -> BitBoard {
        self.ship_map.dilate()
    }

    /// Cells a ship of `length` would occupy from `origin`, or why it cannot
    /// go there. Does not mutate.
    pub fn check_placement(
        &self,
        length: usize,
        origin: Coord,
        orientation: Orientation,
    ) -> Result<Vec<Coord>, BoardError> {
        if length == 0 {
            return Err(BoardError::InvalidShip);
        }
        let cells: Vec<Coord> = Ship::run(origin, orientation, length).collect();
        if cells.len() != length || cells.iter().any(|c| !c.in_bounds(self.dimension)) {
            return Err(BoardError::ShipOutOfBounds);
        }
        if cells.iter().any(|c| self.ship_map.contains(*c)) {
            return Err(BoardError::ShipOverlaps);
        }
        let touches = cells.iter().any(|c| {
            c.surrounding(self.dimension)
                .any(|n| self.ship_map.contains(n))
        });
        if touches {
            return Err(BoardError::ShipTouches);
        }
        Ok(cells)
    }

    /// Place `ship` with its first cell at `origin`. On error the board is
    /// left untouched.
    pub fn place(
        &mut self,
        ship: Ship,
        origin: Coord,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        if ship.is_placed() {
            return Err(BoardError::ShipAlreadyPlaced);
        }
        if self.ship(ship.name()).is_some() {
            return Err(BoardError::DuplicateShip);
        }
        let cells = self.check_placement(ship.length(), origin, orientation)?;
        let mut ship = ship;
        ship.set_cells(cells, orientation);
        self.insert(ship)
    }

    fn insert(&mut self, ship: Ship) -> Result<(), BoardError> {
        let slot = self.ships.len();
        for c in ship.cells() {
            self.ship_map.insert(*c)?;
            if let Some(i) = self.index(*c) {
                self.cells[i] = Some(slot);
            }
        }
        self.ships.push(ship);
        Ok(())
    }

    /// Take the most recently placed ship back off the board. Only used while
    /// no shots have been fired.
    pub(crate) fn pop_ship(&mut self) -> Option<Ship> {
        debug_assert!(self.hits.is_empty() && self.misses.is_empty());
        let ship = self.ships.pop()?;
        for c in ship.cells() {
            let _ = self.ship_map.remove(*c);
            if let Some(i) = self.index(*c) {
                self.cells[i] = None;
            }
        }
        Some(ship)
    }

    /// Process a shot at `coord`, marking hits/misses and reporting the result.
    pub fn resolve_shot(&mut self, coord: Coord) -> ShotOutcome {
        let Some(idx) = self.index(coord) else {
            return ShotOutcome::AlreadyShot;
        };
        if self.is_shot(coord) {
            return ShotOutcome::AlreadyShot;
        }
        match self.cells[idx] {
            Some(slot) => {
                let _ = self.hits.insert(coord);
                let ship = &mut self.ships[slot];
                ship.take_hit(coord);
                if ship.is_sunk() {
                    ShotOutcome::HitAndSunk(SunkShip {
                        name: ship.name().into(),
                        cells: ship.cells().to_vec(),
                    })
                } else {
                    ShotOutcome::Hit
                }
            }
            None => {
                let _ = self.misses.insert(coord);
                ShotOutcome::Miss
            }
        }
    }

    /// Owner's view of a cell, ships included.
    pub fn cell_state(&self, coord: Coord) -> CellState {
        let Some(idx) = self.index(coord) else {
            return CellState::Invalid;
        };
        if self.hits.contains(coord) {
            CellState::Hit
        } else if self.misses.contains(coord) {
            CellState::Miss
        } else if self.cells[idx].is_some() {
            CellState::Ship
        } else {
            CellState::Empty
        }
    }

    /// Opponent's view of a cell: unhit ships read as `Empty`.
    pub fn public_cell_state(&self, coord: Coord) -> CellState {
        match self.cell_state(coord) {
            CellState::Ship => CellState::Empty,
            other => other,
        }
    }

    /// Remove every ship and shot.
    pub fn clear(&mut self) {
        *self = Board::new(self.dimension);
    }

    /// Snapshot of the board for saving.
    pub fn state(&self) -> BoardState {
        BoardState::from(self)
    }

    #[inline]
    fn index(&self, coord: Coord) -> Option<usize> {
        coord
            .in_bounds(self.dimension)
            .then(|| coord.row * self.dimension + coord.col)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ship_map: {:?},\n  hits: {:?},\n  misses: {:?},\n  ships: {:?}\n}}",
            self.ship_map, self.hits, self.misses, self.ships
        )
    }
}

impl From<&Board> for BoardState {
    fn from(b: &Board) -> Self {
        BoardState {
            dimension: b.dimension,
            ships: b.ships.clone(),
            hits: b.hits.iter_set_bits().collect(),
            misses: b.misses.iter_set_bits().collect(),
        }
    }
}

impl TryFrom<BoardState> for Board {
    type Error = StateError;

    /// Rebuild a board, re-checking every placement and shot invariant.
    fn try_from(state: BoardState) -> Result<Self, Self::Error> {
        let dim = state.dimension;
        if dim == 0 || dim > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardSize(dim).into());
        }
        let mut board = Board::new(dim);

        for saved in state.ships {
            let name: String = saved.name().into();
            let ship = Ship::from_parts(
                name.clone(),
                saved.length(),
                saved.orientation(),
                saved.cells().to_vec(),
                saved.hit_cells().clone(),
            )
            .ok_or_else(|| StateError::MalformedShip(name.clone()))?;
            let origin = ship.origin().ok_or_else(|| StateError::MalformedShip(name.clone()))?;
            if let Some(c) = ship.cells().iter().find(|c| !c.in_bounds(dim)) {
                return Err(StateError::OutOfBounds(*c));
            }
            if board.ship(&name).is_some() {
                return Err(StateError::Placement {
                    ship: name,
                    reason: BoardError::DuplicateShip,
                });
            }
            board
                .check_placement(ship.length(), origin, ship.orientation())
                .map_err(|reason| StateError::Placement {
                    ship: name.clone(),
                    reason,
                })?;
            board.insert(ship).map_err(|reason| StateError::Placement {
                ship: name,
                reason,
            })?;
        }

        let hits: BTreeSet<Coord> = state.hits.into_iter().collect();
        let misses: BTreeSet<Coord> = state.misses.into_iter().collect();
        for c in hits.iter().chain(misses.iter()) {
            if !c.in_bounds(dim) {
                return Err(StateError::OutOfBounds(*c));
            }
        }
        if let Some(c) = hits.intersection(&misses).next() {
            return Err(StateError::HitAndMiss(*c));
        }
        for c in &hits {
            if !board.ship_map.contains(*c) {
                return Err(StateError::HitOnWater(*c));
            }
            let _ = board.hits.insert(*c);
        }
        for c in &misses {
            if board.ship_map.contains(*c) {
                return Err(StateError::MissOnShip(*c));
            }
            let _ = board.misses.insert(*c);
        }
        for ship in &board.ships {
            let expected: BTreeSet<Coord> = ship
                .cells()
                .iter()
                .copied()
                .filter(|c| hits.contains(c))
                .collect();
            if &expected != ship.hit_cells() {
                return Err(StateError::ShipHitsMismatch(ship.name().into()));
            }
        }
        Ok(board)
    }
}
