//! Ship definitions and per-ship hit tracking.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::common::{Coord, Orientation};
use crate::config::ShipDef;

/// A linear ship. Unplaced ships have no cells; once the board places a ship
/// its cells never change and only `hit_cells` grows.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    name: String,
    length: usize,
    orientation: Orientation,
    cells: Vec<Coord>,
    hit_cells: BTreeSet<Coord>,
}

impl Ship {
    /// A new, unplaced ship. Returns `None` for an empty name or zero length.
    pub fn new(name: impl Into<String>, length: usize) -> Option<Self> {
        let name = name.into();
        if name.is_empty() || length == 0 {
            return None;
        }
        Some(Ship {
            name,
            length,
            orientation: Orientation::Horizontal,
            cells: Vec::new(),
            hit_cells: BTreeSet::new(),
        })
    }

    /// An unplaced ship built from a roster entry.
    pub fn from_def(def: &ShipDef) -> Option<Self> {
        Self::new(def.name(), def.length())
    }

    /// The `length` cells starting at `origin` along `orientation`. Stops
    /// early when a coordinate would overflow `usize`.
    pub fn run(origin: Coord, orientation: Orientation, length: usize) -> impl Iterator<Item = Coord> {
        (0..length).map_while(move |i| origin.step(orientation, i))
    }

    /// Fix the ship onto `cells`. Only the board calls this, and only once.
    pub(crate) fn set_cells(&mut self, cells: Vec<Coord>, orientation: Orientation) {
        debug_assert!(self.cells.is_empty());
        debug_assert_eq!(cells.len(), self.length);
        self.cells = cells;
        self.orientation = orientation;
    }

    /// Register a hit at `coord`. Returns `true` if the cell belongs to this
    /// ship and was not hit before.
    pub fn take_hit(&mut self, coord: Coord) -> bool {
        if !self.cells.contains(&coord) {
            return false;
        }
        self.hit_cells.insert(coord)
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hit_cells.len() == self.length
    }

    pub fn is_placed(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Occupied cells, origin first.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn hit_cells(&self) -> &BTreeSet<Coord> {
        &self.hit_cells
    }

    /// First cell of the ship, if placed.
    pub fn origin(&self) -> Option<Coord> {
        self.cells.first().copied()
    }

    /// Share of the ship already hit, in percent.
    pub fn damage_percentage(&self) -> f64 {
        self.hit_cells.len() as f64 * 100.0 / self.length as f64
    }

    /// Rebuild a ship from saved parts. The cells must form a contiguous run
    /// of `length` along `orientation` and every hit must be one of them.
    pub(crate) fn from_parts(
        name: String,
        length: usize,
        orientation: Orientation,
        cells: Vec<Coord>,
        hit_cells: BTreeSet<Coord>,
    ) -> Option<Self> {
        let mut ship = Ship::new(name, length)?;
        let origin = *cells.first()?;
        if cells.len() != length || !Ship::run(origin, orientation, length).eq(cells.iter().copied()) {
            return None;
        }
        if !hit_cells.iter().all(|c| cells.contains(c)) {
            return None;
        }
        ship.cells = cells;
        ship.orientation = orientation;
        ship.hit_cells = hit_cells;
        Some(ship)
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", origin: {:?}, orientation: {:?}, hits: {}/{} }}",
            self.name,
            self.origin(),
            self.orientation,
            self.hit_cells.len(),
            self.length,
        )
    }
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sunk() {
            write!(f, "{} ({}) - SUNK", self.name, self.length)
        } else {
            write!(
                f,
                "{} ({}) - Health: {:.0}%",
                self.name,
                self.length,
                100.0 - self.damage_percentage()
            )
        }
    }
}
