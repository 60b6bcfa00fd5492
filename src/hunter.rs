//! The SEARCH / HUNT / TRACK opponent.
//!
//! * **Search** fires by sector density until something is hit.
//! * **Hunt** tries the four neighbours of confirmed hits.
//! * **Track** has an axis and walks both ends of the run. When both ends are
//!   spent it may flip to the perpendicular axis once, then gives up and
//!   searches again.
//!
//! Candidates are served by priority, then insertion order. Cells on the
//! locked axis through a confirmed hit weigh 1.5, everything else 1.0.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;
use log::{debug, trace};
use rand::rngs::SmallRng;

use crate::ai;
use crate::board::TargetView;
use crate::common::{Coord, Orientation, ShotOutcome, StateError};
use crate::strategy::Targeting;

const BASE_PRIORITY: f64 = 1.0;
const AXIS_PRIORITY: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    #[default]
    Search,
    Hunt,
    Track,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Search => write!(f, "SEARCH"),
            Mode::Hunt => write!(f, "HUNT"),
            Mode::Track => write!(f, "TRACK"),
        }
    }
}

/// A queued cell and the order it was queued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub coord: Coord,
    pub seq: u64,
}

/// Everything the hunter knows, in saveable form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AiState {
    pub dimension: usize,
    pub mode: Mode,
    pub confirmed_hits: Vec<Coord>,
    pub candidates: Vec<Candidate>,
    pub next_seq: u64,
    pub locked_axis: Option<Orientation>,
    pub axis_flipped: bool,
}

#[derive(Debug, Clone)]
pub struct HuntingAi {
    dimension: usize,
    mode: Mode,
    confirmed_hits: Vec<Coord>,
    candidates: Vec<Candidate>,
    next_seq: u64,
    locked_axis: Option<Orientation>,
    axis_flipped: bool,
}

impl HuntingAi {
    /// A hunter for a `dimension`×`dimension` board, starting in search.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            mode: Mode::Search,
            confirmed_hits: Vec::new(),
            candidates: Vec::new(),
            next_seq: 0,
            locked_axis: None,
            axis_flipped: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Hits on ships not yet known to be sunk, oldest first.
    pub fn confirmed_hits(&self) -> &[Coord] {
        &self.confirmed_hits
    }

    pub fn locked_axis(&self) -> Option<Orientation> {
        self.locked_axis
    }

    pub fn axis_flipped(&self) -> bool {
        self.axis_flipped
    }

    /// Queued cells in insertion order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn state(&self) -> AiState {
        AiState {
            dimension: self.dimension,
            mode: self.mode,
            confirmed_hits: self.confirmed_hits.clone(),
            candidates: self.candidates.clone(),
            next_seq: self.next_seq,
            locked_axis: self.locked_axis,
            axis_flipped: self.axis_flipped,
        }
    }

    /// Rebuild a hunter from a save, checking it against the board it hunts.
    pub fn from_state(state: AiState, view: &TargetView<'_>) -> Result<Self, StateError> {
        if state.dimension != view.dimension() {
            return Err(StateError::TargetingMismatch);
        }
        let consistent = match state.mode {
            Mode::Search => {
                state.confirmed_hits.is_empty()
                    && state.candidates.is_empty()
                    && state.locked_axis.is_none()
            }
            Mode::Hunt => !state.confirmed_hits.is_empty() && state.locked_axis.is_none(),
            Mode::Track => !state.confirmed_hits.is_empty() && state.locked_axis.is_some(),
        };
        if !consistent {
            return Err(StateError::TargetingMismatch);
        }
        let mut seen = BTreeSet::new();
        for h in &state.confirmed_hits {
            if !view.hits().contains(*h) || !seen.insert(*h) {
                return Err(StateError::TargetingMismatch);
            }
        }
        let mut queued = BTreeSet::new();
        for c in &state.candidates {
            if !c.coord.in_bounds(state.dimension)
                || c.seq >= state.next_seq
                || !queued.insert(c.coord)
            {
                return Err(StateError::TargetingMismatch);
            }
        }
        Ok(Self {
            dimension: state.dimension,
            mode: state.mode,
            confirmed_hits: state.confirmed_hits,
            candidates: state.candidates,
            next_seq: state.next_seq,
            locked_axis: state.locked_axis,
            axis_flipped: state.axis_flipped,
        })
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("targeting {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn reset_to_search(&mut self) {
        self.set_mode(Mode::Search);
        self.confirmed_hits.clear();
        self.candidates.clear();
        self.locked_axis = None;
        self.axis_flipped = false;
    }

    fn enqueue(&mut self, coord: Coord) {
        if !coord.in_bounds(self.dimension)
            || self.confirmed_hits.contains(&coord)
            || self.candidates.iter().any(|c| c.coord == coord)
        {
            return;
        }
        self.candidates.push(Candidate {
            coord,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    fn enqueue_neighbors(&mut self, coord: Coord) {
        for n in coord.neighbors(self.dimension) {
            self.enqueue(n);
        }
    }

    /// Queue the two neighbours of `coord` across `axis`.
    fn enqueue_perpendicular(&mut self, coord: Coord, axis: Orientation) {
        let offsets: [(isize, isize); 2] = match axis {
            Orientation::Horizontal => [(-1, 0), (1, 0)],
            Orientation::Vertical => [(0, -1), (0, 1)],
        };
        for (dr, dc) in offsets {
            if let Some(n) = coord.offset(dr, dc, self.dimension) {
                self.enqueue(n);
            }
        }
    }

    /// Queue the cells just past both ends of the run of hits through
    /// `through` along `axis`.
    fn enqueue_run_ends(&mut self, through: Coord, axis: Orientation) {
        let line: Vec<usize> = self
            .confirmed_hits
            .iter()
            .filter(|h| match axis {
                Orientation::Horizontal => h.row == through.row,
                Orientation::Vertical => h.col == through.col,
            })
            .map(|h| match axis {
                Orientation::Horizontal => h.col,
                Orientation::Vertical => h.row,
            })
            .collect();
        let (Some(&lo), Some(&hi)) = (line.iter().min(), line.iter().max()) else {
            return;
        };
        let at = |i: usize| match axis {
            Orientation::Horizontal => Coord::new(through.row, i),
            Orientation::Vertical => Coord::new(i, through.col),
        };
        if lo > 0 {
            self.enqueue(at(lo - 1));
        }
        self.enqueue(at(hi + 1));
    }

    fn on_axis(&self, coord: Coord) -> bool {
        match self.locked_axis {
            Some(axis) => self
                .confirmed_hits
                .iter()
                .any(|h| Orientation::between(*h, coord) == Some(axis)),
            None => false,
        }
    }

    fn priority(&self, coord: Coord) -> f64 {
        if self.on_axis(coord) {
            AXIS_PRIORITY
        } else {
            BASE_PRIORITY
        }
    }

    /// Index of the best queued candidate: highest priority, then oldest.
    fn best_candidate(&self) -> Option<usize> {
        let mut best: Option<(usize, f64, u64)> = None;
        for (i, c) in self.candidates.iter().enumerate() {
            let p = self.priority(c.coord);
            let better = match best {
                None => true,
                Some((_, bp, bs)) => p > bp || (p == bp && c.seq < bs),
            };
            if better {
                best = Some((i, p, c.seq));
            }
        }
        best.map(|(i, _, _)| i)
    }

    /// Both ends of the tracked run are spent: try the other axis once.
    fn exhaust_track(&mut self) {
        let Some(axis) = self.locked_axis else {
            return;
        };
        if self.axis_flipped {
            debug!("both axes exhausted, back to search");
            self.reset_to_search();
            return;
        }
        let flipped = axis.perpendicular();
        debug!("run along {:?} exhausted, trying {:?}", axis, flipped);
        self.locked_axis = Some(flipped);
        self.axis_flipped = true;
        let hits = self.confirmed_hits.clone();
        for h in hits {
            self.enqueue_perpendicular(h, axis);
        }
    }

    fn pop_candidate(&mut self) -> Option<Coord> {
        let idx = self.best_candidate()?;
        Some(self.candidates.remove(idx).coord)
    }

    fn on_hit(&mut self, coord: Coord) {
        match self.mode {
            Mode::Search => {
                self.confirmed_hits.clear();
                self.confirmed_hits.push(coord);
                self.set_mode(Mode::Hunt);
                self.enqueue_neighbors(coord);
            }
            Mode::Hunt => {
                let prev = self.confirmed_hits.last().copied();
                self.confirmed_hits.push(coord);
                self.candidates.retain(|c| c.coord != coord);
                match prev.and_then(|p| Orientation::between(p, coord)) {
                    Some(axis) => {
                        self.locked_axis = Some(axis);
                        self.axis_flipped = false;
                        self.set_mode(Mode::Track);
                        self.enqueue_run_ends(coord, axis);
                    }
                    None => self.enqueue_neighbors(coord),
                }
            }
            Mode::Track => {
                self.confirmed_hits.push(coord);
                self.candidates.retain(|c| c.coord != coord);
                if let Some(axis) = self.locked_axis {
                    self.enqueue_run_ends(coord, axis);
                }
            }
        }
    }

    fn on_sunk(&mut self, coord: Coord, cells: &[Coord]) {
        if self.mode == Mode::Search {
            return;
        }
        if cells.is_empty() {
            self.reset_to_search();
            return;
        }
        self.confirmed_hits
            .retain(|h| *h != coord && !cells.contains(h));
        self.candidates.retain(|c| !cells.contains(&c.coord));
        if self.confirmed_hits.is_empty() {
            self.reset_to_search();
            return;
        }
        self.locked_axis = None;
        self.axis_flipped = false;
        self.set_mode(Mode::Hunt);
        let hits = self.confirmed_hits.clone();
        for h in hits {
            self.enqueue_neighbors(h);
        }
    }
}

impl Targeting for HuntingAi {
    fn select_target(&mut self, rng: &mut SmallRng, view: &TargetView<'_>) -> Option<Coord> {
        self.candidates.retain(|c| view.is_open(c.coord));

        if self.mode == Mode::Track && !self.candidates.iter().any(|c| self.on_axis(c.coord)) {
            self.exhaust_track();
            self.candidates.retain(|c| view.is_open(c.coord));
            if self.mode == Mode::Track
                && !self.candidates.iter().any(|c| self.on_axis(c.coord))
            {
                self.exhaust_track();
            }
        }

        if self.mode == Mode::Hunt && self.candidates.is_empty() {
            let hits = self.confirmed_hits.clone();
            for h in hits {
                self.enqueue_neighbors(h);
            }
            self.candidates.retain(|c| view.is_open(c.coord));
            if self.candidates.is_empty() {
                self.reset_to_search();
            }
        }

        if let Some(c) = self.pop_candidate() {
            trace!("{} picks queued {}", self.mode, c);
            return Some(c);
        }
        let shot = ai::search_shot(view, rng);
        trace!("search picks {:?}", shot);
        shot
    }

    fn handle_result(&mut self, coord: Coord, outcome: &ShotOutcome) {
        match outcome {
            ShotOutcome::AlreadyShot | ShotOutcome::Miss => {}
            ShotOutcome::Hit => self.on_hit(coord),
            ShotOutcome::HitAndSunk(sunk) => self.on_sunk(coord, &sunk.cells),
        }
    }

    fn snapshot(&self) -> Option<AiState> {
        Some(self.state())
    }

    fn reset(&mut self) {
        self.reset_to_search();
        self.candidates.clear();
        self.next_seq = 0;
    }
}
