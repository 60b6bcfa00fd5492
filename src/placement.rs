//! Randomized fleet placement with bounded backtracking.
//!
//! Each ship in roster order picks uniformly among every legal
//! (origin, orientation) pair. When a ship has nowhere to go, the previous
//! ship of the pass is lifted and re-drawn; after `ship_attempts` such
//! backtracks the pass is thrown away and a fresh one starts, up to
//! `fleet_attempts` passes.

use alloc::vec::Vec;
use log::{debug, warn};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::board::Board;
use crate::common::{BoardError, Coord, Orientation};
use crate::config::{PlacementLimits, ShipDef};
use crate::ship::Ship;

/// Every legal (origin, orientation) for a ship of `length` on `board`.
/// A one-cell ship is only listed horizontally so each layout counts once.
pub fn legal_placements(board: &Board, length: usize) -> Vec<(Coord, Orientation)> {
    let dim = board.dimension();
    let zone = board.exclusion_zone();
    let mut out = Vec::new();
    if length == 0 || length > dim {
        return out;
    }
    for orientation in Orientation::ALL {
        if length == 1 && orientation == Orientation::Vertical {
            continue;
        }
        for row in 0..dim {
            for col in 0..dim {
                let origin = Coord::new(row, col);
                let fits = Ship::run(origin, orientation, length)
                    .all(|c| c.in_bounds(dim) && !zone.contains(c));
                if fits {
                    out.push((origin, orientation));
                }
            }
        }
    }
    out
}

enum Pass {
    Complete,
    Stuck,
    /// The first ship cannot go anywhere; no number of passes will help.
    Impossible,
}

/// Place every ship of `roster` onto `board`. Ships already on the board stay
/// put. On error the board is exactly as it was before the call.
pub fn place_randomly<R: Rng + ?Sized>(
    board: &mut Board,
    roster: &[ShipDef],
    rng: &mut R,
    limits: PlacementLimits,
) -> Result<(), BoardError> {
    let baseline = board.ships().len();
    for attempt in 0..limits.fleet_attempts {
        match fill_pass(board, roster, rng, limits.ship_attempts, baseline) {
            Ok(Pass::Complete) => {
                debug!("fleet placed after {} pass(es)", attempt + 1);
                return Ok(());
            }
            Ok(Pass::Stuck) => {
                debug!("placement pass {} stuck, restarting", attempt + 1);
                rollback(board, baseline);
            }
            Ok(Pass::Impossible) => {
                rollback(board, baseline);
                break;
            }
            Err(e) => {
                rollback(board, baseline);
                return Err(e);
            }
        }
    }
    warn!(
        "no fleet layout for {} ship(s) on a {}x{} board",
        roster.len(),
        board.dimension(),
        board.dimension()
    );
    Err(BoardError::PlacementExhausted)
}

fn fill_pass<R: Rng + ?Sized>(
    board: &mut Board,
    roster: &[ShipDef],
    rng: &mut R,
    budget: usize,
    baseline: usize,
) -> Result<Pass, BoardError> {
    let mut backtracks = 0;
    let mut next = 0;
    while next < roster.len() {
        let def = &roster[next];
        let options = legal_placements(board, def.length());
        if let Some(&(origin, orientation)) = options.choose(rng) {
            let ship = Ship::from_def(def).ok_or(BoardError::InvalidShip)?;
            board.place(ship, origin, orientation)?;
            next += 1;
            continue;
        }
        if next == 0 {
            return Ok(Pass::Impossible);
        }
        if backtracks == budget {
            return Ok(Pass::Stuck);
        }
        backtracks += 1;
        if board.ships().len() > baseline {
            board.pop_ship();
        }
        next -= 1;
    }
    Ok(Pass::Complete)
}

fn rollback(board: &mut Board, baseline: usize) {
    while board.ships().len() > baseline {
        board.pop_ship();
    }
}
