// Density-driven search for the targeting AI.
// Sectors are drawn in proportion to the mean openness of their cells.

use alloc::vec;
use alloc::vec::Vec;
use log::trace;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::board::TargetView;
use crate::common::Coord;

/// How far along each axis a cell looks when scoring.
const REACH: isize = 2;
const AXES: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Side length of a sector on a board of `dim`.
pub fn sector_side(dim: usize) -> usize {
    if dim > 10 {
        5
    } else {
        3
    }
}

/// Share of the orthogonal cells within two steps of `coord` that are still
/// open. Cells off the board do not count either way.
pub fn cell_score(view: &TargetView<'_>, coord: Coord) -> f64 {
    let dim = view.dimension();
    let mut open = 0usize;
    let mut total = 0usize;
    for (dr, dc) in AXES {
        for d in 1..=REACH {
            if let Some(n) = coord.offset(dr * d, dc * d, dim) {
                total += 1;
                if !view.is_shot(n) {
                    open += 1;
                }
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        open as f64 / total as f64
    }
}

/// One square tile of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    /// Top-left cell.
    pub origin: Coord,
    /// Mean score of the open cells; zero when none are open.
    pub density: f64,
    /// Open cells, row-major.
    pub open: Vec<Coord>,
}

/// Tile the board and score every sector. Edge sectors may be smaller.
pub fn sector_densities(view: &TargetView<'_>) -> Vec<Sector> {
    let dim = view.dimension();
    let side = sector_side(dim);
    let mut sectors = Vec::new();
    for top in (0..dim).step_by(side) {
        for left in (0..dim).step_by(side) {
            let mut open = Vec::new();
            let mut sum = 0.0;
            for row in top..(top + side).min(dim) {
                for col in left..(left + side).min(dim) {
                    let c = Coord::new(row, col);
                    if view.is_open(c) {
                        sum += cell_score(view, c);
                        open.push(c);
                    }
                }
            }
            let density = if open.is_empty() {
                0.0
            } else {
                sum / open.len() as f64
            };
            sectors.push(Sector {
                origin: Coord::new(top, left),
                density,
                open,
            });
        }
    }
    sectors
}

/// Per-cell scores for display; shot cells read as zero.
pub fn density_map(view: &TargetView<'_>) -> Vec<Vec<f64>> {
    let dim = view.dimension();
    let mut matrix = vec![vec![0.0f64; dim]; dim];
    for c in view.open_cells() {
        matrix[c.row][c.col] = cell_score(view, c);
    }
    matrix
}

/// Draw a sector by density, then a cell inside it uniformly. Falls back to
/// any open cell when every sector scores zero.
pub fn search_shot<R: Rng + ?Sized>(view: &TargetView<'_>, rng: &mut R) -> Option<Coord> {
    let sectors = sector_densities(view);
    let total: f64 = sectors.iter().map(|s| s.density).sum();
    if total > 0.0 {
        let threshold: f64 = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        let mut chosen = None;
        for sector in sectors.iter().filter(|s| s.density > 0.0) {
            cumulative += sector.density;
            chosen = Some(sector);
            if threshold < cumulative {
                break;
            }
        }
        if let Some(sector) = chosen {
            trace!(
                "sector at {} chosen with density {:.3}",
                sector.origin,
                sector.density
            );
            if let Some(c) = sector.open.choose(rng) {
                return Some(*c);
            }
        }
    }
    uniform_shot(view, rng)
}

/// Any open cell, uniformly.
pub fn uniform_shot<R: Rng + ?Sized>(view: &TargetView<'_>, rng: &mut R) -> Option<Coord> {
    let open: Vec<Coord> = view.open_cells().collect();
    open.choose(rng).copied()
}
