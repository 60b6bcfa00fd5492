#![cfg(feature = "std")]

use std::fmt::Write as _;
use std::string::String;

use crate::common::{CellState, Coord, Orientation, Side};
use crate::fleet::Fleet;
use crate::game::Match;

/// Column letter plus one-based row, e.g. `B7`.
pub fn coord_to_string(coord: Coord) -> String {
    let col = (b'A' + coord.col as u8) as char;
    std::format!("{}{}", col, coord.row + 1)
}

/// Parse `B7`-style input for a board of `dim`. Case-insensitive.
pub fn parse_coord(input: &str, dim: usize) -> Option<Coord> {
    let input = input.trim();
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as usize;
    let row: usize = chars.as_str().parse().ok()?;
    if row == 0 {
        return None;
    }
    let coord = Coord::new(row - 1, col);
    coord.in_bounds(dim).then_some(coord)
}

/// `H`/`V`, or the full word.
pub fn parse_orientation(input: &str) -> Option<Orientation> {
    match input.trim().to_ascii_lowercase().as_str() {
        "h" | "horizontal" => Some(Orientation::Horizontal),
        "v" | "vertical" => Some(Orientation::Vertical),
        _ => None,
    }
}

fn header(out: &mut String, dim: usize, width: usize) {
    out.push_str("   ");
    for c in 0..dim {
        let ch = (b'A' + c as u8) as char;
        let _ = write!(out, " {:>width$}", ch, width = width);
    }
    out.push('\n');
}

/// One board as the human sees it.
pub fn render_board(game: &Match, side: Side) -> String {
    let dim = game.config().board_size;
    let mut out = String::new();
    header(&mut out, dim, 1);
    for r in 0..dim {
        let _ = write!(out, "{:2} ", r + 1);
        for c in 0..dim {
            let ch = match game.cell_state(side, Coord::new(r, c)) {
                CellState::Hit => 'X',
                CellState::Miss => 'o',
                CellState::Ship => 'S',
                CellState::Empty | CellState::Invalid => '.',
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    out
}

/// Ship list with health, one per line.
pub fn render_fleet(fleet: &Fleet) -> String {
    let mut out = String::new();
    for ship in fleet.placed() {
        let _ = writeln!(out, "  {}", ship);
    }
    out
}

/// Display the opponent board (top) and the player's board (bottom).
pub fn print_match_view(game: &Match) {
    std::println!("Opponent board:");
    std::print!("{}", render_board(game, Side::Ai));
    std::println!("\nYour board:");
    std::print!("{}", render_board(game, Side::Human));
    std::println!("\nYour fleet:");
    std::print!("{}", render_fleet(game.fleet(Side::Human)));
}

/// Print the per-cell search density.
pub fn print_density_board(map: &[std::vec::Vec<f64>]) {
    let dim = map.len();
    let mut out = String::new();
    header(&mut out, dim, 4);
    for (r, row) in map.iter().enumerate() {
        let _ = write!(out, "{:2} ", r + 1);
        for v in row {
            let _ = write!(out, " {:4.2}", v);
        }
        out.push('\n');
    }
    std::println!("\nSearch density:");
    std::print!("{}", out);
}
