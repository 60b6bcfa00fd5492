#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod ai;
mod bitboard;
mod board;
mod common;
mod config;
mod fleet;
mod game;
mod hunter;
#[cfg(feature = "std")]
mod logging;
pub mod placement;
pub mod prelude;
mod ship;
mod stats;
mod strategy;
#[cfg(feature = "std")]
pub mod ui;

pub use bitboard::{BitBoard, BitBoardError, SetBits};
pub use board::*;
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
pub use hunter::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, LogFilter};
pub use ship::*;
pub use stats::*;
pub use strategy::*;
