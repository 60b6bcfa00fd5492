//! Commonly used types and utilities for ease of import.

pub use crate::{
    Coord, GameConfig, HuntingAi, Match, Orientation, Phase, ShotOutcome, ShotResponse, Side,
    StatsRecorder, Targeting,
};

#[cfg(feature = "std")]
pub use crate::{init_logging, new_match, JsonLinesRecorder};
