use alloc::collections::VecDeque;
use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::ai;
use crate::board::TargetView;
use crate::common::{Coord, ShotOutcome};
use crate::hunter::AiState;

/// Shot-selection contract shared by every computer opponent.
pub trait Targeting: Send {
    /// Choose the next cell to fire at, or `None` when nothing is left.
    /// Only the public view of the opponent's board is available.
    fn select_target(&mut self, rng: &mut SmallRng, view: &TargetView<'_>) -> Option<Coord>;

    /// Inform the strategy of the result of its last shot.
    fn handle_result(&mut self, _coord: Coord, _outcome: &ShotOutcome) {}

    /// Saveable state, for strategies that carry any.
    fn snapshot(&self) -> Option<AiState> {
        None
    }

    /// Forget everything learned in the current match.
    fn reset(&mut self) {}
}

/// Fires at a uniformly random open cell every turn.
#[derive(Debug, Default, Clone)]
pub struct RandomTargeting;

impl RandomTargeting {
    pub fn new() -> Self {
        Self
    }
}

impl Targeting for RandomTargeting {
    fn select_target(&mut self, rng: &mut SmallRng, view: &TargetView<'_>) -> Option<Coord> {
        ai::uniform_shot(view, rng)
    }
}

/// Replays a fixed list of shots, skipping any already fired upon. Every
/// reported result is kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct ScriptedTargeting {
    script: VecDeque<Coord>,
    results: Vec<(Coord, ShotOutcome)>,
}

impl ScriptedTargeting {
    pub fn new(script: impl IntoIterator<Item = Coord>) -> Self {
        Self {
            script: script.into_iter().collect(),
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[(Coord, ShotOutcome)] {
        &self.results
    }

    /// Shots not yet taken.
    pub fn pending(&self) -> usize {
        self.script.len()
    }
}

impl Targeting for ScriptedTargeting {
    fn select_target(&mut self, _rng: &mut SmallRng, view: &TargetView<'_>) -> Option<Coord> {
        while let Some(c) = self.script.pop_front() {
            if view.is_open(c) {
                return Some(c);
            }
        }
        None
    }

    fn handle_result(&mut self, coord: Coord, outcome: &ShotOutcome) {
        self.results.push((coord, outcome.clone()));
    }

    fn reset(&mut self) {
        self.results.clear();
    }
}
