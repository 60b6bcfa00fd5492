//! Match orchestration: setup, turn order, shot legality, win detection and
//! save/restore.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use core::time::Duration;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::TargetView;
use crate::common::{BoardError, CellState, Coord, Orientation, ShotOutcome, Side, StateError};
use crate::config::{ConfigError, GameConfig};
use crate::fleet::{Fleet, FleetState};
use crate::hunter::{AiState, HuntingAi};
use crate::stats::{GameSummary, Outcome, StatsRecorder};
use crate::strategy::Targeting;

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Setup,
    Playing,
    Finished,
}

/// Why a shot was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotRejection {
    NotPlaying,
    NotYourTurn,
    AlreadyShot,
    OutOfBounds,
}

impl fmt::Display for ShotRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotRejection::NotPlaying => write!(f, "the game is not in progress"),
            ShotRejection::NotYourTurn => write!(f, "it is not your turn"),
            ShotRejection::AlreadyShot => write!(f, "that cell was already fired upon"),
            ShotRejection::OutOfBounds => write!(f, "that cell is off the board"),
        }
    }
}

/// Answer to `submit_shot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotResponse {
    pub valid: bool,
    pub outcome: Option<ShotOutcome>,
    pub rejection: Option<ShotRejection>,
    pub sunk_ship_name: Option<String>,
    pub game_over: bool,
    pub winner: Option<Side>,
}

impl ShotResponse {
    fn rejected(reason: ShotRejection) -> Self {
        Self {
            valid: false,
            outcome: None,
            rejection: Some(reason),
            sunk_ship_name: None,
            game_over: false,
            winner: None,
        }
    }
}

/// Shots fired by one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShotTally {
    pub shots: usize,
    pub hits: usize,
    pub misses: usize,
    pub ships_sunk: usize,
}

/// Errors raised while setting up a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    Config(ConfigError),
    Placement(BoardError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Config(e) => write!(f, "invalid configuration: {}", e),
            MatchError::Placement(e) => write!(f, "fleet placement failed: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}

impl From<ConfigError> for MatchError {
    fn from(err: ConfigError) -> Self {
        MatchError::Config(err)
    }
}

impl From<BoardError> for MatchError {
    fn from(err: BoardError) -> Self {
        MatchError::Placement(err)
    }
}

/// Serializable match state for saving and resuming.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    pub config: GameConfig,
    pub phase: Phase,
    pub current_turn: Option<Side>,
    pub winner: Option<Side>,
    pub human: FleetState,
    pub ai: FleetState,
    pub targeting: Option<AiState>,
}

/// Upper bound on an encoded save. A full 26×26 match needs a few tens of KiB.
pub const MAX_SAVE_BYTES: u64 = 1 << 20;

#[cfg(feature = "std")]
impl MatchState {
    fn codec() -> impl bincode::Options {
        use bincode::Options;
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(MAX_SAVE_BYTES)
    }

    /// Encode for a save file.
    pub fn to_bytes(&self) -> anyhow::Result<alloc::vec::Vec<u8>> {
        use bincode::Options;
        Ok(Self::codec().serialize(self)?)
    }

    /// Decode a save file. Inputs that claim more than `MAX_SAVE_BYTES` are
    /// refused before anything is allocated for them.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        use bincode::Options;
        if bytes.len() as u64 > MAX_SAVE_BYTES {
            anyhow::bail!("save file is {} bytes, limit is {}", bytes.len(), MAX_SAVE_BYTES);
        }
        Ok(Self::codec().deserialize(bytes)?)
    }
}

/// A human-versus-computer match.
pub struct Match {
    config: GameConfig,
    rng: SmallRng,
    human: Fleet,
    ai: Fleet,
    targeting: Box<dyn Targeting>,
    phase: Phase,
    current_turn: Option<Side>,
    winner: Option<Side>,
}

/// Start a match on a standard board with an entropy-seeded RNG.
#[cfg(feature = "std")]
pub fn new_match(board_size: usize) -> Result<Match, MatchError> {
    let mut seed_rng = rand::rng();
    Match::new(GameConfig::standard(board_size), SmallRng::from_rng(&mut seed_rng))
}

impl Match {
    /// Validate `config`, set up both fleets and place the computer's ships.
    pub fn new(config: GameConfig, rng: SmallRng) -> Result<Self, MatchError> {
        let targeting = Box::new(HuntingAi::new(config.board_size));
        Self::with_targeting(config, rng, targeting)
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, MatchError> {
        Self::new(config, SmallRng::seed_from_u64(seed))
    }

    /// Like [`Match::new`] with a different computer opponent.
    pub fn with_targeting(
        config: GameConfig,
        rng: SmallRng,
        targeting: Box<dyn Targeting>,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        let mut m = Self {
            human: Fleet::new(&config),
            ai: Fleet::new(&config),
            config,
            rng,
            targeting,
            phase: Phase::Setup,
            current_turn: None,
            winner: None,
        };
        m.ai.place_remaining_randomly(&mut m.rng, m.config.placement)?;
        info!("new {}x{} match", m.config.board_size, m.config.board_size);
        Ok(m)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_turn(&self) -> Option<Side> {
        self.current_turn
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// The fleet belonging to `side`.
    pub fn fleet(&self, side: Side) -> &Fleet {
        match side {
            Side::Human => &self.human,
            Side::Ai => &self.ai,
        }
    }

    fn fleet_mut(&mut self, side: Side) -> &mut Fleet {
        match side {
            Side::Human => &mut self.human,
            Side::Ai => &mut self.ai,
        }
    }

    /// What `side` can see of the board it is shooting at.
    pub fn target_view(&self, side: Side) -> TargetView<'_> {
        self.fleet(side.opponent()).board().target_view()
    }

    /// A cell of `side`'s board as the human sees it: ships show on the
    /// human's own board only.
    pub fn cell_state(&self, side: Side, coord: Coord) -> CellState {
        let board = self.fleet(side).board();
        match side {
            Side::Human => board.cell_state(coord),
            Side::Ai => board.public_cell_state(coord),
        }
    }

    /// Shots fired by `side` so far.
    pub fn tally(&self, side: Side) -> ShotTally {
        let target = self.fleet(side.opponent()).board();
        let hits = target.hits().count_ones();
        let misses = target.misses().count_ones();
        ShotTally {
            shots: hits + misses,
            hits,
            misses,
            ships_sunk: target.ships().iter().filter(|s| s.is_sunk()).count(),
        }
    }

    /// Place one ship during setup. Returns `false` when the move is illegal.
    pub fn place_ship(
        &mut self,
        side: Side,
        name: &str,
        origin: Coord,
        orientation: Orientation,
    ) -> bool {
        if self.phase != Phase::Setup {
            return false;
        }
        match self.fleet_mut(side).place_ship(name, origin, orientation) {
            Ok(()) => true,
            Err(e) => {
                debug!("{} cannot place {} at {}: {}", side, name, origin, e);
                false
            }
        }
    }

    /// Place whatever `side` has left at random.
    pub fn place_remaining_randomly(&mut self, side: Side) -> bool {
        if self.phase != Phase::Setup {
            return false;
        }
        let limits = self.config.placement;
        let fleet = match side {
            Side::Human => &mut self.human,
            Side::Ai => &mut self.ai,
        };
        fleet.place_remaining_randomly(&mut self.rng, limits).is_ok()
    }

    /// Leave setup once both fleets are complete.
    pub fn start_play(&mut self) -> bool {
        if self.phase != Phase::Setup
            || !self.human.is_setup_complete()
            || !self.ai.is_setup_complete()
        {
            return false;
        }
        self.phase = Phase::Playing;
        self.current_turn = Some(self.config.first_turn);
        info!("match started, {} to move", self.config.first_turn);
        true
    }

    /// Fire at the opponent of `side`.
    pub fn submit_shot(&mut self, side: Side, coord: Coord) -> ShotResponse {
        if self.phase != Phase::Playing {
            return ShotResponse::rejected(ShotRejection::NotPlaying);
        }
        if self.current_turn != Some(side) {
            return ShotResponse::rejected(ShotRejection::NotYourTurn);
        }
        if !coord.in_bounds(self.config.board_size) {
            return ShotResponse::rejected(ShotRejection::OutOfBounds);
        }
        let target = self.fleet_mut(side.opponent());
        if target.board().is_shot(coord) {
            return ShotResponse::rejected(ShotRejection::AlreadyShot);
        }
        let outcome = target.receive_shot(coord);
        let defeated = outcome.is_hit() && target.all_sunk();
        if side == Side::Ai {
            self.targeting.handle_result(coord, &outcome);
        }

        if defeated {
            self.phase = Phase::Finished;
            self.current_turn = None;
            self.winner = Some(side);
            info!("{} wins", side);
        } else {
            self.current_turn = Some(side.opponent());
        }
        ShotResponse {
            valid: true,
            sunk_ship_name: outcome.sunk().map(|s| s.name.clone()),
            outcome: Some(outcome),
            rejection: None,
            game_over: defeated,
            winner: self.winner,
        }
    }

    /// The computer's next shot, without firing it.
    pub fn request_ai_shot(&mut self) -> Option<Coord> {
        if self.phase != Phase::Playing || self.current_turn != Some(Side::Ai) {
            return None;
        }
        let view = self.human.board().target_view();
        self.targeting.select_target(&mut self.rng, &view)
    }

    /// Pick and fire the computer's shot.
    pub fn play_ai_turn(&mut self) -> Option<(Coord, ShotResponse)> {
        let coord = self.request_ai_shot()?;
        Some((coord, self.submit_shot(Side::Ai, coord)))
    }

    /// Fresh match with the same configuration, continuing the RNG stream.
    pub fn restart(&mut self) -> Result<(), MatchError> {
        self.human.reset();
        self.ai.reset();
        self.targeting.reset();
        self.phase = Phase::Setup;
        self.current_turn = None;
        self.winner = None;
        self.ai.place_remaining_randomly(&mut self.rng, self.config.placement)?;
        info!("match restarted");
        Ok(())
    }

    /// Human-side summary of a finished match.
    pub fn summary(&self, elapsed: Duration) -> Option<GameSummary> {
        let outcome = match self.winner? {
            Side::Human => Outcome::Win,
            Side::Ai => Outcome::Loss,
        };
        let tally = self.tally(Side::Human);
        Some(GameSummary::new(
            self.config.board_size,
            tally.hits,
            tally.misses,
            outcome,
            elapsed,
        ))
    }

    /// Hand the finished match to `recorder`.
    pub fn report_outcome(
        &self,
        recorder: &mut dyn StatsRecorder,
        elapsed: Duration,
    ) -> anyhow::Result<GameSummary> {
        let summary = self
            .summary(elapsed)
            .ok_or_else(|| anyhow::anyhow!("match is not finished"))?;
        recorder.record(&summary)?;
        Ok(summary)
    }

    pub fn snapshot(&self) -> MatchState {
        MatchState {
            config: self.config.clone(),
            phase: self.phase,
            current_turn: self.current_turn,
            winner: self.winner,
            human: self.human.state(),
            ai: self.ai.state(),
            targeting: self.targeting.snapshot(),
        }
    }

    /// Rebuild a match from a save, refusing anything inconsistent.
    pub fn restore(state: MatchState, rng: SmallRng) -> Result<Match, StateError> {
        state.config.validate()?;
        let human = Fleet::from_state(state.human, &state.config)?;
        let ai = Fleet::from_state(state.ai, &state.config)?;
        check_phase(
            &state.config,
            state.phase,
            state.current_turn,
            state.winner,
            &human,
            &ai,
        )?;
        let view = human.board().target_view();
        let hunter = match state.targeting {
            Some(saved) => HuntingAi::from_state(saved, &view)?,
            None => HuntingAi::new(state.config.board_size),
        };
        Ok(Match {
            config: state.config,
            rng,
            human,
            ai,
            targeting: Box::new(hunter),
            phase: state.phase,
            current_turn: state.current_turn,
            winner: state.winner,
        })
    }
}

/// Shots fired by `side`, read off the opponent's log.
fn fired(side: Side, human: &Fleet, ai: &Fleet) -> usize {
    match side {
        Side::Human => ai.shot_log().len(),
        Side::Ai => human.shot_log().len(),
    }
}

fn check_phase(
    config: &GameConfig,
    phase: Phase,
    turn: Option<Side>,
    winner: Option<Side>,
    human: &Fleet,
    ai: &Fleet,
) -> Result<(), StateError> {
    let first = config.first_turn;
    let by_first = fired(first, human, ai);
    let by_second = fired(first.opponent(), human, ai);
    let sunk = |side: Side| match side {
        Side::Human => human.all_sunk(),
        Side::Ai => ai.all_sunk(),
    };
    let ready = human.is_setup_complete() && ai.is_setup_complete();

    let ok = match phase {
        Phase::Setup => turn.is_none() && winner.is_none() && by_first == 0 && by_second == 0,
        Phase::Playing => {
            let balanced = match turn {
                Some(t) if t == first => by_first == by_second,
                Some(_) => by_first == by_second + 1,
                None => false,
            };
            ready && winner.is_none() && balanced && !sunk(Side::Human) && !sunk(Side::Ai)
        }
        Phase::Finished => match (turn, winner) {
            (None, Some(w)) => {
                let balanced = if w == first {
                    by_first == by_second + 1
                } else {
                    by_first == by_second
                };
                ready && balanced && sunk(w.opponent()) && !sunk(w)
            }
            _ => false,
        },
    };
    if ok {
        Ok(())
    } else {
        Err(StateError::PhaseMismatch)
    }
}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("current_turn", &self.current_turn)
            .field("winner", &self.winner)
            .field("human", &self.human)
            .field("ai", &self.ai)
            .finish()
    }
}
