//! End-of-game summaries and where they get recorded.

use alloc::vec::Vec;
use core::time::Duration;

/// Result of a match from the human's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Win,
    Loss,
}

/// One finished match, seen from the human side.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSummary {
    pub board_size: usize,
    pub shots: usize,
    pub hits: usize,
    pub misses: usize,
    pub outcome: Outcome,
    pub elapsed_secs: u64,
    /// Hits over shots, in percent. Zero when no shot was fired.
    pub accuracy: f64,
}

impl GameSummary {
    pub fn new(board_size: usize, hits: usize, misses: usize, outcome: Outcome, elapsed: Duration) -> Self {
        let shots = hits + misses;
        let accuracy = percent(hits, shots);
        Self {
            board_size,
            shots,
            hits,
            misses,
            outcome,
            elapsed_secs: elapsed.as_secs(),
            accuracy,
        }
    }
}

/// Wins taking at most this many shots count as quick.
pub const QUICK_WIN_SHOTS: usize = 30;

/// Totals over a player's recorded games.
///
/// Built by the persistence side from stored summaries; a match never
/// aggregates across games itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryTotals {
    pub games_played: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_shots: usize,
    pub total_hits: usize,
    /// Wins over games played, in percent.
    pub win_rate: f64,
    /// Total hits over total shots, in percent.
    pub accuracy: f64,
    /// Mean of the per-game accuracies, in percent.
    pub average_accuracy: f64,
    /// Fewest shots taken in any game.
    pub best_game: Option<usize>,
    /// Most shots taken in any game.
    pub worst_game: Option<usize>,
    pub average_duration_secs: f64,
    pub quick_wins: usize,
}

impl HistoryTotals {
    pub fn from_games(games: &[GameSummary]) -> Self {
        if games.is_empty() {
            return Self::default();
        }
        let n = games.len();
        let wins = games.iter().filter(|g| g.outcome == Outcome::Win).count();
        let total_shots = games.iter().map(|g| g.shots).sum();
        let total_hits = games.iter().map(|g| g.hits).sum();
        Self {
            games_played: n,
            wins,
            losses: n - wins,
            total_shots,
            total_hits,
            win_rate: percent(wins, n),
            accuracy: percent(total_hits, total_shots),
            average_accuracy: games.iter().map(|g| g.accuracy).sum::<f64>() / n as f64,
            best_game: games.iter().map(|g| g.shots).min(),
            worst_game: games.iter().map(|g| g.shots).max(),
            average_duration_secs: games.iter().map(|g| g.elapsed_secs as f64).sum::<f64>()
                / n as f64,
            quick_wins: games
                .iter()
                .filter(|g| g.outcome == Outcome::Win && g.shots <= QUICK_WIN_SHOTS)
                .count(),
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Sink for finished games.
pub trait StatsRecorder {
    fn record(&mut self, summary: &GameSummary) -> anyhow::Result<()>;
}

/// Keeps summaries in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecorder {
    games: Vec<GameSummary>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> &[GameSummary] {
        &self.games
    }
}

impl StatsRecorder for MemoryRecorder {
    fn record(&mut self, summary: &GameSummary) -> anyhow::Result<()> {
        self.games.push(summary.clone());
        Ok(())
    }
}

#[cfg(feature = "std")]
pub use file::JsonLinesRecorder;

#[cfg(feature = "std")]
mod file {
    use std::fs::{File, OpenOptions};
    use std::io::{BufRead, BufReader, Write};
    use std::path::{Path, PathBuf};

    use super::{GameSummary, StatsRecorder};

    /// Appends one JSON object per finished game to a file.
    #[derive(Debug, Clone)]
    pub struct JsonLinesRecorder {
        path: PathBuf,
    }

    impl JsonLinesRecorder {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Every summary recorded so far. A missing file reads as empty.
        pub fn load(&self) -> anyhow::Result<Vec<GameSummary>> {
            let file = match File::open(&self.path) {
                Ok(f) => f,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            };
            let mut games = Vec::new();
            for line in BufReader::new(file).lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                games.push(serde_json::from_str(&line)?);
            }
            Ok(games)
        }
    }

    impl StatsRecorder for JsonLinesRecorder {
        fn record(&mut self, summary: &GameSummary) -> anyhow::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            let line = serde_json::to_string(summary)?;
            writeln!(file, "{}", line)?;
            log::debug!("recorded game to {}", self.path.display());
            Ok(())
        }
    }
}
