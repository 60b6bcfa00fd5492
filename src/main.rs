#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    time::Instant,
};

#[cfg(feature = "std")]
use broadside::{
    ai::density_map,
    init_logging,
    ui::{coord_to_string, parse_coord, parse_orientation, print_density_board, print_match_view, render_board},
    GameConfig, HistoryTotals, HuntingAi, JsonLinesRecorder, Match, MatchState, Phase, Side, Targeting,
    DEFAULT_BOARD_SIZE, MAX_SAVE_BYTES,
};
#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Play against the computer in the terminal.
    Play {
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE, help = "Board side length (5-26)")]
        size: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Append a JSON line per finished game to this file")]
        stats: Option<PathBuf>,
        #[arg(long, help = "Resume a game saved with the `save` command")]
        resume: Option<PathBuf>,
        #[arg(long, default_value = "broadside.save", help = "Where `save` writes the game")]
        save: PathBuf,
    },
    /// Watch the computer play itself.
    Auto {
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Print recorded game history.
    History {
        #[arg(long, default_value = "broadside_stats.jsonl")]
        stats: PathBuf,
        /// Number of most recent games to list.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    }
}

#[cfg(feature = "std")]
fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            size,
            seed,
            stats,
            resume,
            save,
        } => {
            let rng = make_rng(seed);
            let game = match resume {
                Some(path) => load_game(&path, rng)?,
                None => Match::new(GameConfig::standard(size), rng).map_err(|e| anyhow::anyhow!(e))?,
            };
            run_interactive(game, stats, &save)?;
        }
        Commands::Auto { size, seed } => {
            let mut game =
                Match::new(GameConfig::standard(size), make_rng(seed)).map_err(|e| anyhow::anyhow!(e))?;
            let rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s.wrapping_add(1)),
                None => SmallRng::from_rng(&mut rand::rng()),
            };
            run_auto(&mut game, rng)?;
        }
        Commands::History { stats, limit } => {
            let games = JsonLinesRecorder::new(stats).load()?;
            if games.is_empty() {
                println!("No games recorded yet.");
                return Ok(());
            }
            print_totals(&HistoryTotals::from_games(&games));
            println!("\nRecent games:");
            let skip = games.len().saturating_sub(limit);
            for (i, g) in games.iter().enumerate().skip(skip).rev() {
                println!(
                    "{:3}. {:?} on {}x{} in {} shots ({:.1}% accuracy, {}s)",
                    i + 1,
                    g.outcome,
                    g.board_size,
                    g.board_size,
                    g.shots,
                    g.accuracy,
                    g.elapsed_secs
                );
            }
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
fn print_totals(t: &HistoryTotals) {
    println!("Games played: {} ({} won, {} lost)", t.games_played, t.wins, t.losses);
    println!("Win rate:     {:.2}%", t.win_rate);
    println!(
        "Accuracy:     {:.2}% overall, {:.2}% per game",
        t.accuracy, t.average_accuracy
    );
    if let (Some(best), Some(worst)) = (t.best_game, t.worst_game) {
        println!("Shots:        best {}, worst {}", best, worst);
    }
    println!("Quick wins:   {}", t.quick_wins);
    println!("Avg duration: {:.0}s", t.average_duration_secs);
}

#[cfg(feature = "std")]
fn load_game(path: &Path, rng: SmallRng) -> anyhow::Result<Match> {
    let len = fs::metadata(path)?.len();
    if len > MAX_SAVE_BYTES {
        anyhow::bail!("{} is too large to be a save file ({} bytes)", path.display(), len);
    }
    let bytes = fs::read(path)?;
    let state = MatchState::from_bytes(&bytes)?;
    let game = Match::restore(state, rng).map_err(|e| anyhow::anyhow!(e))?;
    println!("Resumed game from {}", path.display());
    Ok(game)
}

#[cfg(feature = "std")]
fn save_game(game: &Match, path: &Path) -> anyhow::Result<()> {
    let bytes = game.snapshot().to_bytes()?;
    fs::write(path, bytes)?;
    println!("Game saved to {}", path.display());
    Ok(())
}

#[cfg(feature = "std")]
fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> anyhow::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

#[cfg(feature = "std")]
fn run_setup(game: &mut Match, lines: &mut impl Iterator<Item = io::Result<String>>) -> anyhow::Result<bool> {
    let dim = game.config().board_size;
    println!("Place your ships (e.g. A5 H). Press enter for random placement, 'auto' for the rest.");
    loop {
        let Some(def) = game.fleet(Side::Human).remaining_roster().first().cloned() else {
            return Ok(true);
        };
        print!("{}", render_board(game, Side::Human));
        let Some(line) = prompt(lines, &format!("Place {} (length {}): ", def.name(), def.length()))? else {
            return Ok(false);
        };
        if line.is_empty() || line.eq_ignore_ascii_case("auto") {
            if !game.place_remaining_randomly(Side::Human) {
                anyhow::bail!("could not place the remaining ships");
            }
            continue;
        }
        let mut parts = line.split_whitespace();
        let coord = parts.next().and_then(|p| parse_coord(p, dim));
        let orientation = parts.next().and_then(parse_orientation);
        match (coord, orientation) {
            (Some(c), Some(o)) => {
                if !game.place_ship(Side::Human, def.name(), c, o) {
                    println!("{} cannot go at {}", def.name(), coord_to_string(c));
                }
            }
            _ => println!("Invalid input"),
        }
    }
}

#[cfg(feature = "std")]
fn run_interactive(mut game: Match, stats: Option<PathBuf>, save: &Path) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let dim = game.config().board_size;

    if game.phase() == Phase::Setup {
        if !run_setup(&mut game, &mut lines)? {
            return Ok(());
        }
        game.start_play();
    }

    let started = Instant::now();
    println!("Commands: a cell such as B7, 'hint', 'save', 'quit'.");
    while !game.is_game_over() {
        match game.current_turn() {
            Some(Side::Ai) => {
                let Some((coord, response)) = game.play_ai_turn() else {
                    break;
                };
                match &response.sunk_ship_name {
                    Some(name) => println!("Computer fires at {}: sank your {}!", coord_to_string(coord), name),
                    None => println!("Computer fires at {}: {:?}", coord_to_string(coord), response.outcome),
                }
            }
            Some(Side::Human) => {
                print_match_view(&game);
                let Some(line) = prompt(&mut lines, "Your shot: ")? else {
                    return Ok(());
                };
                match line.to_ascii_lowercase().as_str() {
                    "quit" | "q" => return Ok(()),
                    "save" => {
                        save_game(&game, save)?;
                        continue;
                    }
                    "hint" => {
                        print_density_board(&density_map(&game.target_view(Side::Human)));
                        continue;
                    }
                    _ => {}
                }
                let Some(coord) = parse_coord(&line, dim) else {
                    println!("Invalid input");
                    continue;
                };
                let response = game.submit_shot(Side::Human, coord);
                match (&response.rejection, &response.sunk_ship_name) {
                    (Some(reason), _) => println!("Rejected: {}", reason),
                    (None, Some(name)) => println!("You sank the {}!", name),
                    (None, None) => println!("{:?}", response.outcome),
                }
            }
            None => break,
        }
    }

    print_match_view(&game);
    match game.winner() {
        Some(Side::Human) => println!("You win!"),
        Some(Side::Ai) => println!("The computer wins."),
        None => {}
    }
    if let Some(path) = stats {
        let mut recorder = JsonLinesRecorder::new(path);
        let summary = game.report_outcome(&mut recorder, started.elapsed())?;
        println!("{} shots, {:.1}% accuracy", summary.shots, summary.accuracy);
    }
    Ok(())
}

#[cfg(feature = "std")]
fn run_auto(game: &mut Match, mut rng: SmallRng) -> anyhow::Result<()> {
    if !game.place_remaining_randomly(Side::Human) || !game.start_play() {
        anyhow::bail!("could not set up the match");
    }
    let dim = game.config().board_size;
    let mut hunter = HuntingAi::new(dim);
    while !game.is_game_over() {
        match game.current_turn() {
            Some(Side::Human) => {
                let Some(coord) = hunter.select_target(&mut rng, &game.target_view(Side::Human)) else {
                    break;
                };
                let response = game.submit_shot(Side::Human, coord);
                if let Some(outcome) = &response.outcome {
                    hunter.handle_result(coord, outcome);
                }
            }
            Some(Side::Ai) => {
                if game.play_ai_turn().is_none() {
                    break;
                }
            }
            None => break,
        }
    }
    print_match_view(game);
    let human = game.tally(Side::Human);
    let ai = game.tally(Side::Ai);
    println!(
        "Winner: {:?} after {} / {} shots",
        game.winner(),
        human.shots,
        ai.shots
    );
    Ok(())
}
