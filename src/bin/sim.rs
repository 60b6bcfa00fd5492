//! Plays one computer-versus-computer match and prints the result as JSON.

use broadside::{GameConfig, HuntingAi, Match, Side, Targeting};
use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[derive(Parser)]
#[command(about = "Run a seeded AI vs AI match")]
struct Args {
    /// Seed for the match (AI fleet, AI shots and the first side's layout).
    seed1: u64,
    /// Seed for the opposing hunter's shots.
    seed2: u64,
    #[arg(long, default_value_t = 10)]
    size: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = GameConfig::standard(args.size);
    let dim = config.board_size;

    let mut game = Match::with_seed(config, args.seed1).map_err(|e| anyhow::anyhow!(e))?;
    if !game.place_remaining_randomly(Side::Human) || !game.start_play() {
        anyhow::bail!("could not set up the match");
    }

    let mut hunter = HuntingAi::new(dim);
    let mut rng = SmallRng::seed_from_u64(args.seed2);
    let limit = 2 * dim * dim;
    let mut turns = 0;
    while !game.is_game_over() && turns < limit {
        turns += 1;
        match game.current_turn() {
            Some(Side::Human) => {
                let Some(coord) = hunter.select_target(&mut rng, &game.target_view(Side::Human))
                else {
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

    let human = game.tally(Side::Human);
    let ai = game.tally(Side::Ai);
    let winner = game.winner().map(|w| match w {
        Side::Human => "player1",
        Side::Ai => "player2",
    });
    let result = json!({
        "board_size": dim,
        "player1": {"shots": human.shots, "hits": human.hits, "sunk": human.ships_sunk},
        "player2": {"shots": ai.shots, "hits": ai.hits, "sunk": ai.ships_sunk},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
