use std::time::Duration;

use broadside::{
    CellState, Coord, GameConfig, Match, MatchError, MemoryRecorder, Orientation, Outcome, Phase,
    ScriptedTargeting, ShipDef, ShotOutcome, ShotRejection, Side, ConfigError,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn c(row: usize, col: usize) -> Coord {
    Coord::new(row, col)
}

fn single_boat_config() -> GameConfig {
    GameConfig::standard(5).with_roster(vec![ShipDef::new("Patrol Boat", 2)])
}

#[test]
fn test_end_to_end_single_boat() {
    let script = ScriptedTargeting::new([c(4, 4), c(4, 3), c(4, 2)]);
    let mut game = Match::with_targeting(
        single_boat_config(),
        SmallRng::seed_from_u64(11),
        Box::new(script),
    )
    .unwrap();
    assert_eq!(game.phase(), Phase::Setup);
    assert!(!game.start_play());

    assert!(game.place_ship(Side::Human, "Patrol Boat", c(0, 0), Orientation::Horizontal));
    assert_eq!(game.cell_state(Side::Human, c(0, 1)), CellState::Ship);
    assert!(game.start_play());
    assert_eq!(game.current_turn(), Some(Side::Human));

    let ai_boat = game.fleet(Side::Ai).placed_ship("Patrol Boat").unwrap().cells().to_vec();
    // the computer's ship is hidden from the human
    assert_eq!(game.cell_state(Side::Ai, ai_boat[0]), CellState::Empty);

    let mut water = (0..25).map(|i| c(i / 5, i % 5)).filter(|x| !ai_boat.contains(x));
    let miss = water.next().unwrap();
    let r = game.submit_shot(Side::Human, miss);
    assert!(r.valid);
    assert_eq!(r.outcome, Some(ShotOutcome::Miss));
    assert_eq!(game.current_turn(), Some(Side::Ai));

    let (shot, r) = game.play_ai_turn().unwrap();
    assert_eq!(shot, c(4, 4));
    assert_eq!(r.outcome, Some(ShotOutcome::Miss));

    let r = game.submit_shot(Side::Human, ai_boat[0]);
    assert_eq!(r.outcome, Some(ShotOutcome::Hit));
    assert_eq!(game.cell_state(Side::Ai, ai_boat[0]), CellState::Hit);
    game.play_ai_turn().unwrap();

    let r = game.submit_shot(Side::Human, ai_boat[1]);
    assert!(r.game_over);
    assert_eq!(r.sunk_ship_name.as_deref(), Some("Patrol Boat"));
    assert_eq!(r.winner, Some(Side::Human));
    assert!(game.is_game_over());
    assert_eq!(game.winner(), Some(Side::Human));
    assert_eq!(game.current_turn(), None);

    let tally = game.tally(Side::Human);
    assert_eq!((tally.shots, tally.hits, tally.misses, tally.ships_sunk), (3, 2, 1, 1));

    let r = game.submit_shot(Side::Ai, c(3, 3));
    assert_eq!(r.rejection, Some(ShotRejection::NotPlaying));
    assert_eq!(game.request_ai_shot(), None);
}

#[test]
fn test_computer_can_win() {
    let script = ScriptedTargeting::new([c(0, 0), c(0, 1)]);
    let mut game = Match::with_targeting(
        single_boat_config().with_first_turn(Side::Ai),
        SmallRng::seed_from_u64(5),
        Box::new(script),
    )
    .unwrap();
    assert!(game.place_ship(Side::Human, "Patrol Boat", c(0, 0), Orientation::Horizontal));
    assert!(game.start_play());
    assert_eq!(game.current_turn(), Some(Side::Ai));

    let ai_boat = game.fleet(Side::Ai).placed_ship("Patrol Boat").unwrap().cells().to_vec();
    let water = (0..25).map(|i| c(i / 5, i % 5)).find(|x| !ai_boat.contains(x)).unwrap();

    let (_, r) = game.play_ai_turn().unwrap();
    assert_eq!(r.outcome, Some(ShotOutcome::Hit));
    game.submit_shot(Side::Human, water);
    let (_, r) = game.play_ai_turn().unwrap();
    assert!(r.game_over);
    assert_eq!(game.winner(), Some(Side::Ai));

    let summary = game.summary(Duration::from_secs(42)).unwrap();
    assert_eq!(summary.outcome, Outcome::Loss);
    assert_eq!(summary.shots, 1);
    assert_eq!(summary.elapsed_secs, 42);
}

#[test]
fn test_turn_enforcement_does_not_mutate() {
    let mut game = Match::with_seed(GameConfig::standard(10), 3).unwrap();

    // still in setup
    let r = game.submit_shot(Side::Human, c(0, 0));
    assert!(!r.valid);
    assert_eq!(r.rejection, Some(ShotRejection::NotPlaying));

    assert!(game.place_remaining_randomly(Side::Human));
    assert!(game.start_play());
    let before = game.snapshot();

    let r = game.submit_shot(Side::Ai, c(0, 0));
    assert_eq!(r.rejection, Some(ShotRejection::NotYourTurn));
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.request_ai_shot(), None);

    let r = game.submit_shot(Side::Human, c(10, 0));
    assert_eq!(r.rejection, Some(ShotRejection::OutOfBounds));
    assert_eq!(game.snapshot(), before);

    assert!(game.submit_shot(Side::Human, c(0, 0)).valid);
    game.play_ai_turn().unwrap();
    let before = game.snapshot();
    let r = game.submit_shot(Side::Human, c(0, 0));
    assert_eq!(r.rejection, Some(ShotRejection::AlreadyShot));
    assert!(r.outcome.is_none());
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.current_turn(), Some(Side::Human));
}

#[test]
fn test_setup_only_moves() {
    let mut game = Match::with_seed(GameConfig::standard(10), 8).unwrap();
    assert!(game.fleet(Side::Ai).is_setup_complete());
    assert!(!game.place_ship(Side::Human, "Rowboat", c(0, 0), Orientation::Horizontal));
    assert!(!game.place_ship(Side::Human, "Destroyer", c(0, 9), Orientation::Horizontal));
    assert!(game.place_remaining_randomly(Side::Human));
    assert!(game.start_play());
    assert!(!game.start_play());
    assert!(!game.place_remaining_randomly(Side::Human));
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = Match::with_seed(GameConfig::standard(4), 0).unwrap_err();
    assert_eq!(err, MatchError::Config(ConfigError::BoardSize(4)));
}

#[test]
fn test_restart_keeps_config() {
    let mut game = Match::with_seed(GameConfig::standard(15), 21).unwrap();
    assert!(game.place_remaining_randomly(Side::Human));
    assert!(game.start_play());
    game.submit_shot(Side::Human, c(7, 7));
    game.restart().unwrap();
    assert_eq!(game.phase(), Phase::Setup);
    assert_eq!(game.config().board_size, 15);
    assert_eq!(game.fleet(Side::Human).remaining_roster().len(), 5);
    assert!(game.fleet(Side::Ai).is_setup_complete());
    assert!(game.fleet(Side::Ai).shot_log().is_empty());
    assert_eq!(game.tally(Side::Human).shots, 0);
}

#[test]
fn test_report_outcome() {
    let mut game = Match::with_seed(single_boat_config(), 2).unwrap();
    let mut recorder = MemoryRecorder::new();
    assert!(game.report_outcome(&mut recorder, Duration::ZERO).is_err());

    assert!(game.place_ship(Side::Human, "Patrol Boat", c(4, 0), Orientation::Horizontal));
    assert!(game.start_play());
    let ai_boat = game.fleet(Side::Ai).placed_ship("Patrol Boat").unwrap().cells().to_vec();
    game.submit_shot(Side::Human, ai_boat[0]);
    game.play_ai_turn().unwrap();
    if !game.is_game_over() {
        game.submit_shot(Side::Human, ai_boat[1]);
    }
    assert!(game.is_game_over());
    let summary = game.report_outcome(&mut recorder, Duration::from_secs(3)).unwrap();
    assert_eq!(recorder.games(), &[summary.clone()]);
    assert_eq!(summary.board_size, 5);
}
