use std::collections::HashSet;

use broadside::ai::{cell_score, density_map, search_shot, sector_densities, sector_side};
use broadside::{
    BitBoard, Board, Coord, HuntingAi, Mode, Orientation, RandomTargeting, ScriptedTargeting,
    Ship, ShotOutcome, StateError, SunkShip, TargetView, Targeting,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn c(row: usize, col: usize) -> Coord {
    Coord::new(row, col)
}

fn sunk(name: &str, cells: &[Coord]) -> ShotOutcome {
    ShotOutcome::HitAndSunk(SunkShip {
        name: name.into(),
        cells: cells.to_vec(),
    })
}

#[test]
fn test_scripted_sequence_transitions() {
    let mut ai = HuntingAi::new(10);
    ai.handle_result(c(0, 0), &ShotOutcome::Miss);
    assert_eq!(ai.mode(), Mode::Search);

    ai.handle_result(c(3, 4), &ShotOutcome::Hit);
    assert_eq!(ai.mode(), Mode::Hunt);
    assert_eq!(ai.confirmed_hits(), &[c(3, 4)]);
    assert_eq!(ai.candidates().len(), 4);
    assert_eq!(ai.locked_axis(), None);

    ai.handle_result(c(3, 5), &ShotOutcome::Hit);
    assert_eq!(ai.mode(), Mode::Track);
    assert_eq!(ai.locked_axis(), Some(Orientation::Horizontal));
    let queued: Vec<Coord> = ai.candidates().iter().map(|k| k.coord).collect();
    assert!(queued.contains(&c(3, 3)));
    assert!(queued.contains(&c(3, 6)));

    ai.handle_result(c(3, 6), &sunk("Submarine", &[c(3, 4), c(3, 5), c(3, 6)]));
    assert_eq!(ai.mode(), Mode::Search);
    assert!(ai.confirmed_hits().is_empty());
    assert!(ai.candidates().is_empty());
    assert_eq!(ai.locked_axis(), None);
}

#[test]
fn test_hunt_follows_neighbours_then_axis() {
    let mut board = Board::new(10);
    board
        .place(Ship::new("Submarine", 3).unwrap(), c(3, 4), Orientation::Horizontal)
        .unwrap();
    let mut ai = HuntingAi::new(10);
    let mut rng = SmallRng::seed_from_u64(1);

    let first = board.resolve_shot(c(3, 5));
    ai.handle_result(c(3, 5), &first);

    let mut fired = Vec::new();
    while !board.all_sunk() {
        let shot = ai.select_target(&mut rng, &board.target_view()).unwrap();
        assert!(!board.is_shot(shot), "repeated {}", shot);
        let outcome = board.resolve_shot(shot);
        ai.handle_result(shot, &outcome);
        fired.push(shot);
    }
    // up, down, left (hit, axis locks), then the older end of the run
    assert_eq!(fired, vec![c(2, 5), c(4, 5), c(3, 4), c(3, 6)]);
    assert_eq!(ai.mode(), Mode::Search);
}

#[test]
fn test_track_flips_axis_once_then_searches() {
    let mut ai = HuntingAi::new(10);
    let mut rng = SmallRng::seed_from_u64(2);
    ai.handle_result(c(3, 4), &ShotOutcome::Hit);
    ai.handle_result(c(3, 5), &ShotOutcome::Hit);
    assert_eq!(ai.mode(), Mode::Track);

    let hits: BitBoard = BitBoard::from_iter(10, [c(3, 4), c(3, 5)]).unwrap();
    let misses: BitBoard = BitBoard::from_iter(10, [c(3, 3), c(3, 6)]).unwrap();
    let view = TargetView::new(10, &hits, &misses);
    let shot = ai.select_target(&mut rng, &view).unwrap();
    assert_eq!(ai.locked_axis(), Some(Orientation::Vertical));
    assert!(ai.axis_flipped());
    assert_eq!(shot, c(2, 4));

    // everything across the run is water too
    let misses: BitBoard = BitBoard::from_iter(
        10,
        [c(3, 3), c(3, 6), c(2, 4), c(4, 4), c(2, 5), c(4, 5)],
    )
    .unwrap();
    let view = TargetView::new(10, &hits, &misses);
    let shot = ai.select_target(&mut rng, &view).unwrap();
    assert_eq!(ai.mode(), Mode::Search);
    assert!(view.is_open(shot));
}

#[test]
fn test_sunk_with_other_hits_keeps_hunting() {
    let mut ai = HuntingAi::new(10);
    ai.handle_result(c(3, 4), &ShotOutcome::Hit);
    ai.handle_result(c(4, 6), &ShotOutcome::Hit);
    assert_eq!(ai.mode(), Mode::Hunt);

    ai.handle_result(c(4, 7), &sunk("Patrol Boat", &[c(4, 6), c(4, 7)]));
    assert_eq!(ai.mode(), Mode::Hunt);
    assert_eq!(ai.confirmed_hits(), &[c(3, 4)]);
    assert_eq!(ai.locked_axis(), None);
    assert!(ai
        .candidates()
        .iter()
        .all(|k| k.coord != c(4, 6) && k.coord != c(4, 7)));
    assert!(ai.candidates().iter().any(|k| k.coord == c(2, 4)));
}

#[test]
fn test_sunk_without_cells_clears_everything() {
    let mut ai = HuntingAi::new(10);
    ai.handle_result(c(3, 4), &ShotOutcome::Hit);
    ai.handle_result(c(5, 5), &ShotOutcome::Hit);
    ai.handle_result(c(3, 5), &sunk("Patrol Boat", &[]));
    assert_eq!(ai.mode(), Mode::Search);
    assert!(ai.confirmed_hits().is_empty());
}

#[test]
fn test_search_distribution_covers_many_cells() {
    let board = Board::new(10);
    let mut distinct = HashSet::new();
    for seed in 0..200u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ai = HuntingAi::new(10);
        let shot = ai.select_target(&mut rng, &board.target_view()).unwrap();
        assert!(shot.in_bounds(10));
        distinct.insert(shot);
    }
    assert!(distinct.len() > 50, "only {} distinct cells", distinct.len());
}

#[test]
fn test_no_shot_on_full_board() {
    let hits: BitBoard = BitBoard::new(5);
    let misses: BitBoard = BitBoard::from_iter(5, (0..25).map(|i| c(i / 5, i % 5))).unwrap();
    let view = TargetView::new(5, &hits, &misses);
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(HuntingAi::new(5).select_target(&mut rng, &view), None);
    assert_eq!(RandomTargeting::new().select_target(&mut rng, &view), None);
    assert_eq!(search_shot(&view, &mut rng), None);
}

#[test]
fn test_cell_score_and_sectors() {
    assert_eq!(sector_side(10), 3);
    assert_eq!(sector_side(15), 5);

    let hits: BitBoard = BitBoard::new(10);
    let misses: BitBoard = BitBoard::from_iter(10, [c(5, 6), c(5, 7)]).unwrap();
    let view = TargetView::new(10, &hits, &misses);
    assert_eq!(cell_score(&view, c(5, 5)), 0.75);
    assert_eq!(cell_score(&view, c(0, 0)), 1.0);

    let sectors = sector_densities(&view);
    assert_eq!(sectors.len(), 16);
    let open: usize = sectors.iter().map(|s| s.open.len()).sum();
    assert_eq!(open, 98);
    assert!(sectors.iter().all(|s| s.density > 0.0 && s.density <= 1.0));

    let map = density_map(&view);
    assert_eq!(map[5][6], 0.0);
    assert_eq!(map[5][5], 0.75);

    let empty: BitBoard = BitBoard::new(15);
    let view = TargetView::new(15, &empty, &empty);
    assert_eq!(sector_densities(&view).len(), 9);
}

#[test]
fn test_state_roundtrip_and_validation() {
    let mut board = Board::new(10);
    board
        .place(Ship::new("Submarine", 3).unwrap(), c(3, 4), Orientation::Horizontal)
        .unwrap();
    let mut ai = HuntingAi::new(10);
    for shot in [c(3, 4), c(3, 5)] {
        let outcome = board.resolve_shot(shot);
        ai.handle_result(shot, &outcome);
    }
    let state = ai.state();
    let restored = HuntingAi::from_state(state.clone(), &board.target_view()).unwrap();
    assert_eq!(restored.state(), state);
    assert_eq!(ai.snapshot(), Some(state.clone()));

    // hit the board never saw
    let mut bad = state.clone();
    bad.confirmed_hits.push(c(9, 9));
    assert_eq!(
        HuntingAi::from_state(bad, &board.target_view()).unwrap_err(),
        StateError::TargetingMismatch
    );

    let mut bad = state.clone();
    bad.locked_axis = None;
    assert!(HuntingAi::from_state(bad, &board.target_view()).is_err());

    let mut bad = state;
    bad.dimension = 12;
    assert!(HuntingAi::from_state(bad, &board.target_view()).is_err());
}

#[test]
fn test_scripted_targeting_skips_shot_cells() {
    let mut board = Board::new(5);
    board.resolve_shot(c(0, 0));
    let mut script = ScriptedTargeting::new([c(0, 0), c(1, 1), c(2, 2)]);
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(script.select_target(&mut rng, &board.target_view()), Some(c(1, 1)));
    script.handle_result(c(1, 1), &ShotOutcome::Miss);
    assert_eq!(script.results(), &[(c(1, 1), ShotOutcome::Miss)]);
    assert_eq!(script.pending(), 1);
    assert_eq!(script.snapshot(), None);
}

#[test]
fn test_random_targeting_never_repeats() {
    let mut board = Board::new(6);
    let mut rng = SmallRng::seed_from_u64(4);
    let mut strategy = RandomTargeting::new();
    for _ in 0..36 {
        let shot = strategy.select_target(&mut rng, &board.target_view()).unwrap();
        assert!(!board.is_shot(shot));
        board.resolve_shot(shot);
    }
    assert_eq!(strategy.select_target(&mut rng, &board.target_view()), None);
}
