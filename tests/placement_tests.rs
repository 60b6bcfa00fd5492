use broadside::placement::{legal_placements, place_randomly};
use broadside::{
    Board, BoardError, Coord, Fleet, GameConfig, Orientation, PlacementLimits, Ship, ShipDef,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn assert_no_touching(board: &Board) {
    let ships = board.ships();
    for (i, a) in ships.iter().enumerate() {
        for b in &ships[i + 1..] {
            for ca in a.cells() {
                for cb in b.cells() {
                    let dr = ca.row.abs_diff(cb.row);
                    let dc = ca.col.abs_diff(cb.col);
                    assert!(
                        dr > 1 || dc > 1,
                        "{} at {} touches {} at {}",
                        a.name(),
                        ca,
                        b.name(),
                        cb
                    );
                }
            }
        }
    }
}

#[test]
fn test_thousand_standard_placements() {
    let config = GameConfig::standard(10);
    for seed in 0..1000u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new(10);
        place_randomly(&mut board, &config.roster, &mut rng, config.placement).unwrap();
        assert_eq!(board.ships().len(), config.roster.len());
        assert_eq!(board.ship_map().count_ones(), config.total_ship_cells());
        assert_no_touching(&board);
    }
}

#[test]
fn test_large_board_placement() {
    let config = GameConfig::standard(15);
    for seed in 0..100u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new(15);
        place_randomly(&mut board, &config.roster, &mut rng, config.placement).unwrap();
        assert_eq!(board.ship_map().count_ones(), config.total_ship_cells());
        assert_no_touching(&board);
    }
}

#[test]
fn test_same_seed_same_layout() {
    let config = GameConfig::standard(10);
    let layout = |seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new(10);
        place_randomly(&mut board, &config.roster, &mut rng, config.placement).unwrap();
        board
    };
    assert_eq!(layout(7), layout(7));
}

#[test]
fn test_legal_placements_counts() {
    let board = Board::new(5);
    // 5 rows x 4 starts, both ways
    assert_eq!(legal_placements(&board, 2).len(), 40);
    // single cells listed once
    assert_eq!(legal_placements(&board, 1).len(), 25);
    assert!(legal_placements(&board, 6).is_empty());

    let mut board = Board::new(5);
    board
        .place(Ship::new("A", 5).unwrap(), Coord::new(2, 0), Orientation::Horizontal)
        .unwrap();
    // rows 1-3 are blocked; rows 0 and 4 take 4 horizontal starts each
    assert_eq!(legal_placements(&board, 2).len(), 8);
    for (origin, orientation) in legal_placements(&board, 2) {
        assert!(board.check_placement(2, origin, orientation).is_ok());
    }
}

#[test]
fn test_impossible_roster_rolls_back() {
    let mut board = Board::new(5);
    board
        .place(Ship::new("Keep", 2).unwrap(), Coord::new(0, 0), Orientation::Horizontal)
        .unwrap();
    let before = board.clone();
    // no room for six ships of length 3 on a 5x5 board
    let roster: Vec<ShipDef> = (0..6).map(|i| ShipDef::new(format!("S{}", i), 3)).collect();
    let mut rng = SmallRng::seed_from_u64(1);
    let limits = PlacementLimits {
        ship_attempts: 5,
        fleet_attempts: 10,
    };
    assert_eq!(
        place_randomly(&mut board, &roster, &mut rng, limits),
        Err(BoardError::PlacementExhausted)
    );
    assert_eq!(board, before);
}

#[test]
fn test_manual_ships_stay_put() {
    let config = GameConfig::standard(10);
    let mut fleet = Fleet::new(&config);
    fleet
        .place_ship("Aircraft Carrier", Coord::new(9, 0), Orientation::Horizontal)
        .unwrap();
    let carrier = fleet.placed_ship("Aircraft Carrier").unwrap().clone();

    let mut rng = SmallRng::seed_from_u64(3);
    fleet
        .place_remaining_randomly(&mut rng, config.placement)
        .unwrap();
    assert!(fleet.is_setup_complete());
    assert_eq!(fleet.placed_ship("Aircraft Carrier"), Some(&carrier));
    assert_eq!(fleet.placed().count(), 5);
    assert_no_touching(fleet.board());
}

#[test]
fn test_fleet_failure_has_no_side_effects() {
    let config = GameConfig::standard(5).with_roster(
        (0..6).map(|i| ShipDef::new(format!("S{}", i), 3)).collect(),
    );
    let mut fleet = Fleet::new(&config);
    fleet
        .place_ship("S0", Coord::new(0, 0), Orientation::Horizontal)
        .unwrap();
    let before = fleet.clone();
    let mut rng = SmallRng::seed_from_u64(9);
    let limits = PlacementLimits {
        ship_attempts: 3,
        fleet_attempts: 5,
    };
    assert_eq!(
        fleet.place_remaining_randomly(&mut rng, limits),
        Err(BoardError::PlacementExhausted)
    );
    assert_eq!(fleet, before);
}

#[test]
fn test_fleet_place_ship_errors() {
    let config = GameConfig::standard(10);
    let mut fleet = Fleet::new(&config);
    assert_eq!(
        fleet.place_ship("Rowboat", Coord::new(0, 0), Orientation::Horizontal),
        Err(BoardError::NameNotFound)
    );
    fleet
        .place_ship("Patrol Boat", Coord::new(0, 0), Orientation::Horizontal)
        .unwrap();
    assert_eq!(
        fleet.place_ship("Patrol Boat", Coord::new(5, 5), Orientation::Horizontal),
        Err(BoardError::ShipAlreadyPlaced)
    );
    assert_eq!(
        fleet.place_ship("Destroyer", Coord::new(1, 0), Orientation::Horizontal),
        Err(BoardError::ShipTouches)
    );
    assert_eq!(fleet.remaining_roster().len(), 4);
}
