use broadside::{ConfigError, GameConfig, PlacementLimits, ShipDef, Side, STANDARD_SIZES};

#[test]
fn test_standard_roster() {
    let config = GameConfig::default();
    assert_eq!(config.board_size, 10);
    assert_eq!(config.first_turn, Side::Human);
    assert_eq!(config.placement, PlacementLimits { ship_attempts: 20, fleet_attempts: 200 });
    let lengths: Vec<_> = config.roster.iter().map(|d| (d.name(), d.length())).collect();
    assert_eq!(
        lengths,
        vec![
            ("Aircraft Carrier", 5),
            ("Battleship", 4),
            ("Submarine", 3),
            ("Destroyer", 3),
            ("Patrol Boat", 2),
        ]
    );
    assert_eq!(config.total_ship_cells(), 17);
    assert_eq!(config.ship("Submarine"), Some(&ShipDef::new("Submarine", 3)));
    for size in STANDARD_SIZES {
        assert_eq!(GameConfig::standard(size).validate(), Ok(()));
    }
}

#[test]
fn test_validation_errors() {
    assert_eq!(GameConfig::standard(4).validate(), Err(ConfigError::BoardSize(4)));
    assert_eq!(GameConfig::standard(27).validate(), Err(ConfigError::BoardSize(27)));
    assert_eq!(
        GameConfig::standard(10).with_roster(Vec::new()).validate(),
        Err(ConfigError::EmptyRoster)
    );
    assert_eq!(
        GameConfig::standard(10)
            .with_roster(vec![ShipDef::new(" ", 2)])
            .validate(),
        Err(ConfigError::UnnamedShip)
    );
    assert_eq!(
        GameConfig::standard(6)
            .with_roster(vec![ShipDef::new("Long", 7)])
            .validate(),
        Err(ConfigError::ShipLength { name: "Long".into(), length: 7 })
    );
    assert_eq!(
        GameConfig::standard(10)
            .with_roster(vec![ShipDef::new("Raft", 0)])
            .validate(),
        Err(ConfigError::ShipLength { name: "Raft".into(), length: 0 })
    );
    assert_eq!(
        GameConfig::standard(10)
            .with_roster(vec![ShipDef::new("Twin", 2), ShipDef::new("Twin", 3)])
            .validate(),
        Err(ConfigError::DuplicateName("Twin".into()))
    );
    let mut config = GameConfig::standard(10);
    config.placement.fleet_attempts = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroAttempts));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::BoardSize(3).to_string(),
        "board size 3 outside 5..=26"
    );
    assert_eq!(
        ConfigError::DuplicateName("Twin".into()).to_string(),
        "ship name Twin is used twice"
    );
}
