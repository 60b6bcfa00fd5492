use broadside::{Coord, GameConfig, Match, Phase, Side};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn turns_strictly_alternate(seed in any::<u64>(), size in 10usize..=15, ai_first in any::<bool>()) {
        let first = if ai_first { Side::Ai } else { Side::Human };
        let config = GameConfig::standard(size).with_first_turn(first);
        let mut game = Match::with_seed(config, seed).unwrap();
        prop_assert!(game.place_remaining_randomly(Side::Human));
        prop_assert!(game.start_play());
        prop_assert_eq!(game.current_turn(), Some(first));

        let mut rng = SmallRng::seed_from_u64(seed.rotate_left(7));
        let mut expected = first;
        while game.phase() == Phase::Playing {
            prop_assert_eq!(game.current_turn(), Some(expected));
            let response = match expected {
                Side::Human => {
                    let c = Coord::new(rng.random_range(0..size), rng.random_range(0..size));
                    let r = game.submit_shot(Side::Human, c);
                    if !r.valid {
                        // a rejected shot keeps the turn
                        prop_assert_eq!(game.current_turn(), Some(Side::Human));
                        continue;
                    }
                    r
                }
                Side::Ai => game.play_ai_turn().unwrap().1,
            };
            prop_assert!(response.valid);
            if response.game_over {
                prop_assert_eq!(response.winner, Some(expected));
                prop_assert_eq!(game.current_turn(), None);
            } else {
                expected = expected.opponent();
            }
        }

        let human = game.tally(Side::Human);
        let ai = game.tally(Side::Ai);
        prop_assert_eq!(human.shots, human.hits + human.misses);
        prop_assert!(human.shots <= size * size && ai.shots <= size * size);
        let winner = game.winner().unwrap();
        prop_assert!(game.fleet(winner.opponent()).all_sunk());
        prop_assert_eq!(game.tally(winner).hits, game.config().total_ship_cells());
    }
}
