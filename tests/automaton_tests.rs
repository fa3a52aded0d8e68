use naval_duel::core::{Cell, Direction, FleetModel, ShipType, ShotOutcome};
use naval_duel::player::{event_channel, AutomatonPlayer, Player, PlayerEvent, PlayerLink};
use rand::{rngs::SmallRng, SeedableRng};

fn hit_event(event: PlayerEvent) -> ShotOutcome {
    match event {
        PlayerEvent::Hit { outcome, .. } => outcome,
        other => panic!("expected a hit report, got {:?}", other),
    }
}

#[test]
fn sinking_the_submarine() {
    let (tx, mut rx) = event_channel();
    let fleet = FleetModel::dummy(Direction::EAST).unwrap();
    let mut bot = AutomatonPlayer::new(PlayerLink::new(1, tx), 3).with_fleet(fleet);
    bot.start_game();
    assert!(bot.fleet().is_full());

    let cells: Vec<_> = bot.fleet().occupied_cells(ShipType::Submarine).iter().collect();
    assert_eq!(cells.len(), 3);
    for (i, cell) in cells.iter().enumerate() {
        bot.request_hit(*cell);
        let outcome = hit_event(rx.try_recv().unwrap());
        if i < 2 {
            assert_eq!(outcome, ShotOutcome::Hit);
        } else {
            assert_eq!(outcome, ShotOutcome::HitAndSunk);
        }
    }
    assert!(bot.fleet().is_ship_sunk(ShipType::Submarine));
    assert!(!bot.fleet().is_sunk());
}

#[test]
fn last_ship_sunk_is_game_over() {
    let (tx, mut rx) = event_channel();
    let mut fleet = FleetModel::new();
    fleet
        .add_boat(
            ShipType::PatrolBoat,
            Cell::new(8, 9).unwrap(),
            Direction::EAST,
        )
        .unwrap();
    let mut bot = AutomatonPlayer::new(PlayerLink::new(0, tx), 1).with_fleet(fleet);
    bot.request_hit(Cell::new(8, 9).unwrap());
    assert_eq!(hit_event(rx.try_recv().unwrap()), ShotOutcome::Hit);
    bot.request_hit(Cell::new(9, 9).unwrap());
    assert_eq!(hit_event(rx.try_recv().unwrap()), ShotOutcome::GameOver);
}

#[test]
fn random_fleet_is_generated_on_start() {
    let (tx, _rx) = event_channel();
    let mut bot = AutomatonPlayer::new(PlayerLink::new(0, tx), 42);
    assert!(!bot.fleet().is_full());
    bot.start_game();
    assert!(bot.fleet().is_full());
}

#[test]
fn hunts_down_a_whole_fleet_without_repeats() {
    for seed in 0..8 {
        let (tx, mut rx) = event_channel();
        let mut shooter = AutomatonPlayer::new(PlayerLink::new(0, tx), seed);
        shooter.start_game();
        let mut rng = SmallRng::seed_from_u64(seed + 100);
        let mut target = FleetModel::random(&mut rng).unwrap();

        let mut shots = 0;
        loop {
            shooter.request_shot();
            let cell = match rx.try_recv().unwrap() {
                PlayerEvent::Fired { cell, .. } => cell,
                other => panic!("unexpected event {:?}", other),
            };
            shots += 1;
            let outcome = target.resolve_shot(cell).unwrap();
            shooter.show_hit(cell, outcome);
            if outcome == ShotOutcome::GameOver {
                break;
            }
            assert!(shots < 100, "seed {} did not finish", seed);
        }
        assert_eq!(shooter.link().shots_fired(), shots);
    }
}

#[test]
fn refire_is_rejected_without_notification() {
    let (tx, mut rx) = event_channel();
    let mut bot = AutomatonPlayer::new(PlayerLink::new(0, tx), 5);
    let cell = Cell::new(4, 4).unwrap();
    assert!(bot.fire(cell));
    assert!(!bot.fire(cell));
    assert_eq!(rx.try_recv().unwrap(), PlayerEvent::Fired { seat: 0, cell });
    assert!(rx.try_recv().is_err());
}
