use ascii_city_core::{BuildingKind, CellCoord, Command, Event, GameStatus, VisualState};
use ascii_city_world::{self as world, query, World, WorldConfig};

fn config() -> WorldConfig {
    WorldConfig {
        columns: 120,
        rows: 40,
        starting_cash: 1_000.0,
        seeded_houses: 0,
        ..WorldConfig::default()
    }
}

fn step(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Simulate, &mut events);
    events
}

#[test]
fn office_boost_applies_exactly_once() {
    let layout = [
        (BuildingKind::Office, CellCoord::new(0, 0)),
        (BuildingKind::Shop, CellCoord::new(10, 0)),
        (BuildingKind::SmallHouse, CellCoord::new(20, 0)),
    ];
    let mut world = World::from_layout(&config(), &layout).expect("legal layout");

    let mut boosts = 0;
    for _ in 0..50 {
        boosts += step(&mut world)
            .iter()
            .filter(|event| matches!(event, Event::ProductionBoosted { .. }))
            .count();
    }

    let economy = query::economy(&world);
    assert_eq!(boosts, 1, "one office boosts once");
    assert!((economy.production_boost - 0.2).abs() < 1e-9);
    assert!(
        (economy.cash - (1_000.0 + 50.0 * 2.4)).abs() < 1e-6,
        "office precedes the shop, so every payout is boosted: {}",
        economy.cash
    );
}

#[test]
fn boosts_stack_across_offices() {
    let layout = [
        (BuildingKind::Office, CellCoord::new(0, 0)),
        (BuildingKind::Office, CellCoord::new(10, 0)),
        (BuildingKind::Factory, CellCoord::new(20, 0)),
        (BuildingKind::SmallHouse, CellCoord::new(30, 0)),
    ];
    let mut world = World::from_layout(&config(), &layout).expect("legal layout");

    let events = step(&mut world);
    let economy = query::economy(&world);

    assert!((economy.production_boost - 0.4).abs() < 1e-9);
    assert!((economy.cash_delta - 7.0).abs() < 1e-9);
    assert_eq!(economy.pollution_delta, 1);
    assert!(matches!(
        events.last(),
        Some(Event::Simulated { step: 1, .. })
    ));
}

#[test]
fn abandonment_pressure_raises_threshold_monotonically() {
    let mut layout = vec![(BuildingKind::Factory, CellCoord::new(0, 0))];
    for index in 0..6 {
        layout.push((BuildingKind::SmallHouse, CellCoord::new(10 + index * 6, 0)));
    }
    let mut world = World::from_layout(&config(), &layout).expect("legal layout");

    let mut pressure = 0;
    let mut abandonments = 0;
    for _ in 0..5_000 {
        let events = step(&mut world);
        let Some(Event::Simulated { economy, .. }) = events
            .iter()
            .find(|event| matches!(event, Event::Simulated { .. }))
        else {
            panic!("every step reports the economy");
        };

        let mut trial_pressure = pressure;
        for event in &events {
            if let Event::HouseAbandoned { residents, .. } = event {
                assert_eq!(*residents, 10);
                assert!(
                    economy.pollution > 300 + 20 * trial_pressure,
                    "abandonment below threshold: pollution {} pressure {trial_pressure}",
                    economy.pollution,
                );
                trial_pressure += 1;
                abandonments += 1;
            }
        }

        assert!(economy.abandonment_pressure >= pressure);
        assert_eq!(economy.abandonment_pressure, trial_pressure);
        pressure = economy.abandonment_pressure;

        if query::status(&world) == GameStatus::Won {
            break;
        }
    }

    assert_eq!(abandonments, 6);
    assert_eq!(pressure, 6);
    assert_eq!(query::economy(&world).population, 0);
}

#[test]
fn heavy_pollution_empties_the_city() {
    let mut layout = Vec::new();
    for index in 0..10 {
        layout.push((BuildingKind::BigFactory, CellCoord::new(index * 10, 0)));
    }
    layout.push((BuildingKind::House, CellCoord::new(0, 10)));
    layout.push((BuildingKind::House, CellCoord::new(10, 10)));
    layout.push((BuildingKind::SmallHouse, CellCoord::new(20, 10)));
    layout.push((BuildingKind::SmallHouse, CellCoord::new(30, 10)));
    let mut world = World::from_layout(&config(), &layout).expect("legal layout");
    assert_eq!(query::economy(&world).population, 100);

    let mut won_at = None;
    for index in 0..2_000 {
        let events = step(&mut world);
        if events.contains(&Event::CityAbandoned) {
            won_at = Some(index);
            break;
        }
    }

    assert!(won_at.is_some(), "pollution must drive everyone away");
    assert_eq!(query::economy(&world).population, 0);
    assert_eq!(query::status(&world), GameStatus::Won);

    let abandoned = query::building_view(&world)
        .iter()
        .filter(|building| building.visual == VisualState::Abandoned)
        .count();
    assert_eq!(abandoned, 4);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SelectBuilding {
            kind: BuildingKind::Shop,
        },
        &mut events,
    );
    assert!(events.is_empty(), "input is ignored after the win");
}

#[test]
fn clean_city_never_loses_residents() {
    let layout = [
        (BuildingKind::House, CellCoord::new(0, 0)),
        (BuildingKind::Shop, CellCoord::new(10, 0)),
    ];
    let mut world = World::from_layout(&config(), &layout).expect("legal layout");

    for _ in 0..500 {
        let events = step(&mut world);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::HouseAbandoned { .. })));
    }

    assert_eq!(query::economy(&world).population, 40);
    assert_eq!(query::status(&world), GameStatus::Running);
}
