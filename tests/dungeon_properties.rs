use dungeongen::dungeon::graph::{build_room_graph, is_spanning_tree};
use dungeongen::survey::{SurveySettings, survey};
use dungeongen::{
    Color, DungeonParams, GenerationError, GridPos, RegistryError, RoomRole, RoomTypeConfig,
    RoomTypeRegistry, WeightRule, generate_dungeon,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Basic, Entrance, Stairs, Greenhouse (1.0), Treasury (0.5)
fn two_special_registry() -> RoomTypeRegistry {
    let mut registry = RoomTypeRegistry::new();
    registry.register("Basic", Color::rgb(255, 255, 255), false).unwrap();
    registry.register("Entrance", Color::rgb(255, 255, 0), false).unwrap();
    registry.register("Stairs", Color::rgb(255, 0, 0), false).unwrap();
    registry.register("Greenhouse", Color::rgb(0, 255, 0), true).unwrap();
    registry.register("Treasury", Color::rgb(0, 0, 255), true).unwrap();
    registry.set_weight_fn("Greenhouse", |_, _, _, _| 1.0).unwrap();
    registry.set_weight_fn("Treasury", |_, _, _, _| 0.5).unwrap();
    registry.designate(RoomRole::Basic, "Basic").unwrap();
    registry.designate(RoomRole::Entrance, "Entrance").unwrap();
    registry.designate(RoomRole::Exit, "Stairs").unwrap();
    registry
}

#[test]
fn seeded_scenario_is_reproducible() {
    let registry = two_special_registry();
    let a = generate_dungeon(&registry, 20, 100_000, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    let b = generate_dungeon(&registry, 20, 100_000, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
    assert_eq!(a.layout(), b.layout());

    let counts = a.type_counts();
    assert_eq!(counts.get("Entrance"), Some(&1));
    assert_eq!(counts.get("Stairs"), Some(&1));

    let specials = counts.get("Greenhouse").unwrap_or(&0) + counts.get("Treasury").unwrap_or(&0);
    assert_eq!(specials as usize, a.dead_ends().count() - 1);
}

#[test]
fn weighting_ratio_holds_over_many_runs() {
    let registry = two_special_registry();
    let report = survey(
        &registry,
        &SurveySettings {
            size: 20,
            seeds: 0..400,
            max_rejections: 100_000,
        },
    )
    .unwrap();

    // Ожидаемая доля теплиц 2/3
    let share = report.share("Greenhouse");
    assert!((share - 2.0 / 3.0).abs() < 0.05, "greenhouse share {share}");
}

#[test]
fn registering_same_configuration_twice_fails() {
    let params = DungeonParams::default();
    let mut registry = params.build_registry().unwrap();
    for config in &params.room_types {
        assert_eq!(
            registry.register(&config.name, config.color, config.special),
            Err(RegistryError::DuplicateName(config.name.clone()))
        );
    }
}

#[test]
fn all_zero_weights_surface_as_error() {
    let mut registry = two_special_registry();
    registry.set_weight_fn("Greenhouse", |_, _, _, _| 0.0).unwrap();
    registry.set_weight_fn("Treasury", |_, _, _, _| 0.0).unwrap();

    let result = generate_dungeon(&registry, 20, 100_000, &mut ChaCha8Rng::seed_from_u64(1));
    assert!(matches!(
        result,
        Err(GenerationError::Registry(RegistryError::NoEligibleType { .. }))
    ));
}

fn special(name: &str, color: Color, rule: WeightRule) -> RoomTypeConfig {
    RoomTypeConfig {
        name: name.to_string(),
        color,
        special: true,
        weight: Some(rule),
    }
}

#[test]
fn count_and_distance_rules_hold_in_full_generations() {
    let mut params = DungeonParams {
        size: 120,
        ..DungeonParams::default()
    };
    params.room_types.truncate(4); // Entrance, Stairs, Basic, Greenhouse
    params.room_types.extend([
        special(
            "Relic",
            Color::rgb(200, 200, 0),
            WeightRule::Limited {
                weight: 1.0,
                max_count: 1,
            },
        ),
        special(
            "Library",
            Color::rgb(0, 255, 255),
            WeightRule::Distance {
                weight: 5.0,
                min_distance: 6,
            },
        ),
        special(
            "Armory",
            Color::rgb(255, 128, 0),
            WeightRule::Proportional {
                weight: 1.0,
                per_rooms: 60,
            },
        ),
    ]);
    let registry = params.build_registry().unwrap();
    let relic = registry.lookup("Relic").unwrap().id;
    let library = registry.lookup("Library").unwrap().id;
    let armory = registry.lookup("Armory").unwrap().id;

    let mut relics_seen = 0;
    let mut libraries_seen = 0;
    for seed in 0..40 {
        let dungeon =
            generate_dungeon(&registry, params.size, 100_000, &mut ChaCha8Rng::seed_from_u64(seed))
                .unwrap();

        assert!(dungeon.occurrences().get(relic) <= 1, "seed {seed}");
        assert!(dungeon.occurrences().get(armory) <= 2, "seed {seed}");
        for room in dungeon.rooms().iter().filter(|r| r.room_type == library) {
            assert!(room.distance >= 6, "seed {seed}: library at distance {}", room.distance);
        }

        relics_seen += dungeon.occurrences().get(relic);
        libraries_seen += dungeon.occurrences().get(library);
    }
    assert!(relics_seen > 0);
    assert!(libraries_seen > 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_dungeons_keep_their_invariants(seed in any::<u64>(), size in 5usize..150) {
        let registry = two_special_registry();
        let dungeon = generate_dungeon(&registry, size, 1_000_000, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

        // Размер и форма дерева
        prop_assert_eq!(dungeon.len(), size + 1);
        prop_assert!(is_spanning_tree(&build_room_graph(&dungeon)));

        // Вход
        let entrance = dungeon.entrance();
        prop_assert_eq!(entrance.position, GridPos::ORIGIN);
        prop_assert_eq!(&dungeon.room_type(entrance).name, "Entrance");

        // Счётчики соседей совпадают с сеткой
        for room in dungeon.rooms() {
            prop_assert_eq!(room.neighbor_count as usize, dungeon.occupied_neighbors(room.position));
        }

        // Ровно один выход, и он самый дальний тупик
        let stairs = registry.lookup("Stairs").unwrap().id;
        let exits: Vec<_> = dungeon.rooms().iter().filter(|r| r.room_type == stairs).collect();
        prop_assert_eq!(exits.len(), 1);
        let furthest = dungeon.dead_ends().map(|r| r.distance).max().unwrap();
        prop_assert_eq!(exits[0].distance, furthest);

        // Все прочие тупики получили особый тип
        for room in dungeon.dead_ends().filter(|r| r.room_type != stairs) {
            prop_assert!(dungeon.room_type(room).special);
        }
    }
}
