// src/dungeon/assign.rs
//! Назначение выхода и особых комнат в тупиках

use super::Dungeon;
use crate::error::GenerationError;
use crate::room_type::RoomTypeId;
use rand::Rng;
use rand::seq::SliceRandom;

/// Проход по тупикам готового дерева
///
/// Выходом становится тупик с наибольшим расстоянием от входа (при равенстве —
/// созданный позже). Остальные тупики в случайном порядке получают тип из
/// [`RoomTypeRegistry::pick_weighted`](crate::room_type::RoomTypeRegistry::pick_weighted);
/// счётчики назначений обновляются сразу, так что порядок влияет на следующие веса.
pub(crate) fn assign_special_rooms<R: Rng + ?Sized>(
    dungeon: &mut Dungeon<'_>,
    basic: RoomTypeId,
    exit: RoomTypeId,
    rng: &mut R,
) -> Result<(), GenerationError> {
    let registry = dungeon.registry;

    let mut dead_ends: Vec<usize> = dungeon
        .rooms
        .iter()
        .enumerate()
        .filter(|(_, room)| room.is_dead_end() && room.room_type == basic)
        .map(|(idx, _)| idx)
        .collect();
    // Стабильная сортировка: среди равных последним остаётся созданный позже
    dead_ends.sort_by_key(|&idx| dungeon.rooms[idx].distance);

    let Some(exit_idx) = dead_ends.pop() else {
        log::warn!("dungeon has no dead ends, exit not placed");
        return Ok(());
    };
    dungeon.rooms[exit_idx].room_type = exit;
    dungeon.exit = Some(exit_idx);
    log::debug!(
        "exit placed at {:?}, distance {}",
        dungeon.rooms[exit_idx].position,
        dungeon.rooms[exit_idx].distance
    );

    dead_ends.shuffle(rng);
    for idx in dead_ends {
        let distance = dungeon.rooms[idx].distance;
        let picked = registry.pick_weighted(rng, distance, &dungeon.occurrences, dungeon.size)?;
        dungeon.rooms[idx].room_type = picked;
        dungeon.occurrences.increment(picked);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::assign_special_rooms;
    use crate::config::DungeonParams;
    use crate::dungeon::{Dungeon, generate_dungeon};
    use crate::error::{GenerationError, RegistryError};
    use crate::grid::GridPos;
    use crate::room::Room;
    use crate::room_type::{Color, OccurrenceCounts, RoomRole, RoomTypeRegistry};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    /// Вход с двумя ветками: `(0, 1) → (0, 2)` и `(1, 0) → (2, 0)`.
    /// Оба тупика на расстоянии 2; порядок создания задаёт `east_last`.
    fn two_equal_branches(registry: &RoomTypeRegistry, east_last: bool) -> Dungeon<'_> {
        let basic = registry.role(RoomRole::Basic).unwrap();
        let mut dungeon = Dungeon {
            registry,
            size: 4,
            rooms: Vec::new(),
            index: HashMap::new(),
            occurrences: OccurrenceCounts::new(),
            exit: None,
        };

        let room = |x, y, distance, neighbors| {
            let mut room = Room::new(GridPos::new(x, y), basic, distance);
            room.neighbor_count = neighbors;
            room
        };
        dungeon.insert(room(0, 0, 0, 2));
        dungeon.insert(room(0, 1, 1, 2));
        dungeon.insert(room(1, 0, 1, 2));
        let (first, second) = if east_last {
            (room(0, 2, 2, 1), room(2, 0, 2, 1))
        } else {
            (room(2, 0, 2, 1), room(0, 2, 2, 1))
        };
        dungeon.insert(first);
        dungeon.insert(second);
        dungeon
    }

    fn registry_with(weight: f64) -> RoomTypeRegistry {
        let mut registry = RoomTypeRegistry::new();
        registry.register("Entrance", Color::rgb(255, 255, 0), false).unwrap();
        registry.register("Stairs", Color::rgb(255, 0, 0), false).unwrap();
        registry.register("Basic", Color::rgb(255, 255, 255), false).unwrap();
        registry.register("Temple", Color::rgb(255, 0, 255), true).unwrap();
        registry
            .set_weight_fn("Temple", move |_, _, _, _| weight)
            .unwrap();
        registry.designate(RoomRole::Basic, "Basic").unwrap();
        registry.designate(RoomRole::Entrance, "Entrance").unwrap();
        registry.designate(RoomRole::Exit, "Stairs").unwrap();
        registry
    }

    #[test]
    fn exit_is_the_furthest_dead_end() {
        let registry = DungeonParams::default().build_registry().unwrap();
        for seed in 0..30 {
            let dungeon =
                generate_dungeon(&registry, 50, 100_000, &mut ChaCha8Rng::seed_from_u64(seed))
                    .unwrap();
            let exit = dungeon.exit().unwrap();
            let furthest = dungeon.dead_ends().map(|r| r.distance).max().unwrap();
            assert_eq!(exit.distance, furthest);
            assert_eq!(dungeon.room_type(exit).name, "Stairs");
        }
    }

    #[test]
    fn every_other_dead_end_becomes_special() {
        let registry = registry_with(1.0);
        let temple = registry.lookup("Temple").unwrap().id;
        let dungeon =
            generate_dungeon(&registry, 60, 100_000, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();

        let dead_ends = dungeon.dead_ends().count() as u32;
        assert_eq!(dungeon.occurrences().get(temple), dead_ends - 1);
        assert!(
            dungeon
                .rooms()
                .iter()
                .filter(|r| !r.is_dead_end())
                .all(|r| r.room_type != temple)
        );
    }

    #[test]
    fn zero_weights_abort_generation() {
        let registry = registry_with(0.0);
        let result = generate_dungeon(&registry, 30, 100_000, &mut ChaCha8Rng::seed_from_u64(2));
        assert!(matches!(
            result,
            Err(GenerationError::Registry(RegistryError::NoEligibleType { .. }))
        ));
    }

    #[test]
    fn equal_distance_tie_goes_to_the_later_dead_end() {
        let registry = DungeonParams::default().build_registry().unwrap();
        let basic = registry.role(RoomRole::Basic).unwrap();
        let exit = registry.role(RoomRole::Exit).unwrap();

        for (east_last, expected) in [(true, GridPos::new(2, 0)), (false, GridPos::new(0, 2))] {
            let mut dungeon = two_equal_branches(&registry, east_last);
            assign_special_rooms(&mut dungeon, basic, exit, &mut ChaCha8Rng::seed_from_u64(0))
                .unwrap();

            assert_eq!(dungeon.exit().unwrap().position, expected);
            assert_eq!(dungeon.room(expected).unwrap().room_type, exit);
            assert_eq!(dungeon.occurrences().total(), 1);
        }
    }
}
