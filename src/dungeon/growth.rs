// src/dungeon/growth.rs
//! Рост дерева комнат
//!
//! Новая клетка принимается, только если она свободна и у неё ровно один занятый
//! сосед (считаются соседи самой клетки-кандидата, а не базовой комнаты).
//! Это ограничение не даёт появиться циклам: результат всегда дерево с корнем во входе.

use super::Dungeon;
use crate::error::GenerationError;
use crate::grid::{Direction, GridPos};
use crate::room::Room;
use crate::room_type::RoomTypeId;
use rand::Rng;
use rand::seq::SliceRandom;

/// Случайный порядок четырёх направлений
fn shuffled_directions<R: Rng + ?Sized>(rng: &mut R) -> Result<[Direction; 4], GenerationError> {
    let mut indices = [0u8, 1, 2, 3];
    indices.shuffle(rng);
    Ok([
        Direction::try_from(indices[0])?,
        Direction::try_from(indices[1])?,
        Direction::try_from(indices[2])?,
        Direction::try_from(indices[3])?,
    ])
}

impl Dungeon<'_> {
    /// Индекс единственного занятого соседа свободной клетки `candidate`.
    /// `None`, если клетка занята или соседей не ровно один.
    fn sole_neighbor(&self, candidate: GridPos) -> Option<usize> {
        if self.contains(candidate) {
            return None;
        }

        let mut found = None;
        for neighbor in candidate.neighbors() {
            if let Some(&idx) = self.index.get(&neighbor) {
                if found.is_some() {
                    return None;
                }
                found = Some(idx);
            }
        }
        found
    }

    /// Присоединяет комнату к её единственному соседу
    fn attach(&mut self, position: GridPos, parent: usize, room_type: RoomTypeId) {
        let distance = self.rooms[parent].distance + 1;
        self.rooms[parent].neighbor_count += 1;

        let mut room = Room::new(position, room_type, distance);
        room.neighbor_count = 1;
        self.insert(room);
    }
}

/// Строит вход, начальные комнаты и растит дерево до `dungeon.size` комнат.
///
/// Возвращает число отвергнутых попыток роста.
pub(crate) fn grow<R: Rng + ?Sized>(
    dungeon: &mut Dungeon<'_>,
    basic: RoomTypeId,
    max_rejections: usize,
    rng: &mut R,
) -> Result<usize, GenerationError> {
    // Вход
    dungeon.insert(Room::new(GridPos::ORIGIN, basic, 0));

    // Начальные комнаты: от 2 до 4 направлений вокруг входа
    let directions = shuffled_directions(rng)?;
    let seed_count = rng.gen_range(2..=4usize);
    for &direction in &directions[..seed_count] {
        let mut room = Room::new(GridPos::ORIGIN.step(direction), basic, 1);
        room.neighbor_count = 1;
        dungeon.insert(room);
    }
    dungeon.rooms[0].neighbor_count = seed_count as u8;

    let target = dungeon.size;
    let mut placed = seed_count;
    let mut rejections = 0;
    let mut warned = false;

    while placed < target {
        // Вход не участвует в выборе, чтобы рост не сгущался у начала координат
        let base = dungeon.rooms[rng.gen_range(1..dungeon.rooms.len())].position;

        let mut accepted = false;
        for direction in shuffled_directions(rng)? {
            let candidate = base.step(direction);
            if let Some(parent) = dungeon.sole_neighbor(candidate) {
                dungeon.attach(candidate, parent, basic);
                accepted = true;
                break;
            }
        }

        if accepted {
            placed += 1;
            if placed % 100 == 0 {
                log::debug!("growth: {placed}/{target} rooms placed");
            }
            continue;
        }

        rejections += 1;
        if rejections > max_rejections {
            return Err(GenerationError::Stalled {
                placed,
                target,
                rejections,
            });
        }
        if !warned && rejections > max_rejections / 2 {
            log::warn!(
                "growth is struggling: {rejections} rejected attempts at {placed}/{target} rooms"
            );
            warned = true;
        }
    }

    Ok(rejections)
}
