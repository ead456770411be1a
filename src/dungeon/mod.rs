// src/dungeon/mod.rs
//! Подземелье — связное дерево комнат на целочисленной сетке
//!
//! Генерация идёт в два прохода:
//! 1. [`growth`] — случайный рост дерева от входа в `(0, 0)` с ограничением «ровно один сосед»
//! 2. [`assign`] — самый дальний тупик становится выходом, остальные тупики получают
//!    особые типы взвешенным случайным выбором
//!
//! Результат — [`Dungeon`], который дальше только читается (рендер, экспорт в JSON).
//!
//! ## Пример
//! ```rust
//! use dungeongen::{DungeonParams, generate_dungeon};
//! use rand::SeedableRng;
//!
//! let params = DungeonParams::default();
//! let registry = params.build_registry().unwrap();
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//! let dungeon = generate_dungeon(&registry, 40, 10_000, &mut rng).unwrap();
//!
//! assert_eq!(dungeon.entrance().position, dungeongen::GridPos::ORIGIN);
//! assert!(dungeon.exit().is_some());
//! ```

pub mod assign;
pub mod graph;
pub mod growth;
pub mod png;

use crate::error::GenerationError;
use crate::grid::GridPos;
use crate::room::Room;
use crate::room_type::{Color, OccurrenceCounts, RoomRole, RoomType, RoomTypeRegistry};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Больше этого числа комнат заранее не резервируется
const PREALLOCATED_ROOMS_LIMIT: usize = 1 << 16;

/// Готовое подземелье. Ссылается на реестр, по которому было построено.
#[derive(Debug, Clone)]
pub struct Dungeon<'r> {
    registry: &'r RoomTypeRegistry,
    /// Целевое количество комнат, переданное генератору
    size: usize,
    /// Комнаты в порядке создания; вход всегда первый
    rooms: Vec<Room>,
    index: HashMap<GridPos, usize>,
    occurrences: OccurrenceCounts,
    exit: Option<usize>,
}

/// Строит подземелье целевого размера `size`
///
/// Вход и 2–4 начальные комнаты вокруг него размещаются всегда, поэтому
/// итоговое число комнат равно `1 + max(size, число начальных комнат)`.
/// Рост прерывается с [`GenerationError::Stalled`], если набралось больше
/// `max_rejections` неудачных попыток расширения.
///
/// Порядок потребления случайных чисел фиксирован: начальные направления →
/// перемешивания направлений на каждом шаге роста → порядок тупиков → взвешенные выборы.
pub fn generate_dungeon<'r, R: Rng + ?Sized>(
    registry: &'r RoomTypeRegistry,
    size: usize,
    max_rejections: usize,
    rng: &mut R,
) -> Result<Dungeon<'r>, GenerationError> {
    let basic = registry.role(RoomRole::Basic)?;
    let entrance = registry.role(RoomRole::Entrance)?;
    let exit = registry.role(RoomRole::Exit)?;

    // Размер приходит из конфигурации, поэтому память заранее резервируется с потолком
    let capacity = size.min(PREALLOCATED_ROOMS_LIMIT) + 5;
    let mut dungeon = Dungeon {
        registry,
        size,
        rooms: Vec::with_capacity(capacity),
        index: HashMap::with_capacity(capacity),
        occurrences: OccurrenceCounts::new(),
        exit: None,
    };

    let rejections = growth::grow(&mut dungeon, basic, max_rejections, rng)?;
    dungeon.rooms[0].room_type = entrance;
    assign::assign_special_rooms(&mut dungeon, basic, exit, rng)?;

    log::info!(
        "dungeon generated: {} rooms, {} rejected growth attempts, {} dead ends",
        dungeon.len(),
        rejections,
        dungeon.dead_ends().count()
    );
    Ok(dungeon)
}

impl<'r> Dungeon<'r> {
    pub(crate) fn insert(&mut self, room: Room) -> usize {
        let idx = self.rooms.len();
        self.index.insert(room.position, idx);
        self.rooms.push(room);
        idx
    }

    #[must_use]
    pub fn registry(&self) -> &'r RoomTypeRegistry {
        self.registry
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Все комнаты в порядке создания
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn room(&self, position: GridPos) -> Option<&Room> {
        self.index.get(&position).map(|&i| &self.rooms[i])
    }

    #[must_use]
    pub fn contains(&self, position: GridPos) -> bool {
        self.index.contains_key(&position)
    }

    #[must_use]
    pub fn entrance(&self) -> &Room {
        &self.rooms[0]
    }

    /// Комната-выход (лестница)
    #[must_use]
    pub fn exit(&self) -> Option<&Room> {
        self.exit.map(|i| &self.rooms[i])
    }

    #[must_use]
    pub fn room_type(&self, room: &Room) -> &'r RoomType {
        self.registry.get(room.room_type)
    }

    /// Комнаты вместе с их типами: координата, имя и цвет — всё, что нужно рендеру
    pub fn iter_typed(&self) -> impl Iterator<Item = (&Room, &'r RoomType)> + '_ {
        self.rooms.iter().map(|r| (r, self.registry.get(r.room_type)))
    }

    pub fn dead_ends(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_dead_end())
    }

    /// Сколько раз каждый особый тип был назначен тупикам
    #[must_use]
    pub fn occurrences(&self) -> &OccurrenceCounts {
        &self.occurrences
    }

    /// Число комнат каждого типа, включая вход, выход и пустые комнаты
    #[must_use]
    pub fn type_counts(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for (_, room_type) in self.iter_typed() {
            *counts.entry(room_type.name.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Ограничивающий прямоугольник: `(min, max)` включительно
    #[must_use]
    pub fn bounds(&self) -> (GridPos, GridPos) {
        let mut min = GridPos::ORIGIN;
        let mut max = GridPos::ORIGIN;
        for room in &self.rooms {
            min.x = min.x.min(room.position.x);
            min.y = min.y.min(room.position.y);
            max.x = max.x.max(room.position.x);
            max.y = max.y.max(room.position.y);
        }
        (min, max)
    }

    /// Число занятых клеток вокруг `position`, посчитанное заново по сетке
    #[must_use]
    pub fn occupied_neighbors(&self, position: GridPos) -> usize {
        position.neighbors().filter(|n| self.contains(*n)).count()
    }

    /// Снимок для экспорта в JSON
    #[must_use]
    pub fn layout(&self) -> DungeonLayout {
        let rooms = self
            .iter_typed()
            .map(|(room, room_type)| RoomRecord {
                x: room.position.x,
                y: room.position.y,
                room_type: room_type.name.clone(),
                color: room_type.color,
                distance: room.distance,
                neighbors: room.neighbor_count,
            })
            .collect();
        let counts = self
            .occurrences
            .iter()
            .map(|(id, n)| (self.registry.get(id).name.clone(), n))
            .collect();

        DungeonLayout {
            size: self.size,
            rooms,
            counts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub room_type: String,
    pub color: Color,
    pub distance: u32,
    pub neighbors: u8,
}

/// Сериализуемое представление подземелья
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub size: usize,
    pub rooms: Vec<RoomRecord>,
    /// Сколько раз назначен каждый особый тип
    pub counts: BTreeMap<String, u32>,
}

impl DungeonLayout {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_as_json(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
