// src/grid.rs
//! Целочисленная сетка подземелья: координаты клеток и четыре стороны света.

use crate::error::GenerationError;
use serde::{Deserialize, Serialize};

/// Координата клетки сетки. Вход всегда находится в `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Соседняя клетка в заданном направлении
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Четыре соседние клетки (4-связность) в порядке индексов направлений
    pub fn neighbors(self) -> impl Iterator<Item = GridPos> {
        Direction::ALL.into_iter().map(move |d| self.step(d))
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Направление роста. Индексы фиксированы: 0 → (0, 1), 1 → (1, 0), 2 → (0, -1), 3 → (-1, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[must_use]
    pub fn vector(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Direction {
    type Error = GenerationError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Direction::North),
            1 => Ok(Direction::East),
            2 => Ok(Direction::South),
            3 => Ok(Direction::West),
            other => Err(GenerationError::InvalidDirection(other)),
        }
    }
}
