// src/room.rs
use crate::grid::GridPos;
use crate::room_type::RoomTypeId;

/// Комната — одна клетка подземелья
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub position: GridPos,
    pub room_type: RoomTypeId,
    /// Число занятых соседних клеток. Только растёт по мере генерации.
    pub neighbor_count: u8,
    /// Расстояние от входа, зафиксированное в момент создания комнаты
    pub distance: u32,
}

impl Room {
    #[must_use]
    pub fn new(position: GridPos, room_type: RoomTypeId, distance: u32) -> Self {
        Self {
            position,
            room_type,
            neighbor_count: 0,
            distance,
        }
    }

    /// Тупик — ровно один сосед
    #[must_use]
    pub fn is_dead_end(&self) -> bool {
        self.neighbor_count == 1
    }
}
