// src/weight.rs
//! Готовые весовые правила для особых комнат
//!
//! Правило описывается в конфигурации и превращается в чистое замыкание,
//! которое зависит только от своих параметров и аргументов вызова.
//!
//! ```toml
//! [[room_types]]
//! name = "Treasury"
//! color = "#0000ff"
//! special = true
//! weight = { kind = "diminishing", weight = 1.0, decay = 0.5 }
//! ```

use crate::room_type::{OccurrenceCounts, RoomType, WeightFn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightRule {
    /// Постоянный вес
    Constant { weight: f64 },
    /// `weight / (1 + decay * n)`, где `n` — сколько раз тип уже назначен
    Diminishing { weight: f64, decay: f64 },
    /// Вес только для тупиков не ближе `min_distance` ко входу
    Distance { weight: f64, min_distance: u32 },
    /// Не более `max_count` комнат этого типа
    Limited { weight: f64, max_count: u32 },
    /// Не более одной комнаты этого типа на каждые `per_rooms` комнат подземелья
    Proportional { weight: f64, per_rooms: usize },
}

impl WeightRule {
    /// Вычисляет вес для конкретного выбора
    #[must_use]
    pub fn evaluate(&self, distance: u32, occurrences: u32, size: usize) -> f64 {
        match *self {
            WeightRule::Constant { weight } => weight,
            WeightRule::Diminishing { weight, decay } => {
                weight / (1.0 + decay * f64::from(occurrences))
            }
            WeightRule::Distance {
                weight,
                min_distance,
            } => {
                if distance >= min_distance {
                    weight
                } else {
                    0.0
                }
            }
            WeightRule::Limited { weight, max_count } => {
                if occurrences < max_count {
                    weight
                } else {
                    0.0
                }
            }
            WeightRule::Proportional { weight, per_rooms } => {
                let quota = size / per_rooms.max(1);
                if (occurrences as usize) < quota {
                    weight
                } else {
                    0.0
                }
            }
        }
    }

    /// Превращает правило в весовую функцию для реестра
    #[must_use]
    pub fn into_weight_fn(self) -> WeightFn {
        Box::new(
            move |room_type: &RoomType, distance: u32, counts: &OccurrenceCounts, size: usize| {
                self.evaluate(distance, counts.get(room_type.id), size)
            },
        )
    }
}
