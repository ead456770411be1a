// src/room_type.rs
//! Реестр типов комнат
//!
//! Реестр создаётся один раз при старте и после этого не меняется:
//! - Каждый тип имеет уникальное имя и цвет отображения
//! - Особые (`special`) типы участвуют во взвешенном распределении тупиков
//! - Роли `basic`, `entrance` и `exit` назначаются отдельно через [`RoomTypeRegistry::designate`]
//!
//! Весовые функции — чистые замыкания без внутреннего состояния, поэтому выбор
//! воспроизводим при одинаковом сиде генератора.

use crate::error::RegistryError;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Роль, которую тип комнаты играет при генерации
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomRole {
    /// Пустая комната по умолчанию
    Basic,
    /// Вход, всегда в клетке (0, 0)
    Entrance,
    /// Выход (лестница) — самый дальний тупик
    Exit,
}

impl std::fmt::Display for RoomRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoomRole::Basic => "basic",
            RoomRole::Entrance => "entrance",
            RoomRole::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// Цвет RGBA. В конфигурации записывается как `"#rrggbb"` или `"#rrggbbaa"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
}

impl FromStr for Color {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RegistryError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut channels = [255u8; 4];
        for (i, channel) in channels.iter_mut().enumerate().take(hex.len() / 2) {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(channels))
    }
}

impl TryFrom<String> for Color {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

/// Индекс типа в реестре. Действителен только для реестра, который его выдал.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomTypeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct RoomType {
    pub id: RoomTypeId,
    pub name: String,
    pub color: Color,
    /// Участвует ли тип во взвешенном распределении тупиков
    pub special: bool,
}

/// Сколько раз каждый тип уже был назначен в текущем подземелье
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceCounts(BTreeMap<RoomTypeId, u32>);

impl OccurrenceCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: RoomTypeId) -> u32 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, id: RoomTypeId) {
        *self.0.entry(id).or_insert(0) += 1;
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomTypeId, u32)> + '_ {
        self.0.iter().map(|(&id, &n)| (id, n))
    }
}

/// Весовая функция особого типа: `(тип, расстояние от входа, счётчики, целевой размер) → вес`.
///
/// Вес `<= 0` (а также `NaN` и бесконечность) делает тип недоступным для данного выбора.
pub type WeightFn = Box<dyn Fn(&RoomType, u32, &OccurrenceCounts, usize) -> f64 + Send + Sync>;

#[derive(Default)]
pub struct RoomTypeRegistry {
    types: Vec<RoomType>,
    by_name: HashMap<String, RoomTypeId>,
    weights: HashMap<RoomTypeId, WeightFn>,
    basic: Option<RoomTypeId>,
    entrance: Option<RoomTypeId>,
    exit: Option<RoomTypeId>,
}

impl fmt::Debug for RoomTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomTypeRegistry")
            .field("types", &self.types)
            .field("weighted", &self.weights.len())
            .field("basic", &self.basic)
            .field("entrance", &self.entrance)
            .field("exit", &self.exit)
            .finish()
    }
}

impl RoomTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует новый тип. Повторное имя — ошибка, существующий тип не перезаписывается.
    pub fn register(
        &mut self,
        name: &str,
        color: Color,
        special: bool,
    ) -> Result<RoomTypeId, RegistryError> {
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        let id = RoomTypeId(self.types.len());
        self.types.push(RoomType {
            id,
            name: name.to_string(),
            color,
            special,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Привязывает весовую функцию к особому типу (заменяет прежнюю, если была).
    pub fn set_weight_fn<F>(&mut self, name: &str, weight: F) -> Result<(), RegistryError>
    where
        F: Fn(&RoomType, u32, &OccurrenceCounts, usize) -> f64 + Send + Sync + 'static,
    {
        let room_type = self.lookup(name)?;
        if !room_type.special {
            return Err(RegistryError::NotSpecial(name.to_string()));
        }
        let id = room_type.id;
        self.weights.insert(id, Box::new(weight));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&RoomType, RegistryError> {
        self.by_name
            .get(name)
            .map(|&id| &self.types[id.0])
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))
    }

    /// Тип по индексу.
    ///
    /// # Panics
    /// Если `id` выдан другим реестром и выходит за его пределы.
    #[must_use]
    pub fn get(&self, id: RoomTypeId) -> &RoomType {
        &self.types[id.0]
    }

    /// Назначает роль зарегистрированному типу
    pub fn designate(&mut self, role: RoomRole, name: &str) -> Result<(), RegistryError> {
        let id = self.lookup(name)?.id;
        match role {
            RoomRole::Basic => self.basic = Some(id),
            RoomRole::Entrance => self.entrance = Some(id),
            RoomRole::Exit => self.exit = Some(id),
        }
        Ok(())
    }

    pub fn role(&self, role: RoomRole) -> Result<RoomTypeId, RegistryError> {
        let id = match role {
            RoomRole::Basic => self.basic,
            RoomRole::Entrance => self.entrance,
            RoomRole::Exit => self.exit,
        };
        id.ok_or(RegistryError::MissingRole(role))
    }

    /// Все типы в порядке регистрации
    pub fn iter(&self) -> impl Iterator<Item = &RoomType> {
        self.types.iter()
    }

    pub fn specials(&self) -> impl Iterator<Item = &RoomType> {
        self.types.iter().filter(|t| t.special)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Взвешенный случайный выбор особого типа
    ///
    /// Веса всех особых типов вычисляются заново при каждом вызове (в порядке регистрации)
    /// и не обязаны давать в сумме 1. Если ни один вес не положителен, возвращается
    /// [`RegistryError::NoEligibleType`] вместо произвольного типа.
    pub fn pick_weighted<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        distance: u32,
        counts: &OccurrenceCounts,
        size: usize,
    ) -> Result<RoomTypeId, RegistryError> {
        let mut candidates = Vec::new();
        let mut weights = Vec::new();

        for room_type in self.specials() {
            let weight_fn = self
                .weights
                .get(&room_type.id)
                .ok_or_else(|| RegistryError::MissingWeightFunction(room_type.name.clone()))?;
            let weight = weight_fn(room_type, distance, counts, size);
            if weight.is_finite() && weight > 0.0 {
                candidates.push(room_type.id);
                weights.push(weight);
            }
        }

        if candidates.is_empty() {
            return Err(RegistryError::NoEligibleType { distance });
        }

        let index =
            WeightedIndex::new(&weights).map_err(|_| RegistryError::NoEligibleType { distance })?;
        Ok(candidates[index.sample(rng)])
    }
}
