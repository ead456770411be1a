// src/config.rs
//! Конфигурация генерации подземелья
//!
//! Этот модуль определяет все параметры, управляющие генерацией:
//! - Сид генератора и целевой размер подземелья
//! - Ограничение на число неудачных попыток роста
//! - Набор типов комнат, их цвета и весовые правила
//! - Назначение ролей (пустая комната, вход, выход)
//! - Параметры отрисовки
//!
//! Все структуры поддерживают сериализацию в TOML для удобной настройки через конфигурационные файлы.

use crate::dungeon::{Dungeon, generate_dungeon};
use crate::error::{ConfigError, GenerationError, RegistryError};
use crate::room_type::{Color, RoomRole, RoomTypeRegistry};
use crate::weight::WeightRule;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;

/// Описание одного типа комнаты
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeConfig {
    /// Уникальное имя типа
    pub name: String,

    /// Цвет отображения (`"#rrggbb"` или `"#rrggbbaa"`)
    pub color: Color,

    /// Участвует ли тип во взвешенном распределении тупиков
    #[serde(default)]
    pub special: bool,

    /// Весовое правило; обязательно для особых типов
    #[serde(default)]
    pub weight: Option<WeightRule>,
}

impl RoomTypeConfig {
    fn plain(name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            color,
            special: false,
            weight: None,
        }
    }

    fn special(name: &str, color: Color, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            color,
            special: true,
            weight: Some(WeightRule::Constant { weight }),
        }
    }
}

/// Параметры отрисовки в PNG
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderSettings {
    /// Размер клетки сетки в пикселях
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,

    /// Размер квадрата комнаты внутри клетки
    #[serde(default = "default_room_size")]
    pub room_size: u32,
}

fn default_cell_size() -> u32 {
    30
}
fn default_room_size() -> u32 {
    20
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cell_size: 30,
            room_size: 20,
        }
    }
}

/// Основные параметры генерации подземелья
///
/// Полная конфигурация для генерации одного подземелья. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// Целевое число комнат (начальные комнаты вокруг входа входят в это число)
    #[serde(default = "default_size")]
    pub size: usize,

    /// Сколько неудачных попыток роста допускается до ошибки
    #[serde(default = "default_max_rejections")]
    pub max_rejections: usize,

    /// Имя типа пустой комнаты
    #[serde(default = "default_basic")]
    pub basic: String,

    /// Имя типа входа
    #[serde(default = "default_entrance")]
    pub entrance: String,

    /// Имя типа выхода
    #[serde(default = "default_exit")]
    pub exit: String,

    /// Типы комнат в порядке регистрации
    #[serde(default = "default_room_types")]
    pub room_types: Vec<RoomTypeConfig>,

    /// Параметры отрисовки
    #[serde(default)]
    pub render: RenderSettings,
}

impl DungeonParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # dungeon.toml
    /// seed = 42
    /// size = 120
    ///
    /// [[room_types]]
    /// name = "Basic"
    /// color = "#ffffff"
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Строит реестр типов комнат
    ///
    /// Регистрирует все типы (повторное имя — [`RegistryError::DuplicateName`]),
    /// привязывает весовые функции особым типам и назначает роли.
    /// Особый тип без весового правила — [`RegistryError::MissingWeightFunction`].
    pub fn build_registry(&self) -> Result<RoomTypeRegistry, RegistryError> {
        let mut registry = RoomTypeRegistry::new();

        for config in &self.room_types {
            registry.register(&config.name, config.color, config.special)?;
            match config.weight {
                Some(rule) => registry.set_weight_fn(&config.name, rule.into_weight_fn())?,
                None if config.special => {
                    return Err(RegistryError::MissingWeightFunction(config.name.clone()));
                }
                None => {}
            }
        }

        registry.designate(RoomRole::Basic, &self.basic)?;
        registry.designate(RoomRole::Entrance, &self.entrance)?;
        registry.designate(RoomRole::Exit, &self.exit)?;

        log::debug!(
            "registry built: {} room types, {} special",
            registry.len(),
            registry.specials().count()
        );
        Ok(registry)
    }

    /// Генерирует подземелье с сидом и размером из параметров
    pub fn generate<'r>(
        &self,
        registry: &'r RoomTypeRegistry,
    ) -> Result<Dungeon<'r>, GenerationError> {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(self.seed);
        generate_dungeon(registry, self.size, self.max_rejections, &mut rng)
    }
}

fn default_size() -> usize {
    300
}
fn default_max_rejections() -> usize {
    100_000
}
fn default_basic() -> String {
    "Basic".to_string()
}
fn default_entrance() -> String {
    "Entrance".to_string()
}
fn default_exit() -> String {
    "Stairs".to_string()
}

fn default_room_types() -> Vec<RoomTypeConfig> {
    vec![
        RoomTypeConfig::plain("Entrance", Color::rgb(255, 255, 0)),
        RoomTypeConfig::plain("Stairs", Color::rgb(255, 0, 0)),
        RoomTypeConfig::plain("Basic", Color::rgb(255, 255, 255)),
        RoomTypeConfig::special("Greenhouse", Color::rgb(0, 255, 0), 1.0),
        RoomTypeConfig::special("Treasury", Color::rgb(0, 0, 255), 0.5),
        RoomTypeConfig::special("Library", Color::rgb(0, 255, 255), 1.0),
        RoomTypeConfig::special("Temple", Color::rgb(255, 0, 255), 1.0),
    ]
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            seed: 0,
            size: 300,
            max_rejections: 100_000,
            basic: default_basic(),
            entrance: default_entrance(),
            exit: default_exit(),
            room_types: default_room_types(),
            render: RenderSettings::default(),
        }
    }
}
