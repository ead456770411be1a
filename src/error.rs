// src/error.rs
//! Ошибки генератора подземелий
//!
//! Три уровня ошибок:
//! - [`RegistryError`] — ошибки конфигурации реестра типов комнат (фатальны при старте)
//! - [`GenerationError`] — ошибки построения конкретного подземелья
//! - [`ConfigError`] — ошибки загрузки параметров из TOML

use crate::room_type::RoomRole;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("room type '{0}' is already registered")]
    DuplicateName(String),

    #[error("unknown room type '{0}'")]
    UnknownType(String),

    #[error("room type '{0}' is not special and cannot carry a weight function")]
    NotSpecial(String),

    #[error("special room type '{0}' has no weight function")]
    MissingWeightFunction(String),

    #[error("no room type designated as {0}")]
    MissingRole(RoomRole),

    #[error("no special room type has a positive weight at distance {distance}")]
    NoEligibleType { distance: u32 },

    #[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("invalid direction index {0}, expected 0..=3")]
    InvalidDirection(u8),

    #[error("growth stalled after {rejections} rejected attempts ({placed}/{target} rooms placed)")]
    Stalled {
        placed: usize,
        target: usize,
        rejections: usize,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
