pub mod config;
pub mod dungeon;
pub mod error;
pub mod grid;
pub mod room;
pub mod room_type;
pub mod survey;
pub mod weight;

pub use config::{DungeonParams, RenderSettings, RoomTypeConfig};
pub use dungeon::{Dungeon, DungeonLayout, generate_dungeon};
pub use error::{ConfigError, GenerationError, RegistryError};
pub use grid::{Direction, GridPos};
pub use room::Room;
pub use room_type::{
    Color, OccurrenceCounts, RoomRole, RoomType, RoomTypeId, RoomTypeRegistry,
};
pub use weight::WeightRule;
