//! Domain - palette, spawn modes, engine configuration and the error type

pub mod config;
pub mod errors;
pub mod mode;
pub mod palette;

pub use config::{EngineConfig, MIN_DOMAIN_EXTENT};
pub use errors::{EngineError, EngineResult};
pub use mode::SpawnMode;
pub use palette::{ClassId, Palette, PaletteEntry, MAX_CLASSES};
