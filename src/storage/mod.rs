//! Storage - packed particle rows, per-class counts, memory accounting

pub mod color_counts;
pub mod memory;
pub mod particle_store;

pub use color_counts::{ColorCount, ColorCountCache, MAX_TARGET};
pub use memory::{MemoryReport, BYTES_PER_SLOT};
pub use particle_store::{
    decode_velocity, encode_velocity, ParticleRow, ParticleStore, MAX_PARTICLES, VELOCITY_SCALE,
};
