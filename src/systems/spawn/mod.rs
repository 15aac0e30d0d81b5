//! Spawning - time-based budget, round-robin class fairness, per-mode emitters

pub mod emitters;
pub mod scheduler;

pub use emitters::{emit, Emission};
pub use scheduler::{SpawnReport, SpawnScheduler, ITERATION_GUARD_PER_CLASS};
