//! Swarm Engine - rate-controlled particle swarm simulation in WASM
//!
//! Architecture:
//! - core/        - macros and small utilities (logging, unchecked access, rng)
//! - domain/      - palette, spawn modes, config, errors
//! - storage/     - SoA particle store, per-class counts, memory accounting
//! - systems/     - spawn scheduler + emitters, integrator, speed monitor
//! - simulation/  - EngineCore orchestration and the wasm `Engine` facade

// Macros must be declared before the modules that use them
#[macro_use]
pub mod core;
pub mod domain;
pub mod storage;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Thread pool for the parallel integrator; JS awaits this once at start-up
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    engine_log!("Swarm engine {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::{ClassId, EngineConfig, EngineError, EngineResult, Palette, PaletteEntry, SpawnMode};
pub use simulation::{AbiLayout, Engine, EngineCore, PerfStats};
pub use storage::{MemoryReport, MAX_PARTICLES, MAX_TARGET};
