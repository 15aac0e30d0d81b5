use crate::core::utils::random::seed_state;
use crate::domain::{EngineConfig, Palette};
use crate::storage::{ColorCountCache, ParticleStore};
use crate::systems::{SpawnScheduler, SpeedMonitor};

use super::perf_stats::PerfStats;
use super::RenderBuffers;
use super::EngineCore;

/// Assemble an engine from an already validated config and its palette.
pub(super) fn create_engine_core(config: EngineConfig, palette: Palette) -> EngineCore {
    let counts = ColorCountCache::new(palette.len());

    engine_log!(
        "swarm engine: {}x{} domain, {} classes, {} particles/sec, {} mode",
        config.width,
        config.height,
        palette.len(),
        config.default_spawn_rate,
        config.default_mode
    );

    EngineCore {
        palette,
        store: ParticleStore::new(),
        counts,
        scheduler: SpawnScheduler::new(config.default_spawn_rate),
        monitor: SpeedMonitor::new(),
        mode: config.default_mode,
        paused: false,
        width: config.width as f32,
        height: config.height as f32,
        last_tick_ms: None,
        frame: 0,
        rng_state: seed_state(config.seed),
        guard_streak: false,
        capacity_streak: false,
        render: RenderBuffers {
            class_buffer: Vec::new(),
            reported_bytes: 0,
        },
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        config,
    }
}
