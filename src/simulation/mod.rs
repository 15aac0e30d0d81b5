//! Engine - one tick of the particle swarm
//!
//! EngineCore owns every piece of simulation state and only orchestrates:
//! - storage/  holds the rows and per-class counts
//! - systems/  spawn, integrate and measure speed
//! - here:     control-surface commands, the tick pipeline, renderer extraction
//!
//! Control surface calls (targets, rate, mode, pause) land between ticks;
//! a tick always runs scheduler -> integrator -> monitor to completion.

use crate::domain::{ClassId, EngineConfig, EngineResult, Palette, SpawnMode, MIN_DOMAIN_EXTENT};
use crate::storage::{memory, ColorCountCache, MemoryReport, ParticleStore};
use crate::systems::{SpawnScheduler, SpeedMonitor};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "render/render_extract.rs"]
mod render_extract;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use facade::{AbiLayout, Engine};
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

/// Transfer buffers handed to the renderer
pub(crate) struct RenderBuffers {
    /// Class indices widened to f32 for vertex attributes
    pub(crate) class_buffer: Vec<f32>,
    /// Bytes the renderer says it holds on its side
    pub(crate) reported_bytes: usize,
}

pub(crate) struct AbiLayoutData {
    pub(crate) positions_ptr: *const f32,
    pub(crate) positions_len_elements: usize,
    pub(crate) positions_len_bytes: usize,
    pub(crate) classes_ptr: *const u8,
    pub(crate) classes_len_elements: usize,
    pub(crate) classes_len_bytes: usize,
    pub(crate) class_buffer_ptr: *const f32,
    pub(crate) class_buffer_len_elements: usize,
    pub(crate) class_buffer_len_bytes: usize,
}

pub struct EngineCore {
    config: EngineConfig,
    palette: Palette,
    store: ParticleStore,
    counts: ColorCountCache,
    scheduler: SpawnScheduler,
    monitor: SpeedMonitor,

    // Control surface state
    mode: SpawnMode,
    paused: bool,

    // Domain
    width: f32,
    height: f32,

    // Clock
    last_tick_ms: Option<f64>,
    frame: u64,
    rng_state: u32,

    // Warn once per streak, not every frame
    guard_streak: bool,
    capacity_streak: bool,

    render: RenderBuffers,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl EngineCore {
    /// Engine with the default palette and rates on a `width` x `height` domain.
    /// Each side is raised to at least `MIN_DOMAIN_EXTENT`.
    pub fn new(width: u32, height: u32) -> Self {
        let config = EngineConfig::with_size(width.max(MIN_DOMAIN_EXTENT), height.max(MIN_DOMAIN_EXTENT));
        init::create_engine_core(config, Palette::default())
    }

    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let palette = config.build_palette()?;
        Ok(init::create_engine_core(config, palette))
    }

    pub fn from_config_json(json: &str) -> EngineResult<Self> {
        Self::from_config(EngineConfig::from_json(json)?)
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn palette(&self) -> &Palette { &self.palette }

    pub fn palette_manifest_json(&self) -> String { self.palette.manifest_json() }

    pub fn store(&self) -> &ParticleStore { &self.store }

    pub fn counts(&self) -> &ColorCountCache { &self.counts }

    pub fn scheduler(&self) -> &SpawnScheduler { &self.scheduler }

    pub fn width(&self) -> u32 { self.width as u32 }

    pub fn height(&self) -> u32 { self.height as u32 }

    pub fn particle_count(&self) -> usize { self.store.count() }

    pub fn capacity(&self) -> usize { self.store.capacity() }

    pub fn frame(&self) -> u64 { self.frame }

    pub fn class_count(&self) -> usize { self.palette.len() }

    pub fn mode(&self) -> SpawnMode { self.mode }

    pub fn spawn_rate(&self) -> u32 { self.scheduler.rate_per_second() }

    pub fn is_paused(&self) -> bool { self.paused }

    /// Latest simulation-speed reading, 1.0 means real time
    pub fn speed(&self) -> f32 { self.monitor.speed() }

    pub fn target(&self, class: u32) -> u32 {
        self.counts.target(self.palette.resolve(class))
    }

    pub fn cached_count(&self, class: u32) -> u32 {
        self.counts.cached(self.palette.resolve(class))
    }

    pub fn class_id(&self, class: u32) -> ClassId {
        self.palette.resolve(class)
    }

    // === CONTROL SURFACE ===

    /// Set a class's population target (clamped to [0, 500000]).
    /// Excess particles are removed right away, earliest first.
    /// Returns how many were removed.
    pub fn set_target(&mut self, class: u32, target: i64) -> usize {
        commands::set_target(self, class, target)
    }

    pub fn set_spawn_rate(&mut self, rate_per_second: u32) -> EngineResult<()> {
        commands::set_spawn_rate(self, rate_per_second)
    }

    pub fn set_mode(&mut self, mode: SpawnMode) {
        commands::set_mode(self, mode)
    }

    pub fn pause(&mut self) {
        commands::pause(self)
    }

    pub fn resume(&mut self) {
        commands::resume(self)
    }

    /// Drop every particle and target, reset scheduler and monitor.
    /// Palette, mode and spawn rate stay as they are.
    pub fn restart(&mut self) {
        commands::restart(self)
    }

    // === CLOCK ===

    /// Run one tick at wall-clock time `now_ms`.
    /// Only a storage allocation failure is reported as an error.
    pub fn tick(&mut self, now_ms: f64) -> EngineResult<()> {
        step::tick(self, now_ms)
    }

    // === RENDERER ===

    /// Live positions, `[x0, y0, x1, y1, ...]`
    pub fn positions(&self) -> &[f32] { self.store.positions() }

    /// Live class indices as stored
    pub fn classes(&self) -> &[u8] { self.store.classes() }

    /// Widen live class indices into the f32 transfer buffer and return it
    pub fn extract_class_indices(&mut self) -> &[f32] {
        render_extract::extract_class_indices(self)
    }

    pub fn palette_rgb(&self) -> Vec<f32> { self.palette.rgb_flat() }

    pub fn report_render_buffer_bytes(&mut self, bytes: usize) {
        settings::report_render_buffer_bytes(self, bytes)
    }

    pub fn memory(&self) -> MemoryReport {
        memory::account(self.store.capacity(), self.store.count(), self.render.reported_bytes)
    }

    // === PERF ===

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last tick's perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    pub(crate) fn abi_layout_data(&self) -> AbiLayoutData {
        render_extract::abi_layout_data(self)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
