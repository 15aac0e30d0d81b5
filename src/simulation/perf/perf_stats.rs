use wasm_bindgen::prelude::*;

/// Per-tick timings and counters. Filled only while perf metrics are enabled.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) spawn_ms: f64,
    pub(super) integrate_ms: f64,
    pub(super) monitor_ms: f64,
    pub(super) spawn_budget: u32,
    pub(super) spawned: u32,
    pub(super) active_classes: u32,
    pub(super) guard_trips: u32,
    pub(super) capacity_drops: u32,
    pub(super) particle_count: u32,
    pub(super) capacity: u32,
    pub(super) allocated_bytes: u32,
    pub(super) used_bytes: u32,
    pub(super) speed: f32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn spawn_ms(&self) -> f64 { self.spawn_ms }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    #[wasm_bindgen(getter)]
    pub fn monitor_ms(&self) -> f64 { self.monitor_ms }
    #[wasm_bindgen(getter)]
    pub fn spawn_budget(&self) -> u32 { self.spawn_budget }
    #[wasm_bindgen(getter)]
    pub fn spawned(&self) -> u32 { self.spawned }
    #[wasm_bindgen(getter)]
    pub fn active_classes(&self) -> u32 { self.active_classes }
    #[wasm_bindgen(getter)]
    pub fn guard_trips(&self) -> u32 { self.guard_trips }
    #[wasm_bindgen(getter)]
    pub fn capacity_drops(&self) -> u32 { self.capacity_drops }
    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.particle_count }
    #[wasm_bindgen(getter)]
    pub fn capacity(&self) -> u32 { self.capacity }
    #[wasm_bindgen(getter)]
    pub fn allocated_bytes(&self) -> u32 { self.allocated_bytes }
    #[wasm_bindgen(getter)]
    pub fn used_bytes(&self) -> u32 { self.used_bytes }
    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f32 { self.speed }
}
