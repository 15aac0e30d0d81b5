use wasm_bindgen::prelude::*;

use crate::domain::{EngineError, SpawnMode};

use super::perf_stats::PerfStats;
use super::EngineCore;

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Pointers and lengths of everything the renderer reads, in one call
#[wasm_bindgen]
pub struct AbiLayout {
    positions_ptr: u32,
    positions_len_elements: u32,
    positions_len_bytes: u32,
    classes_ptr: u32,
    classes_len_elements: u32,
    classes_len_bytes: u32,
    class_buffer_ptr: u32,
    class_buffer_len_elements: u32,
    class_buffer_len_bytes: u32,
}

#[wasm_bindgen]
impl AbiLayout {
    #[wasm_bindgen(getter)]
    pub fn positions_ptr(&self) -> u32 { self.positions_ptr }
    #[wasm_bindgen(getter)]
    pub fn positions_len_elements(&self) -> u32 { self.positions_len_elements }
    #[wasm_bindgen(getter)]
    pub fn positions_len_bytes(&self) -> u32 { self.positions_len_bytes }

    #[wasm_bindgen(getter)]
    pub fn classes_ptr(&self) -> u32 { self.classes_ptr }
    #[wasm_bindgen(getter)]
    pub fn classes_len_elements(&self) -> u32 { self.classes_len_elements }
    #[wasm_bindgen(getter)]
    pub fn classes_len_bytes(&self) -> u32 { self.classes_len_bytes }

    #[wasm_bindgen(getter)]
    pub fn class_buffer_ptr(&self) -> u32 { self.class_buffer_ptr }
    #[wasm_bindgen(getter)]
    pub fn class_buffer_len_elements(&self) -> u32 { self.class_buffer_len_elements }
    #[wasm_bindgen(getter)]
    pub fn class_buffer_len_bytes(&self) -> u32 { self.class_buffer_len_bytes }
}

#[wasm_bindgen]
pub struct Engine {
    core: EngineCore,
}

#[wasm_bindgen]
impl Engine {
    /// Engine with the default palette on a `width` x `height` domain
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            core: EngineCore::new(width, height),
        }
    }

    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: String) -> Result<Engine, JsValue> {
        let core = EngineCore::from_config_json(&json).map_err(to_js)?;
        Ok(Self { core })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.core.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.core.height() }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.core.particle_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn capacity(&self) -> u32 { self.core.capacity() as u32 }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    #[wasm_bindgen(getter)]
    pub fn class_count(&self) -> u32 { self.core.class_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f32 { self.core.speed() }

    #[wasm_bindgen(getter)]
    pub fn spawn_rate(&self) -> u32 { self.core.spawn_rate() }

    /// 0 = fountain, 1 = wind, 2 = rain
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> u8 { self.core.mode().as_u8() }

    pub fn is_paused(&self) -> bool { self.core.is_paused() }

    pub fn palette_manifest_json(&self) -> String {
        self.core.palette_manifest_json()
    }

    /// Flat `[r, g, b, ...]` in 0..1
    pub fn palette_rgb(&self) -> Vec<f32> {
        self.core.palette_rgb()
    }

    // === CONTROL SURFACE ===

    /// Returns how many particles were removed to meet a lower target
    pub fn set_target(&mut self, class: u32, target: i32) -> u32 {
        self.core.set_target(class, target as i64) as u32
    }

    pub fn target(&self, class: u32) -> u32 {
        self.core.target(class)
    }

    pub fn cached_count(&self, class: u32) -> u32 {
        self.core.cached_count(class)
    }

    pub fn set_spawn_rate(&mut self, rate_per_second: u32) -> Result<(), JsValue> {
        self.core.set_spawn_rate(rate_per_second).map_err(to_js)
    }

    pub fn set_mode(&mut self, mode: u8) -> Result<(), JsValue> {
        let mode = SpawnMode::from_u8(mode)
            .ok_or_else(|| EngineError::UnknownMode(mode.to_string()))
            .map_err(to_js)?;
        self.core.set_mode(mode);
        Ok(())
    }

    /// "fountain" | "wind" | "rain"
    pub fn set_mode_str(&mut self, mode: String) -> Result<(), JsValue> {
        let mode = mode.parse::<SpawnMode>().map_err(to_js)?;
        self.core.set_mode(mode);
        Ok(())
    }

    pub fn pause(&mut self) {
        self.core.pause();
    }

    pub fn resume(&mut self) {
        self.core.resume();
    }

    pub fn restart(&mut self) {
        self.core.restart();
    }

    // === CLOCK ===

    /// Advance one frame; `now_ms` is the rAF / performance.now() timestamp
    pub fn tick(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.core.tick(now_ms).map_err(to_js)
    }

    // === RENDERER ===

    /// Pointer to `particle_count * 2` position floats
    pub fn positions_ptr(&self) -> *const f32 {
        self.core.positions().as_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.core.positions().len()
    }

    /// Pointer to `particle_count` raw u8 class indices
    pub fn classes_ptr(&self) -> *const u8 {
        self.core.classes().as_ptr()
    }

    /// Widen class indices to f32 and return the transfer buffer pointer
    pub fn extract_class_indices(&mut self) -> *const f32 {
        self.core.extract_class_indices().as_ptr()
    }

    pub fn report_render_buffer_bytes(&mut self, bytes: usize) {
        self.core.report_render_buffer_bytes(bytes);
    }

    pub fn memory_allocated_bytes(&self) -> usize {
        self.core.memory().allocated_bytes
    }

    pub fn memory_used_bytes(&self) -> usize {
        self.core.memory().used_bytes
    }

    pub fn abi_layout(&self) -> AbiLayout {
        let data = self.core.abi_layout_data();
        AbiLayout {
            positions_ptr: data.positions_ptr as u32,
            positions_len_elements: data.positions_len_elements as u32,
            positions_len_bytes: data.positions_len_bytes as u32,
            classes_ptr: data.classes_ptr as u32,
            classes_len_elements: data.classes_len_elements as u32,
            classes_len_bytes: data.classes_len_bytes as u32,
            class_buffer_ptr: data.class_buffer_ptr as u32,
            class_buffer_len_elements: data.class_buffer_len_elements as u32,
            class_buffer_len_bytes: data.class_buffer_len_bytes as u32,
        }
    }

    // === PERF ===

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Last tick's perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }
}
