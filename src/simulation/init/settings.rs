use super::perf_stats::PerfStats;
use super::EngineCore;

pub(super) fn enable_perf_metrics(engine: &mut EngineCore, enabled: bool) {
    engine.perf_enabled = enabled;
    if !enabled {
        engine.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(engine: &EngineCore) -> PerfStats {
    engine.perf_stats.clone()
}

pub(super) fn report_render_buffer_bytes(engine: &mut EngineCore, bytes: usize) {
    engine.render.reported_bytes = bytes;
}
