use crate::core::utils::random::seed_state;
use crate::domain::{ClassId, EngineError, EngineResult, SpawnMode};

use super::EngineCore;

pub(super) fn set_target(engine: &mut EngineCore, class: u32, target: i64) -> usize {
    let class = match engine.palette.try_resolve(class) {
        Some(id) => id,
        None => {
            engine_warn!(
                "set_target: unknown class {} treated as '{}'",
                class,
                engine.palette.entry(ClassId::FIRST).name
            );
            ClassId::FIRST
        }
    };

    let target = engine.counts.set_target(class, target);
    let cached = engine.counts.cached(class);
    if target >= cached {
        return 0;
    }

    // Shrinking below the live count deletes the excess now, not on the next tick
    let excess = (cached - target) as usize;
    let removed = engine.store.remove_by_class(&mut engine.counts, class, excess);
    if engine.store.is_empty() {
        engine.monitor.reset();
    }
    removed
}

pub(super) fn set_spawn_rate(engine: &mut EngineCore, rate_per_second: u32) -> EngineResult<()> {
    if !engine.config.spawn_rates.contains(&rate_per_second) {
        return Err(EngineError::UnsupportedSpawnRate(rate_per_second));
    }
    engine.scheduler.set_rate_per_second(rate_per_second);
    Ok(())
}

pub(super) fn set_mode(engine: &mut EngineCore, mode: SpawnMode) {
    engine.mode = mode;
}

pub(super) fn pause(engine: &mut EngineCore) {
    engine.paused = true;
}

pub(super) fn resume(engine: &mut EngineCore) {
    if engine.paused {
        engine.paused = false;
        // time spent paused is not lag
        engine.monitor.rebaseline();
    }
}

pub(super) fn restart(engine: &mut EngineCore) {
    engine.store.clear();
    engine.counts.reset();
    engine.scheduler.reset();
    engine.monitor.reset();
    engine.last_tick_ms = None;
    engine.frame = 0;
    engine.rng_state = seed_state(engine.config.seed);
    engine.guard_streak = false;
    engine.capacity_streak = false;
    engine.perf_stats.reset();
}
