use crate::domain::EngineResult;
use crate::storage::memory;
use crate::systems::integrator::integrate;
use crate::systems::spawn::emit;
use crate::systems::SpawnReport;

use super::{EngineCore, PerfTimer};

pub(super) fn tick(engine: &mut EngineCore, now_ms: f64) -> EngineResult<()> {
    // First tick, or a clock that stepped backwards, gives no credit
    let dt = match engine.last_tick_ms {
        Some(last) if now_ms.is_finite() => ((now_ms - last) / 1000.0).max(0.0),
        _ => 0.0,
    };
    if now_ms.is_finite() {
        engine.last_tick_ms = Some(now_ms);
    }

    // Paused: the renderer keeps drawing the last state, nothing advances
    if engine.paused {
        return Ok(());
    }

    let perf_on = engine.perf_enabled;
    if perf_on {
        engine.perf_stats.reset();
    }
    let step_start = PerfTimer::start_if(perf_on);

    // === SPAWN ===
    let t0 = PerfTimer::start_if(perf_on);
    let report = spawn(engine, dt)?;
    if let Some(t0) = t0 {
        engine.perf_stats.spawn_ms = t0.elapsed_ms();
    }
    note_spawn_anomalies(engine, &report);

    // === INTEGRATE ===
    let t0 = PerfTimer::start_if(perf_on);
    integrate(&mut engine.store, engine.width, engine.height);
    if let Some(t0) = t0 {
        engine.perf_stats.integrate_ms = t0.elapsed_ms();
    }

    // === SPEED MONITOR ===
    let t0 = PerfTimer::start_if(perf_on);
    if engine.store.is_empty() {
        engine.monitor.reset();
    } else {
        engine.monitor.sample(now_ms, &engine.store, engine.width, engine.height);
    }
    if let Some(t0) = t0 {
        engine.perf_stats.monitor_ms = t0.elapsed_ms();
    }

    if perf_on {
        let mem = memory::account(
            engine.store.capacity(),
            engine.store.count(),
            engine.render.reported_bytes,
        );
        let stats = &mut engine.perf_stats;
        stats.spawn_budget = clamp_u32(report.budget);
        stats.spawned = clamp_u32(report.spawned);
        stats.active_classes = clamp_u32(report.active_classes);
        stats.guard_trips = report.guard_tripped as u32;
        stats.capacity_drops = report.capacity_hit as u32;
        stats.particle_count = clamp_u32(engine.store.count());
        stats.capacity = clamp_u32(engine.store.capacity());
        stats.allocated_bytes = clamp_u32(mem.allocated_bytes);
        stats.used_bytes = clamp_u32(mem.used_bytes);
        stats.speed = engine.monitor.speed();
        if let Some(start) = step_start {
            stats.step_ms = start.elapsed_ms();
        }
    }

    engine.frame += 1;
    Ok(())
}

fn spawn(engine: &mut EngineCore, dt: f64) -> EngineResult<SpawnReport> {
    let (mode, width, height) = (engine.mode, engine.width, engine.height);
    let rng = &mut engine.rng_state;
    engine.scheduler.tick(
        dt,
        &engine.palette,
        &mut engine.store,
        &mut engine.counts,
        || emit(mode, width, height, rng),
    )
}

/// Warn when the round-robin guard or the particle ceiling starts cutting
/// ticks short; stay quiet while the condition persists.
fn note_spawn_anomalies(engine: &mut EngineCore, report: &SpawnReport) {
    if report.guard_tripped && !engine.guard_streak {
        engine_warn!(
            "spawn: round-robin guard hit after {} of {} spawns ({} active classes)",
            report.spawned,
            report.budget,
            report.active_classes
        );
    }
    engine.guard_streak = report.guard_tripped;

    if report.capacity_hit && !engine.capacity_streak {
        engine_warn!(
            "spawn: particle ceiling reached at {} particles, dropping further spawns",
            engine.store.count()
        );
    }
    engine.capacity_streak = report.capacity_hit;
}

#[inline]
fn clamp_u32<T: TryInto<u32>>(value: T) -> u32 {
    value.try_into().unwrap_or(u32::MAX)
}
