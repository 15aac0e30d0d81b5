//! Rate-controlled spawning with round-robin fairness
//!
//! Wall-clock time becomes spawn credit; whole particles of credit are
//! handed out one at a time to the classes still below target. The
//! rotation cursor survives across ticks so that, even when a tick's budget
//! is smaller than the number of hungry classes, every class keeps getting
//! its turn.

use crate::domain::{ClassId, EngineError, EngineResult, Palette};
use crate::storage::{ColorCountCache, ParticleStore};

use super::emitters::Emission;

/// Round-robin iterations allowed per active class per tick, on top of the
/// iterations the classes' deficits account for.
pub const ITERATION_GUARD_PER_CLASS: usize = 1000;

/// A class still short of its target, with how many it needs this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ActiveClass {
    pub(crate) class: ClassId,
    pub(crate) needed: i64,
}

/// What one scheduler tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Whole particles of credit released this tick
    pub budget: u64,
    pub spawned: u64,
    /// Classes below target when the tick started
    pub active_classes: usize,
    /// Iteration bound hit; spawning stopped early
    pub guard_tripped: bool,
    /// Store ceiling hit; the rest of the budget was dropped
    pub capacity_hit: bool,
}

pub struct SpawnScheduler {
    rate_per_second: u32,
    time_accumulator_seconds: f64,
    round_robin_cursor: usize,
    // Rebuilt every tick; kept to avoid reallocating
    active: Vec<ActiveClass>,
}

impl SpawnScheduler {
    pub fn new(rate_per_second: u32) -> Self {
        Self {
            rate_per_second,
            time_accumulator_seconds: 0.0,
            round_robin_cursor: 0,
            active: Vec::new(),
        }
    }

    pub fn rate_per_second(&self) -> u32 {
        self.rate_per_second
    }

    /// Caller validates against the allowed set.
    pub fn set_rate_per_second(&mut self, rate: u32) {
        self.rate_per_second = rate;
    }

    pub fn time_accumulator_seconds(&self) -> f64 {
        self.time_accumulator_seconds
    }

    pub fn round_robin_cursor(&self) -> usize {
        self.round_robin_cursor
    }

    /// Drop carried credit and rotation position.
    pub fn reset(&mut self) {
        self.time_accumulator_seconds = 0.0;
        self.round_robin_cursor = 0;
        self.active.clear();
    }

    /// Add `dt` seconds of credit and release the whole particles it buys.
    ///
    /// The fractional remainder stays in the accumulator, so the long-run
    /// rate matches `rate_per_second` no matter how ticks are sliced.
    pub fn accumulate(&mut self, dt: f64) -> u64 {
        if dt.is_finite() && dt > 0.0 {
            self.time_accumulator_seconds += dt;
        }
        if self.rate_per_second == 0 {
            return 0;
        }

        let rate = self.rate_per_second as f64;
        let budget = (self.time_accumulator_seconds * rate).floor();
        if budget < 1.0 {
            return 0;
        }
        self.time_accumulator_seconds = (self.time_accumulator_seconds - budget / rate).max(0.0);
        budget as u64
    }

    /// One scheduler tick: accumulate `dt`, then spawn up to the released
    /// budget across classes below target.
    ///
    /// `emit` supplies the position/velocity of each new particle.
    /// Hitting the store ceiling ends the tick quietly (reported in the
    /// result); an allocation failure is returned as an error.
    pub fn tick(
        &mut self,
        dt: f64,
        palette: &Palette,
        store: &mut ParticleStore,
        counts: &mut ColorCountCache,
        mut emit: impl FnMut() -> Emission,
    ) -> EngineResult<SpawnReport> {
        let budget = self.accumulate(dt);

        self.rebuild_active(palette, counts);
        let mut report = SpawnReport {
            budget,
            active_classes: self.active.len(),
            ..SpawnReport::default()
        };

        if self.active.is_empty() {
            self.round_robin_cursor = 0;
            return Ok(report);
        }
        if budget == 0 {
            return Ok(report);
        }

        self.distribute(budget, &mut report, |class| {
            let (position, velocity) = emit();
            store.append(counts, position, velocity, class).map(|_| ())
        })?;
        Ok(report)
    }

    /// Every class with a positive deficit, in palette order.
    fn rebuild_active(&mut self, palette: &Palette, counts: &ColorCountCache) {
        self.active.clear();
        for class in palette.ids() {
            let needed = counts.deficit(class);
            if needed > 0 {
                self.active.push(ActiveClass { class, needed });
            }
        }
    }

    /// Hand out `budget` spawns one at a time, rotating through `active`.
    pub(crate) fn distribute(
        &mut self,
        budget: u64,
        report: &mut SpawnReport,
        mut spawn: impl FnMut(ClassId) -> EngineResult<()>,
    ) -> EngineResult<()> {
        // A healthy rotation ends after at most sum(needed) spawns; only
        // entries whose `needed` can never reach zero run into the slack.
        let owed: u64 = self.active.iter().map(|a| a.needed.max(0) as u64).sum();
        let slack = (self.active.len() as u64).saturating_mul(ITERATION_GUARD_PER_CLASS as u64);
        let limit = owed.saturating_add(slack);
        let mut iterations = 0u64;
        let mut remaining = budget;

        while remaining > 0 && !self.active.is_empty() {
            if iterations >= limit {
                report.guard_tripped = true;
                break;
            }
            iterations += 1;

            let slot = self.round_robin_cursor % self.active.len();
            match spawn(self.active[slot].class) {
                Ok(()) => {}
                Err(EngineError::CapacityExceeded { .. }) => {
                    report.capacity_hit = true;
                    self.round_robin_cursor = slot;
                    break;
                }
                Err(err) => return Err(err),
            }
            report.spawned += 1;
            remaining -= 1;

            self.active[slot].needed -= 1;
            if self.active[slot].needed == 0 {
                self.remove_active(slot);
                // whatever slid into `slot` goes next
                self.round_robin_cursor = if self.active.is_empty() {
                    0
                } else {
                    slot % self.active.len()
                };
            } else {
                self.round_robin_cursor = (slot + 1) % self.active.len();
            }
        }
        Ok(())
    }

    /// Remove one entry, shifting the tail down to keep palette order.
    fn remove_active(&mut self, slot: usize) {
        let len = self.active.len();
        self.active.copy_within(slot + 1..len, slot);
        self.active.truncate(len - 1);
    }

    #[cfg(test)]
    pub(crate) fn set_active_for_test(&mut self, active: Vec<ActiveClass>) {
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::random::seed_state;
    use crate::domain::SpawnMode;
    use crate::systems::spawn::emitters::emit;

    struct Rig {
        palette: Palette,
        store: ParticleStore,
        counts: ColorCountCache,
        scheduler: SpawnScheduler,
        rng: u32,
    }

    impl Rig {
        fn new(rate: u32) -> Self {
            let palette = Palette::default();
            let counts = ColorCountCache::new(palette.len());
            Self {
                palette,
                store: ParticleStore::new(),
                counts,
                scheduler: SpawnScheduler::new(rate),
                rng: seed_state(1),
            }
        }

        fn class(&self, name: &str) -> ClassId {
            self.palette.id_by_name(name).unwrap()
        }

        fn tick(&mut self, dt: f64) -> SpawnReport {
            let rng = &mut self.rng;
            self.scheduler
                .tick(dt, &self.palette, &mut self.store, &mut self.counts, || {
                    emit(SpawnMode::Rain, 100.0, 100.0, rng)
                })
                .unwrap()
        }
    }

    #[test]
    fn fractional_credit_carries_over() {
        let mut scheduler = SpawnScheduler::new(1000);
        assert_eq!(scheduler.accumulate(0.0005), 0);
        assert_eq!(scheduler.accumulate(0.0005), 1);
        assert!(scheduler.time_accumulator_seconds() < 1e-9);
        assert_eq!(scheduler.accumulate(0.0025), 2);
        assert!((scheduler.time_accumulator_seconds() - 0.0005).abs() < 1e-9);
    }

    #[test]
    fn bad_dt_adds_no_credit() {
        let mut scheduler = SpawnScheduler::new(1000);
        assert_eq!(scheduler.accumulate(-5.0), 0);
        assert_eq!(scheduler.accumulate(f64::NAN), 0);
        assert_eq!(scheduler.accumulate(f64::INFINITY), 0);
        assert_eq!(scheduler.time_accumulator_seconds(), 0.0);
    }

    #[test]
    fn spawn_total_independent_of_tick_slicing() {
        let mut single = Rig::new(1000);
        let mut sliced = Rig::new(1000);
        for rig in [&mut single, &mut sliced] {
            for class in rig.palette.ids().collect::<Vec<_>>() {
                rig.counts.set_target(class, 100_000);
            }
        }

        single.tick(1.6);
        for _ in 0..100 {
            sliced.tick(0.016);
        }

        let a = single.store.count() as i64;
        let b = sliced.store.count() as i64;
        assert_eq!(a, 1600);
        assert!((a - b).abs() <= 1, "single={a} sliced={b}");
        assert_eq!(sliced.counts.total_cached(), sliced.store.count() as u64);
    }

    #[test]
    fn one_spawn_per_tick_alternates_between_two_classes() {
        let mut rig = Rig::new(1000);
        let red = rig.class("Red");
        let blue = rig.class("Blue");
        rig.counts.set_target(red, 60);
        rig.counts.set_target(blue, 60);

        for _ in 0..100 {
            let report = rig.tick(0.001);
            assert_eq!(report.spawned, 1);
        }
        assert_eq!(rig.counts.cached(red), 50);
        assert_eq!(rig.counts.cached(blue), 50);
    }

    #[test]
    fn low_budget_does_not_starve_later_classes() {
        let mut rig = Rig::new(1000);
        let ids: Vec<ClassId> = rig.palette.ids().collect();
        for &class in &ids {
            rig.counts.set_target(class, 1_000);
        }
        // budget of 1 per tick, six hungry classes
        for _ in 0..6 {
            rig.tick(0.001);
        }
        for &class in &ids {
            assert_eq!(rig.counts.cached(class), 1);
        }
    }

    #[test]
    fn finished_class_leaves_rotation_and_next_slides_in() {
        let mut rig = Rig::new(1000);
        let red = rig.class("Red");
        let green = rig.class("Green");
        let blue = rig.class("Blue");
        rig.counts.set_target(red, 1);
        rig.counts.set_target(green, 5);
        rig.counts.set_target(blue, 5);

        let report = rig.tick(0.005);
        assert_eq!(report.spawned, 5);
        assert_eq!(report.active_classes, 3);
        // red, green, blue, green, blue
        assert_eq!(rig.store.classes(), &[red.raw(), green.raw(), blue.raw(), green.raw(), blue.raw()]);
    }

    #[test]
    fn budget_beyond_deficits_stops_when_everyone_is_full() {
        let mut rig = Rig::new(100_000);
        let blue = rig.class("Blue");
        rig.counts.set_target(blue, 7);
        let report = rig.tick(0.01);
        assert_eq!(report.budget, 1000);
        assert_eq!(report.spawned, 7);
        assert_eq!(rig.counts.deficit(blue), 0);
        assert_eq!(rig.scheduler.round_robin_cursor(), 0);
    }

    #[test]
    fn idle_tick_resets_cursor_but_still_consumes_credit() {
        let mut rig = Rig::new(1000);
        let (red, blue) = (rig.class("Red"), rig.class("Blue"));
        rig.counts.set_target(red, 10);
        rig.counts.set_target(blue, 10);
        rig.tick(0.001);
        assert_eq!(rig.scheduler.round_robin_cursor(), 1);

        rig.counts.reset();
        let report = rig.tick(0.0105);
        assert_eq!(report.budget, 10);
        assert_eq!(report.spawned, 0);
        assert_eq!(rig.scheduler.round_robin_cursor(), 0);
        assert!(rig.scheduler.time_accumulator_seconds() < 0.001);
    }

    #[test]
    fn single_hungry_class_gets_the_whole_budget() {
        let mut rig = Rig::new(100_000);
        let blue = rig.class("Blue");
        rig.counts.set_target(blue, 500_000);

        // one 16ms frame at 100k/s
        let report = rig.tick(0.016);
        assert_eq!(report.budget, 1600);
        assert_eq!(report.spawned, 1600);
        assert!(!report.guard_tripped);
        assert_eq!(rig.counts.cached(blue), 1600);
    }

    #[test]
    fn one_second_tick_matches_sliced_ticks_for_one_class() {
        let mut single = Rig::new(10_000);
        let mut sliced = Rig::new(10_000);
        for rig in [&mut single, &mut sliced] {
            let red = rig.class("Red");
            rig.counts.set_target(red, 100_000);
        }

        let report = single.tick(1.0);
        assert!(!report.guard_tripped);
        for _ in 0..100 {
            sliced.tick(0.01);
        }

        let a = single.store.count() as i64;
        let b = sliced.store.count() as i64;
        assert_eq!(a, 10_000);
        assert!((a - b).abs() <= 1, "single={a} sliced={b}");
    }

    #[test]
    fn guard_stops_runaway_rotation() {
        let mut scheduler = SpawnScheduler::new(1000);
        // a corrupt entry that never reaches zero
        scheduler.set_active_for_test(vec![ActiveClass { class: ClassId::FIRST, needed: -1 }]);
        let mut report = SpawnReport::default();
        let mut calls = 0u64;
        scheduler
            .distribute(5_000, &mut report, |_| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert!(report.guard_tripped);
        assert_eq!(calls, ITERATION_GUARD_PER_CLASS as u64);
    }

    #[test]
    fn capacity_error_ends_tick_without_failing() {
        let mut scheduler = SpawnScheduler::new(1000);
        scheduler.set_active_for_test(vec![ActiveClass { class: ClassId::FIRST, needed: 10 }]);
        let mut report = SpawnReport::default();
        let mut calls = 0;
        scheduler
            .distribute(10, &mut report, |_| {
                calls += 1;
                if calls > 3 {
                    Err(EngineError::CapacityExceeded { limit: 3 })
                } else {
                    Ok(())
                }
            })
            .unwrap();
        assert!(report.capacity_hit);
        assert_eq!(report.spawned, 3);
    }

    #[test]
    fn allocation_failure_propagates() {
        let mut scheduler = SpawnScheduler::new(1000);
        scheduler.set_active_for_test(vec![ActiveClass { class: ClassId::FIRST, needed: 10 }]);
        let mut report = SpawnReport::default();
        let result = scheduler.distribute(10, &mut report, |_| {
            Err(EngineError::AllocationFailed { requested: 1 })
        });
        assert!(matches!(result, Err(EngineError::AllocationFailed { .. })));
    }

    #[test]
    fn reset_clears_credit_and_cursor() {
        let mut rig = Rig::new(1000);
        let (red, blue) = (rig.class("Red"), rig.class("Blue"));
        rig.counts.set_target(red, 10);
        rig.counts.set_target(blue, 10);
        rig.tick(0.0015);
        rig.scheduler.reset();
        assert_eq!(rig.scheduler.time_accumulator_seconds(), 0.0);
        assert_eq!(rig.scheduler.round_robin_cursor(), 0);
    }
}
