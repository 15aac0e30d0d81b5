//! Per-class population bookkeeping
//!
//! Counts are kept incrementally: whoever adds or removes rows reports it
//! here, so the engine never scans the store to find out how many particles
//! of a class exist.

use crate::domain::ClassId;

/// Highest population a single class may ask for.
pub const MAX_TARGET: u32 = 500_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorCount {
    /// Population the control surface asked for
    pub target: u32,
    /// Live rows with this class, exact
    pub cached: u32,
}

/// Fixed-size table indexed by palette position.
#[derive(Clone, Debug)]
pub struct ColorCountCache {
    entries: Box<[ColorCount]>,
}

impl ColorCountCache {
    pub fn new(class_count: usize) -> Self {
        Self {
            entries: vec![ColorCount::default(); class_count].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, class: ClassId) -> ColorCount {
        self.entries.get(class.index()).copied().unwrap_or_default()
    }

    #[inline]
    pub fn target(&self, class: ClassId) -> u32 {
        self.get(class).target
    }

    #[inline]
    pub fn cached(&self, class: ClassId) -> u32 {
        self.get(class).cached
    }

    /// One row of `class` was appended.
    #[inline]
    pub fn record_spawn(&mut self, class: ClassId) {
        if let Some(entry) = self.entries.get_mut(class.index()) {
            entry.cached = entry.cached.saturating_add(1);
        }
    }

    /// `n` rows of `class` were removed. Clamps at zero.
    #[inline]
    pub fn record_delete(&mut self, class: ClassId, n: usize) {
        if let Some(entry) = self.entries.get_mut(class.index()) {
            let n = u32::try_from(n).unwrap_or(u32::MAX);
            entry.cached = entry.cached.saturating_sub(n);
        }
    }

    /// `target - cached`; positive means more particles are wanted.
    #[inline]
    pub fn deficit(&self, class: ClassId) -> i64 {
        let entry = self.get(class);
        entry.target as i64 - entry.cached as i64
    }

    /// Store a new target, clamped to `[0, MAX_TARGET]`. Returns the stored value.
    ///
    /// Does not spawn or delete anything; acting on the new deficit is up to
    /// the caller.
    pub fn set_target(&mut self, class: ClassId, value: i64) -> u32 {
        let clamped = value.clamp(0, MAX_TARGET as i64) as u32;
        if let Some(entry) = self.entries.get_mut(class.index()) {
            entry.target = clamped;
        }
        clamped
    }

    /// Sum of cached counts; equals the store's row count between mutations.
    pub fn total_cached(&self) -> u64 {
        self.entries.iter().map(|e| e.cached as u64).sum()
    }

    pub fn any_deficit(&self) -> bool {
        self.entries.iter().any(|e| e.target > e.cached)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorCount> + '_ {
        self.entries.iter()
    }

    /// Zero every target and cached count.
    pub fn reset(&mut self) {
        self.entries.fill(ColorCount::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Palette;

    fn blue() -> ClassId {
        Palette::default().id_by_name("Blue").unwrap()
    }

    #[test]
    fn spawn_and_delete_adjust_cached_count() {
        let mut counts = ColorCountCache::new(6);
        for _ in 0..5 {
            counts.record_spawn(blue());
        }
        counts.record_delete(blue(), 2);
        assert_eq!(counts.cached(blue()), 3);
        assert_eq!(counts.cached(ClassId::FIRST), 0);
        assert_eq!(counts.total_cached(), 3);
    }

    #[test]
    fn delete_more_than_cached_clamps_to_zero() {
        let mut counts = ColorCountCache::new(6);
        counts.record_spawn(blue());
        counts.record_delete(blue(), 10);
        assert_eq!(counts.cached(blue()), 0);
        counts.record_delete(blue(), usize::MAX);
        assert_eq!(counts.cached(blue()), 0);
    }

    #[test]
    fn set_target_clamps_and_drives_deficit() {
        let mut counts = ColorCountCache::new(6);
        assert_eq!(counts.set_target(blue(), -4), 0);
        assert_eq!(counts.set_target(blue(), 9_000_000), MAX_TARGET);
        assert_eq!(counts.set_target(blue(), 10), 10);
        counts.record_spawn(blue());
        assert_eq!(counts.deficit(blue()), 9);
        assert!(counts.any_deficit());

        counts.set_target(blue(), 0);
        assert_eq!(counts.deficit(blue()), -1);
        assert!(!counts.any_deficit());
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut counts = ColorCountCache::new(3);
        counts.set_target(ClassId::FIRST, 7);
        counts.record_spawn(ClassId::FIRST);
        counts.reset();
        assert!(counts.iter().all(|c| *c == ColorCount::default()));
        assert_eq!(counts.len(), 3);
    }
}
