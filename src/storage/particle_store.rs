//! Packed particle storage - Structure of Arrays
//!
//! A particle is just a row index across three parallel arrays:
//!   positions:  [x0, y0, x1, y1, ...]   f32, absolute pixels
//!   velocities: [vx0, vy0, vx1, ...]    i16, real velocity * 1000
//!   classes:    [c0, c1, ...]           u8 palette index
//!
//! Rows `[0, count)` are live. Rows `[count, capacity)` are leftover slots
//! whose contents mean nothing and are never read.

use crate::domain::{ClassId, EngineError, EngineResult};

use super::color_counts::ColorCountCache;

/// Hard ceiling on live particles.
pub const MAX_PARTICLES: usize = 1_000_000;

/// Fixed-point factor for stored velocities.
pub const VELOCITY_SCALE: f32 = 1000.0;

#[inline]
pub fn encode_velocity(v: f32) -> i16 {
    // NaN casts to 0
    (v * VELOCITY_SCALE).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

#[inline]
pub fn decode_velocity(raw: i16) -> f32 {
    raw as f32 / VELOCITY_SCALE
}

/// Decoded copy of one row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleRow {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub class: u8,
}

pub struct ParticleStore {
    count: usize,
    capacity: usize,
    positions: Vec<f32>,
    velocities: Vec<i16>,
    classes: Vec<u8>,
}

impl Default for ParticleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleStore {
    /// Empty store, no slots allocated.
    pub fn new() -> Self {
        Self {
            count: 0,
            capacity: 0,
            positions: Vec::new(),
            velocities: Vec::new(),
            classes: Vec::new(),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live positions, `count * 2` floats.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions[..self.count * 2]
    }

    /// Live encoded velocities, `count * 2` values.
    #[inline]
    pub fn velocities(&self) -> &[i16] {
        &self.velocities[..self.count * 2]
    }

    /// Live class indices, `count` values.
    #[inline]
    pub fn classes(&self) -> &[u8] {
        &self.classes[..self.count]
    }

    /// Mutable live positions next to read-only velocities, for the integrator.
    #[inline]
    pub fn motion_mut(&mut self) -> (&mut [f32], &[i16]) {
        let live = self.count * 2;
        (&mut self.positions[..live], &self.velocities[..live])
    }

    pub fn row(&self, index: usize) -> Option<ParticleRow> {
        if index >= self.count {
            return None;
        }
        Some(ParticleRow {
            position: [self.positions[index * 2], self.positions[index * 2 + 1]],
            velocity: [
                decode_velocity(self.velocities[index * 2]),
                decode_velocity(self.velocities[index * 2 + 1]),
            ],
            class: self.classes[index],
        })
    }

    /// Append one row at index `count`. Returns the new row's index.
    ///
    /// Fails with `CapacityExceeded` at the particle ceiling, leaving the
    /// store and `counts` untouched.
    pub fn append(
        &mut self,
        counts: &mut ColorCountCache,
        position: [f32; 2],
        velocity: [i16; 2],
        class: ClassId,
    ) -> EngineResult<usize> {
        if self.count >= MAX_PARTICLES {
            return Err(EngineError::CapacityExceeded { limit: MAX_PARTICLES });
        }
        self.ensure_capacity(self.count + 1)?;

        let row = self.count;
        fast!(self.positions, [row * 2] = position[0]);
        fast!(self.positions, [row * 2 + 1] = position[1]);
        fast!(self.velocities, [row * 2] = velocity[0]);
        fast!(self.velocities, [row * 2 + 1] = velocity[1]);
        fast!(self.classes, [row] = class.raw());
        self.count += 1;

        counts.record_spawn(class);
        Ok(row)
    }

    /// Delete up to `how_many` rows of `class`, earliest rows first.
    ///
    /// Single pass stable compaction: matching rows are skipped until the
    /// quota is used up, every other row slides down to the next free slot.
    /// Survivors keep their relative order. Returns the number removed.
    pub fn remove_by_class(
        &mut self,
        counts: &mut ColorCountCache,
        class: ClassId,
        how_many: usize,
    ) -> usize {
        if how_many == 0 || self.count == 0 {
            return 0;
        }

        let doomed = class.raw();
        let mut removed = 0usize;
        let mut write = 0usize;

        for read in 0..self.count {
            if removed < how_many && *fast!(self.classes, [read]) == doomed {
                removed += 1;
                continue;
            }
            if write != read {
                self.copy_row(read, write);
            }
            write += 1;
        }

        self.count = write;
        counts.record_delete(class, removed);
        removed
    }

    /// Forget all rows. Allocated slots are kept.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    #[inline]
    fn copy_row(&mut self, from: usize, to: usize) {
        let (x, y) = (*fast!(self.positions, [from * 2]), *fast!(self.positions, [from * 2 + 1]));
        let (vx, vy) = (*fast!(self.velocities, [from * 2]), *fast!(self.velocities, [from * 2 + 1]));
        let class = *fast!(self.classes, [from]);

        fast!(self.positions, [to * 2] = x);
        fast!(self.positions, [to * 2 + 1] = y);
        fast!(self.velocities, [to * 2] = vx);
        fast!(self.velocities, [to * 2 + 1] = vy);
        fast!(self.classes, [to] = class);
    }

    /// Grow to `max(ceil(capacity * 1.5), required)` when `required` does not fit.
    fn ensure_capacity(&mut self, required: usize) -> EngineResult<()> {
        if required <= self.capacity {
            return Ok(());
        }
        let grown = (self.capacity * 3 + 1) / 2;
        self.reallocate(grown.max(required))
    }

    /// Move the live rows into fresh arrays of `new_capacity` slots.
    fn reallocate(&mut self, new_capacity: usize) -> EngineResult<()> {
        let live = self.count;
        let alloc_err = |_| EngineError::AllocationFailed { requested: new_capacity };

        let mut positions: Vec<f32> = Vec::new();
        positions.try_reserve_exact(new_capacity * 2).map_err(alloc_err)?;
        let mut velocities: Vec<i16> = Vec::new();
        velocities.try_reserve_exact(new_capacity * 2).map_err(alloc_err)?;
        let mut classes: Vec<u8> = Vec::new();
        classes.try_reserve_exact(new_capacity).map_err(alloc_err)?;

        positions.extend_from_slice(&self.positions[..live * 2]);
        positions.resize(new_capacity * 2, 0.0);
        velocities.extend_from_slice(&self.velocities[..live * 2]);
        velocities.resize(new_capacity * 2, 0);
        classes.extend_from_slice(&self.classes[..live]);
        classes.resize(new_capacity, 0);

        self.positions = positions;
        self.velocities = velocities;
        self.classes = classes;
        self.capacity = new_capacity;
        Ok(())
    }
}
