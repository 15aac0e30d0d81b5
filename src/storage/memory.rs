//! Byte accounting for the particle arrays
//!
//! Pure arithmetic over (capacity, count); recomputed whenever asked.

/// position (2 x f32) + velocity (2 x i16) + class (u8)
pub const BYTES_PER_SLOT: usize = 8 + 4 + 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryReport {
    /// Bytes held by allocated slots, live or not
    pub allocated_bytes: usize,
    /// Bytes of live rows plus whatever the renderer says it holds
    pub used_bytes: usize,
}

pub fn account(capacity: usize, count: usize, render_buffer_bytes: usize) -> MemoryReport {
    MemoryReport {
        allocated_bytes: capacity.saturating_mul(BYTES_PER_SLOT),
        used_bytes: count
            .saturating_mul(BYTES_PER_SLOT)
            .saturating_add(render_buffer_bytes),
    }
}
