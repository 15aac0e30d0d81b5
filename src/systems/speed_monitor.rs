//! Simulation-speed detector
//!
//! Follows one reference row and compares how far it actually moved between
//! samples with how far it would have moved at 240 steps per second of real
//! time. A ratio near 1.0 means the frame loop keeps up; lower means frames
//! are being dropped.

use crate::storage::ParticleStore;

/// Minimum real time between two samples.
pub const SAMPLE_INTERVAL_MS: f64 = 100.0;
/// Reference step rate the expected distance is measured against.
pub const TARGET_FRAME_RATE: f32 = 240.0;
pub const MAX_SPEED: f32 = 2.0;
/// The tracked slot. Compaction may put a different particle here.
pub const REFERENCE_ROW: usize = 0;

#[derive(Clone, Debug)]
pub struct SpeedMonitor {
    reference_row: usize,
    last_position: Option<[f32; 2]>,
    last_sample_ms: Option<f64>,
    speed: f32,
}

impl Default for SpeedMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeedMonitor {
    pub fn new() -> Self {
        Self {
            reference_row: REFERENCE_ROW,
            last_position: None,
            last_sample_ms: None,
            speed: 1.0,
        }
    }

    /// Smoothed ratio in `[0, MAX_SPEED]`; 1.0 until two samples exist.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn has_baseline(&self) -> bool {
        self.last_position.is_some()
    }

    pub fn reset(&mut self) {
        self.last_position = None;
        self.last_sample_ms = None;
        self.speed = 1.0;
    }

    /// Forget the baseline but keep the current reading.
    ///
    /// Used after a pause so the paused time is not counted as lag.
    pub fn rebaseline(&mut self) {
        self.last_position = None;
        self.last_sample_ms = None;
    }

    /// Take a sample if at least `SAMPLE_INTERVAL_MS` passed since the last
    /// one. Returns true when the speed reading was recomputed.
    pub fn sample(&mut self, now_ms: f64, store: &ParticleStore, width: f32, height: f32) -> bool {
        let Some(row) = store.row(self.reference_row) else {
            self.reset();
            return false;
        };

        if let Some(last_ms) = self.last_sample_ms {
            if now_ms - last_ms < SAMPLE_INTERVAL_MS {
                return false;
            }
        }

        let (Some(previous), Some(last_ms)) = (self.last_position, self.last_sample_ms) else {
            self.last_position = Some(row.position);
            self.last_sample_ms = Some(now_ms);
            return false;
        };

        let dx = unwrap_delta(row.position[0] - previous[0], width);
        let dy = unwrap_delta(row.position[1] - previous[1], height);
        let actual = (dx * dx + dy * dy).sqrt();

        let velocity = (row.velocity[0] * row.velocity[0] + row.velocity[1] * row.velocity[1]).sqrt();
        let elapsed_s = ((now_ms - last_ms) / 1000.0) as f32;
        let expected = velocity * TARGET_FRAME_RATE * elapsed_s;

        let recomputed = expected > 0.0;
        if recomputed {
            self.speed = (actual / expected).clamp(0.0, MAX_SPEED);
        }

        self.last_position = Some(row.position);
        self.last_sample_ms = Some(now_ms);
        recomputed
    }
}

/// Undo a toroidal wrap: a jump longer than half the domain went the short way round.
#[inline]
fn unwrap_delta(delta: f32, extent: f32) -> f32 {
    if delta > extent * 0.5 {
        delta - extent
    } else if delta < -extent * 0.5 {
        delta + extent
    } else {
        delta
    }
}
