//! Spawn position/velocity per mode
//!
//! Each mode picks an entry edge and a base heading, then adds bounded
//! jitter. Domain coordinates are canvas pixels, y grows downward.

use crate::core::utils::random::{jitter, unit_f32};
use crate::domain::SpawnMode;
use crate::storage::encode_velocity;
use crate::systems::integrator::wrap;

// Fountain: narrow mouth at bottom-center, upward cone with wide spread
const FOUNTAIN_MOUTH_HALF_WIDTH: f32 = 4.0;
const FOUNTAIN_SPREAD_X: f32 = 1.6;
const FOUNTAIN_LIFT_MIN: f32 = 2.5;
const FOUNTAIN_LIFT_RANGE: f32 = 2.5;

// Wind: anywhere on the left edge, heading right
const WIND_SPEED_MIN: f32 = 1.5;
const WIND_SPEED_RANGE: f32 = 1.5;
const WIND_DRIFT_Y: f32 = 0.4;

// Rain: anywhere on the top edge, falling fast and almost straight
const RAIN_SPEED_MIN: f32 = 6.0;
const RAIN_SPEED_RANGE: f32 = 2.0;
const RAIN_DRIFT_X: f32 = 0.1;

/// Starting state of one new particle: position and encoded velocity.
pub type Emission = ([f32; 2], [i16; 2]);

pub fn emit(mode: SpawnMode, width: f32, height: f32, rng: &mut u32) -> Emission {
    let (x, y, vx, vy) = match mode {
        SpawnMode::Fountain => (
            width * 0.5 + jitter(rng, FOUNTAIN_MOUTH_HALF_WIDTH),
            height - 1.0,
            jitter(rng, FOUNTAIN_SPREAD_X),
            -(FOUNTAIN_LIFT_MIN + unit_f32(rng) * FOUNTAIN_LIFT_RANGE),
        ),
        SpawnMode::Wind => (
            0.0,
            unit_f32(rng) * height,
            WIND_SPEED_MIN + unit_f32(rng) * WIND_SPEED_RANGE,
            jitter(rng, WIND_DRIFT_Y),
        ),
        SpawnMode::Rain => (
            unit_f32(rng) * width,
            0.0,
            jitter(rng, RAIN_DRIFT_X),
            RAIN_SPEED_MIN + unit_f32(rng) * RAIN_SPEED_RANGE,
        ),
    };

    (
        [wrap(x, width), wrap(y.max(0.0), height)],
        [encode_velocity(vx), encode_velocity(vy)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::random::seed_state;
    use crate::storage::decode_velocity;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn sample(mode: SpawnMode) -> Vec<Emission> {
        let mut rng = seed_state(99);
        (0..2_000).map(|_| emit(mode, W, H, &mut rng)).collect()
    }

    #[test]
    fn fountain_rises_from_bottom_center() {
        for (pos, vel) in sample(SpawnMode::Fountain) {
            assert!((pos[0] - W * 0.5).abs() <= FOUNTAIN_MOUTH_HALF_WIDTH);
            assert_eq!(pos[1], H - 1.0);
            assert!(decode_velocity(vel[1]) < 0.0);
            assert!(decode_velocity(vel[0]).abs() <= FOUNTAIN_SPREAD_X + 1e-3);
        }
    }

    #[test]
    fn wind_enters_left_edge_moving_right() {
        for (pos, vel) in sample(SpawnMode::Wind) {
            assert_eq!(pos[0], 0.0);
            assert!((0.0..H).contains(&pos[1]));
            assert!(decode_velocity(vel[0]) >= WIND_SPEED_MIN - 1e-3);
            assert!(decode_velocity(vel[1]).abs() <= WIND_DRIFT_Y + 1e-3);
        }
    }

    #[test]
    fn rain_falls_from_top_faster_than_other_modes() {
        for (pos, vel) in sample(SpawnMode::Rain) {
            assert_eq!(pos[1], 0.0);
            assert!((0.0..W).contains(&pos[0]));
            assert!(decode_velocity(vel[1]) >= RAIN_SPEED_MIN - 1e-3);
            assert!(decode_velocity(vel[0]).abs() <= RAIN_DRIFT_X + 1e-3);
        }
        assert!(RAIN_SPEED_MIN > FOUNTAIN_LIFT_MIN + FOUNTAIN_LIFT_RANGE);
        assert!(RAIN_SPEED_MIN > WIND_SPEED_MIN + WIND_SPEED_RANGE);
    }
}
