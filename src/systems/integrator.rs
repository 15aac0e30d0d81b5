//! Position integration with toroidal wrap
//!
//! One pass over the live rows: decode velocity, add it, wrap each axis
//! independently. This is the per-frame hot loop at high particle counts, so
//! it allocates nothing and only branches on the wrap test.

use crate::storage::{decode_velocity, ParticleStore};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rows handed to each rayon task. Smaller slices cost more to schedule than
/// they save.
#[cfg(feature = "parallel")]
const ROWS_PER_TASK: usize = 16 * 1024;

/// Wrap one coordinate into `[0, extent)`.
///
/// Requires `extent >= MIN_DOMAIN_EXTENT` (see [`crate::domain::MIN_DOMAIN_EXTENT`]).
/// Stored velocities never exceed 32.767 per tick, so one correction is enough.
#[inline(always)]
pub fn wrap(value: f32, extent: f32) -> f32 {
    if value < 0.0 {
        let wrapped = value + extent;
        // tiny negatives can round up to exactly `extent`
        if wrapped >= extent { 0.0 } else { wrapped }
    } else if value >= extent {
        value - extent
    } else {
        value
    }
}

/// Advance every live particle by one tick.
///
/// Takes the store mutably, so no append/remove/grow can run while a
/// (possibly parallel) integration pass is in flight.
pub fn integrate(store: &mut ParticleStore, width: f32, height: f32) {
    let (positions, velocities) = store.motion_mut();

    #[cfg(feature = "parallel")]
    {
        if positions.len() > ROWS_PER_TASK * 2 {
            positions
                .par_chunks_mut(ROWS_PER_TASK * 2)
                .zip(velocities.par_chunks(ROWS_PER_TASK * 2))
                .for_each(|(p, v)| integrate_rows(p, v, width, height));
            return;
        }
    }

    integrate_rows(positions, velocities, width, height);
}

/// Integrate a contiguous run of rows. Slices are interleaved `[x, y, ...]`.
#[inline]
pub fn integrate_rows(positions: &mut [f32], velocities: &[i16], width: f32, height: f32) {
    for (p, v) in positions.chunks_exact_mut(2).zip(velocities.chunks_exact(2)) {
        p[0] = wrap(p[0] + decode_velocity(v[0]), width);
        p[1] = wrap(p[1] + decode_velocity(v[1]), height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClassId;
    use crate::storage::{encode_velocity, ColorCountCache};

    fn store_with(rows: &[([f32; 2], [f32; 2])]) -> ParticleStore {
        let mut store = ParticleStore::new();
        let mut counts = ColorCountCache::new(1);
        for (pos, vel) in rows {
            store
                .append(
                    &mut counts,
                    *pos,
                    [encode_velocity(vel[0]), encode_velocity(vel[1])],
                    ClassId::FIRST,
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn right_edge_wraps_to_left() {
        let mut store = store_with(&[([799.5, 10.0], [1.0, 0.0])]);
        integrate(&mut store, 800.0, 600.0);
        let row = store.row(0).unwrap();
        assert!((row.position[0] - 0.5).abs() < 1e-4);
        assert_eq!(row.position[1], 10.0);
    }

    #[test]
    fn negative_coordinates_wrap_per_axis() {
        let mut store = store_with(&[([0.25, 0.5], [-0.5, -1.0])]);
        integrate(&mut store, 100.0, 50.0);
        let row = store.row(0).unwrap();
        assert!((row.position[0] - 99.75).abs() < 1e-4);
        assert!((row.position[1] - 49.5).abs() < 1e-4);
    }

    #[test]
    fn top_speed_stays_inside_smallest_domain() {
        let extent = crate::domain::MIN_DOMAIN_EXTENT as f32;
        let mut store = store_with(&[
            ([0.0, 0.0], [100.0, 100.0]),
            ([extent - 0.001, 0.5], [-100.0, -100.0]),
        ]);
        for _ in 0..500 {
            integrate(&mut store, extent, extent);
            for p in store.positions().chunks(2) {
                assert!((0.0..extent).contains(&p[0]), "x = {}", p[0]);
                assert!((0.0..extent).contains(&p[1]), "y = {}", p[1]);
            }
        }
    }

    #[test]
    fn wrap_keeps_values_in_domain() {
        assert_eq!(wrap(10.0, 10.0), 0.0);
        assert_eq!(wrap(-1e-9, 10.0), 0.0);
        assert_eq!(wrap(3.0, 10.0), 3.0);
        assert_eq!(wrap(-2.0, 10.0), 8.0);
    }

    #[test]
    fn large_store_matches_row_by_row_result() {
        let rows: Vec<([f32; 2], [f32; 2])> = (0..40_000)
            .map(|i| {
                let f = i as f32;
                ([f % 640.0, (f * 0.37) % 480.0], [((i % 7) as f32) - 3.0, ((i % 5) as f32) * 0.5])
            })
            .collect();
        let mut store = store_with(&rows);
        integrate(&mut store, 640.0, 480.0);

        let mut expected: Vec<f32> = rows.iter().flat_map(|(p, _)| [p[0], p[1]]).collect();
        let vel: Vec<i16> = rows
            .iter()
            .flat_map(|(_, v)| [encode_velocity(v[0]), encode_velocity(v[1])])
            .collect();
        integrate_rows(&mut expected, &vel, 640.0, 480.0);

        assert_eq!(store.positions(), expected.as_slice());
        for p in store.positions().chunks(2) {
            assert!((0.0..640.0).contains(&p[0]));
            assert!((0.0..480.0).contains(&p[1]));
        }
    }

    #[test]
    fn empty_store_is_fine() {
        let mut store = ParticleStore::new();
        integrate(&mut store, 10.0, 10.0);
        assert!(store.is_empty());
    }
}
