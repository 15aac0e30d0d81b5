/// Random number generator (xorshift32)
///
/// State must be non-zero; `seed_state` takes care of that.
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Turn an arbitrary seed into a valid xorshift state.
#[inline]
pub fn seed_state(seed: u32) -> u32 {
    if seed == 0 { 0x9E37_79B9 } else { seed }
}

/// Uniform float in `[0, 1)`.
#[inline]
pub fn unit_f32(state: &mut u32) -> f32 {
    // 24 bits fit the f32 mantissa exactly
    (xorshift32(state) >> 8) as f32 / (1u32 << 24) as f32
}

/// Uniform float in `[-amplitude, amplitude)`.
#[inline]
pub fn jitter(state: &mut u32, amplitude: f32) -> f32 {
    (unit_f32(state) * 2.0 - 1.0) * amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_is_replaced() {
        let mut state = seed_state(0);
        assert_ne!(state, 0);
        assert_ne!(xorshift32(&mut state), 0);
    }

    #[test]
    fn unit_and_jitter_stay_in_range() {
        let mut state = seed_state(12345);
        for _ in 0..10_000 {
            let u = unit_f32(&mut state);
            assert!((0.0..1.0).contains(&u));
            let j = jitter(&mut state, 3.0);
            assert!((-3.0..3.0).contains(&j));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = seed_state(77);
        let mut b = seed_state(77);
        for _ in 0..32 {
            assert_eq!(xorshift32(&mut a), xorshift32(&mut b));
        }
    }
}
