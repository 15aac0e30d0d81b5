//! Checked-in-debug, unchecked-in-release slice access
//!
//! The compaction and integration loops touch every live row each frame.
//! In debug builds they keep normal bounds checks (panics point at the bad
//! row); release builds drop them.
//!
//! Usage:
//! ```rust
//! use swarm_engine::fast;
//!
//! let row = 1;
//!
//! let classes = vec![4u8, 2, 5];
//! // Read: fast!(slice, [index])
//! let class = *fast!(classes, [row]);
//! assert_eq!(class, 2);
//!
//! let mut positions = vec![0.0f32; 6];
//! // Write: fast!(slice, [index] = value)
//! fast!(positions, [row * 2] = 12.5);
//! assert_eq!(positions[2], 12.5);
//! ```

/// Row access that is bounds-checked only under `debug_assertions`.
///
/// Callers must guarantee `index < slice.len()`; the loops using it iterate
/// `0..count` with `count <= capacity == slice.len() / stride`.
#[macro_export]
macro_rules! fast {
    ($slice:expr, [$index:expr]) => {{
        #[cfg(debug_assertions)]
        {
            &$slice[$index]
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { $slice.get_unchecked($index) }
        }
    }};

    ($slice:expr, [$index:expr] = $val:expr) => {{
        #[cfg(debug_assertions)]
        {
            $slice[$index] = $val;
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { *$slice.get_unchecked_mut($index) = $val; }
        }
    }};
}
