//! Console logging
//!
//! The engine runs inside a browser tab, so messages go straight to the JS
//! console. Native builds (tests, benches) print to stderr instead because
//! `web_sys` imports cannot be called off wasm.

/// `println!`-style info message to `console.log`.
#[macro_export]
macro_rules! engine_log {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::console::log_1(&format!($($t)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            eprintln!("[swarm] {}", format!($($t)*));
        }
    }};
}

/// `println!`-style warning to `console.warn`.
#[macro_export]
macro_rules! engine_warn {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::console::warn_1(&format!($($t)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            eprintln!("[swarm] warning: {}", format!($($t)*));
        }
    }};
}
