//! Systems - per-tick work on the particle store
//!
//! - spawn/          - budget + round-robin scheduler, per-mode emitters
//! - integrator      - position step with toroidal wrap
//! - speed_monitor   - real-time lag detection

pub mod integrator;
pub mod spawn;
pub mod speed_monitor;

pub use spawn::{SpawnReport, SpawnScheduler};
pub use speed_monitor::SpeedMonitor;
