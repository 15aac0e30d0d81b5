//! Core - macros and small helpers shared by every other module
//!
//! Declared first in lib.rs so the exported macros are in scope everywhere.

#[macro_use]
pub mod utils;
