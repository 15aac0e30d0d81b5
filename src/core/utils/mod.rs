#[macro_use]
pub mod safety;
#[macro_use]
pub mod log;
pub mod random;
