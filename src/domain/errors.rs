use thiserror::Error;

/// Everything the engine can report back to its host.
///
/// Only `AllocationFailed` is fatal; the rest describe a dropped or rejected
/// request and leave the engine state untouched.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("particle capacity exceeded (limit {limit})")]
    CapacityExceeded { limit: usize },

    #[error("failed to allocate particle storage for {requested} slots")]
    AllocationFailed { requested: usize },

    #[error("unsupported spawn rate: {0} particles/sec")]
    UnsupportedSpawnRate(u32),

    #[error("unknown spawn mode: {0}")]
    UnknownMode(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
