use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::EngineError;

/// Where new particles enter the domain and which way they head.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnMode {
    /// Bottom-center, upward cone with wide spread
    #[default]
    Fountain,
    /// Left edge, drifting right
    Wind,
    /// Across the top edge, falling fast
    Rain,
}

impl SpawnMode {
    pub const ALL: [SpawnMode; 3] = [SpawnMode::Fountain, SpawnMode::Wind, SpawnMode::Rain];

    pub fn as_str(self) -> &'static str {
        match self {
            SpawnMode::Fountain => "fountain",
            SpawnMode::Wind => "wind",
            SpawnMode::Rain => "rain",
        }
    }

    /// Numeric form used across the wasm boundary.
    pub fn as_u8(self) -> u8 {
        match self {
            SpawnMode::Fountain => 0,
            SpawnMode::Wind => 1,
            SpawnMode::Rain => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

impl fmt::Display for SpawnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpawnMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fountain" => Ok(SpawnMode::Fountain),
            "wind" => Ok(SpawnMode::Wind),
            "rain" => Ok(SpawnMode::Rain),
            _ => Err(EngineError::UnknownMode(s.to_string())),
        }
    }
}
