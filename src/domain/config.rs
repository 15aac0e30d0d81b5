use serde::{Deserialize, Serialize};

use super::errors::{EngineError, EngineResult};
use super::mode::SpawnMode;
use super::palette::{Palette, PaletteEntry, MAX_CLASSES};

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_SPAWN_RATES: [u32; 3] = [1_000, 10_000, 100_000];
pub const DEFAULT_SEED: u32 = 12345;

/// Smallest accepted width/height. Must exceed the largest per-tick
/// displacement (`i16::MAX / 1000` = 32.767) so one wrap lands inside the domain.
pub const MIN_DOMAIN_EXTENT: u32 = 33;

/// Start-up settings, usually shipped to the engine as JSON by the host page.
///
/// Every field is optional in the JSON form; missing ones take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<PaletteEntry>,
    /// Rates the control surface may pick from (particles/sec)
    pub spawn_rates: Vec<u32>,
    pub default_spawn_rate: u32,
    pub default_mode: SpawnMode,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette: Palette::default_entries(),
            spawn_rates: DEFAULT_SPAWN_RATES.to_vec(),
            default_spawn_rate: DEFAULT_SPAWN_RATES[0],
            default_mode: SpawnMode::Fountain,
            seed: DEFAULT_SEED,
        }
    }
}

impl EngineConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.width < MIN_DOMAIN_EXTENT || self.height < MIN_DOMAIN_EXTENT {
            return Err(EngineError::InvalidConfig(format!(
                "domain must be at least {}x{}, got {}x{}",
                MIN_DOMAIN_EXTENT, MIN_DOMAIN_EXTENT, self.width, self.height
            )));
        }
        if self.palette.is_empty() || self.palette.len() > MAX_CLASSES {
            return Err(EngineError::InvalidConfig(format!(
                "palette needs 1..={} classes, got {}",
                MAX_CLASSES,
                self.palette.len()
            )));
        }
        if self.spawn_rates.is_empty() || self.spawn_rates.contains(&0) {
            return Err(EngineError::InvalidConfig(
                "spawn_rates must be a non-empty list of positive rates".to_string(),
            ));
        }
        if !self.spawn_rates.contains(&self.default_spawn_rate) {
            return Err(EngineError::InvalidConfig(format!(
                "default_spawn_rate {} is not one of {:?}",
                self.default_spawn_rate, self.spawn_rates
            )));
        }
        Ok(())
    }

    pub fn build_palette(&self) -> EngineResult<Palette> {
        Palette::new(self.palette.clone())
    }
}
