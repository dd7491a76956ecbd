//! Arena configuration.
//!
//! Settings are plain data, loadable from RON so they can live next to the
//! rest of the game's data files.
//!
//! # Example RON
//!
//! ```ron
//! ArenaSettings(
//!     seed: 7,
//!     map: (width: 21, height: 15, obstacle_ratio: 0.3),
//!     spawn: (target_score_per_avatar: 0.75),
//! )
//! ```
//!
//! Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ArenaError, Result};
use crate::map_generation::MapConfig;
use crate::world_map::SpawnSettings;

/// Everything needed to build and run an arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// Seed for the arena's RNG.
    pub seed: u64,
    /// Map generation parameters.
    pub map: MapConfig,
    /// Round reconciliation parameters.
    pub spawn: SpawnSettings,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            seed: 12345,
            map: MapConfig::default(),
            spawn: SpawnSettings::default(),
        }
    }
}

impl ArenaSettings {
    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the map parameters.
    #[must_use]
    pub fn with_map(mut self, map: MapConfig) -> Self {
        self.map = map;
        self
    }

    /// Set the spawn parameters.
    #[must_use]
    pub fn with_spawn(mut self, spawn: SpawnSettings) -> Self {
        self.spawn = spawn;
        self
    }

    /// Parse settings from RON text and validate them.
    pub fn from_ron(text: &str) -> Result<Self> {
        let settings: Self = ron::from_str(text).map_err(|e| {
            warn!("Rejected arena settings: {e}");
            ArenaError::SettingsParse(e.to_string())
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty RON.
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ArenaError::SettingsSerialize(e.to_string()))
    }

    /// Check map and spawn parameters.
    pub fn validate(&self) -> Result<()> {
        self.map.validate()?;
        self.spawn.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ArenaSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings = ArenaSettings::from_ron(
            "(seed: 7, map: (width: 21, height: 15, obstacle_ratio: 0.3), spawn: (target_score_per_avatar: 0.75))",
        )
        .unwrap();

        assert_eq!(settings.seed, 7);
        assert_eq!(settings.map, MapConfig::new(21, 15, 0.3));
        assert!((settings.spawn.target_score_per_avatar - 0.75).abs() < f64::EPSILON);
        assert!((settings.spawn.score_despawn_chance - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_ron_is_default() {
        assert_eq!(ArenaSettings::from_ron("()").unwrap(), ArenaSettings::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let settings = ArenaSettings::default()
            .with_seed(99)
            .with_map(MapConfig::new(9, 7, 0.5));
        let text = settings.to_ron().unwrap();
        assert_eq!(ArenaSettings::from_ron(&text).unwrap(), settings);
    }

    #[test]
    fn test_malformed_ron() {
        let result = ArenaSettings::from_ron("(seed: \"seven\")");
        assert!(matches!(result, Err(ArenaError::SettingsParse(_))));
    }

    #[test]
    fn test_invalid_values_rejected_on_load() {
        let result = ArenaSettings::from_ron("(map: (width: 8, height: 9, obstacle_ratio: 0.1))");
        assert_eq!(
            result,
            Err(ArenaError::InvalidDimensions { width: 8, height: 9 })
        );
    }
}
