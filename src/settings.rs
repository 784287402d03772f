//! Persisted drill preferences
//!
//! Stored separately from the high score under their own key. Only the
//! numeric bounds and the zero-inclusion flag are persisted; session
//! statistics never are.

use serde::{Deserialize, Serialize};

use crate::config::DifficultyConfig;
use crate::consts::SETTINGS_KEY;
use crate::persistence::{self, Storage};

/// User-tunable drill preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillSettings {
    /// Largest allowed visible result
    pub max_result: i64,
    /// Smallest allowed operand value
    pub min_operand: i64,
    /// Largest allowed operand value
    pub max_operand: i64,
    /// Whether zero may appear as an operand
    pub allow_zero: bool,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            max_result: 10,
            min_operand: 0,
            max_operand: 10,
            allow_zero: true,
        }
    }
}

impl DrillSettings {
    /// Load settings from storage, falling back to defaults on absence or
    /// corruption.
    pub fn load(storage: &dyn Storage) -> Self {
        persistence::load(storage, SETTINGS_KEY, Self::default())
    }

    /// Persist settings, best effort.
    pub fn save(&self, storage: &mut dyn Storage) {
        persistence::save(storage, SETTINGS_KEY, self);
        log::info!("settings saved");
    }

    /// Overlay these preferences onto a difficulty configuration.
    pub fn apply(&self, config: &mut DifficultyConfig) {
        config.constraints.max_result = self.max_result;
        config.constraints.min_operand = self.min_operand;
        config.constraints.max_operand = self.max_operand;
        config.constraints.allow_zero = self.allow_zero;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults_on_empty_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(DrillSettings::load(&storage), DrillSettings::default());
    }

    #[test]
    fn test_round_trip() {
        let mut storage = MemoryStorage::new();
        let settings = DrillSettings {
            max_result: 20,
            min_operand: 1,
            max_operand: 12,
            allow_zero: false,
        };
        settings.save(&mut storage);
        assert_eq!(DrillSettings::load(&storage), settings);
    }

    #[test]
    fn test_apply_overrides_constraints() {
        let mut config = DifficultyConfig::default();
        let settings = DrillSettings {
            max_result: 50,
            min_operand: 2,
            max_operand: 25,
            allow_zero: false,
        };
        settings.apply(&mut config);
        assert_eq!(config.constraints.max_result, 50);
        assert_eq!(config.constraints.min_operand, 2);
        assert_eq!(config.constraints.max_operand, 25);
        assert!(!config.constraints.allow_zero);
        assert_eq!(config.validate(), Ok(()));
    }
}
