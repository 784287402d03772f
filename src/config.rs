//! Difficulty configuration and presets
//!
//! A `DifficultyConfig` is accepted at session start and fixed for the
//! session. It is validated once, so the generator can assume a feasible
//! constraint space.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::pairs::achievable_sums;
use crate::generator::{Operation, UnknownPosition};

/// Numeric constraints on generated problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Largest allowed visible result
    pub max_result: i64,
    /// Smallest allowed operand value
    pub min_operand: i64,
    /// Largest allowed operand value
    pub max_operand: i64,
    /// Whether zero may appear as an operand
    pub allow_zero: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_result: 10,
            min_operand: 0,
            max_operand: 10,
            allow_zero: true,
        }
    }
}

impl Constraints {
    /// Zero-inclusion policy actually used by the generator.
    ///
    /// At `max_result <= 1` the addition pair pool is empty without zero,
    /// so exclusion is overridden there.
    pub fn include_zero(&self) -> bool {
        self.allow_zero || self.max_result <= 1
    }

    /// Smallest operand value under the zero-inclusion policy
    pub fn effective_min_operand(&self) -> i64 {
        if !self.include_zero() && self.min_operand == 0 {
            1
        } else {
            self.min_operand
        }
    }
}

/// Configuration errors surfaced at session start
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("operation set is empty")]
    NoOperations,
    #[error("unknown-position set is empty")]
    NoUnknownPositions,
    #[error("operand count {0} is below the minimum of 2")]
    OperandCountTooSmall(usize),
    #[error("min operand {min} exceeds max operand {max}")]
    InvertedOperandBounds { min: i64, max: i64 },
    #[error("unknown operand index {index} is out of range for {count} operands")]
    UnknownIndexOutOfRange { index: usize, count: usize },
    #[error("no addition pair exists under max result {max_result}")]
    InfeasibleAddition { max_result: i64 },
}

/// Difficulty configuration accepted at session start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub name: String,
    /// Operations to draw from (non-empty)
    pub operations: Vec<Operation>,
    /// Operand count for addition problems (other operations use two)
    pub operand_count: usize,
    /// Hidden-slot candidates to draw from (non-empty)
    pub unknown_positions: Vec<UnknownPosition>,
    pub constraints: Constraints,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        DifficultyPreset::Easy.config()
    }
}

impl DifficultyConfig {
    /// Check the configuration for structural errors and an infeasible
    /// addition space.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operations.is_empty() {
            return Err(ConfigError::NoOperations);
        }
        if self.unknown_positions.is_empty() {
            return Err(ConfigError::NoUnknownPositions);
        }
        if self.operand_count < 2 {
            return Err(ConfigError::OperandCountTooSmall(self.operand_count));
        }
        let c = &self.constraints;
        if c.min_operand > c.max_operand {
            return Err(ConfigError::InvertedOperandBounds {
                min: c.min_operand,
                max: c.max_operand,
            });
        }
        for pos in &self.unknown_positions {
            if let UnknownPosition::Operand(index) = *pos {
                if index >= self.operand_count {
                    return Err(ConfigError::UnknownIndexOutOfRange {
                        index,
                        count: self.operand_count,
                    });
                }
            }
        }
        if self.operations.contains(&Operation::Addition)
            && achievable_sums(c.max_result, c.min_operand, c.max_operand, c.include_zero())
                .is_empty()
        {
            return Err(ConfigError::InfeasibleAddition {
                max_result: c.max_result,
            });
        }
        Ok(())
    }
}

/// Named difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Medium => "Medium",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "medium" | "med" => Some(DifficultyPreset::Medium),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Full configuration for this preset
    pub fn config(&self) -> DifficultyConfig {
        match self {
            DifficultyPreset::Easy => DifficultyConfig {
                name: self.as_str().to_string(),
                operations: vec![Operation::Addition],
                operand_count: 2,
                unknown_positions: vec![UnknownPosition::Result],
                constraints: Constraints::default(),
            },
            DifficultyPreset::Medium => DifficultyConfig {
                name: self.as_str().to_string(),
                operations: vec![Operation::Addition, Operation::Subtraction],
                operand_count: 2,
                unknown_positions: vec![UnknownPosition::Result],
                constraints: Constraints {
                    max_result: 20,
                    min_operand: 0,
                    max_operand: 20,
                    allow_zero: true,
                },
            },
            DifficultyPreset::Hard => DifficultyConfig {
                name: self.as_str().to_string(),
                operations: vec![
                    Operation::Addition,
                    Operation::Subtraction,
                    Operation::Multiplication,
                    Operation::Division,
                ],
                operand_count: 2,
                unknown_positions: vec![
                    UnknownPosition::Result,
                    UnknownPosition::Operand(0),
                    UnknownPosition::Operand(1),
                ],
                constraints: Constraints {
                    max_result: 50,
                    min_operand: 1,
                    max_operand: 12,
                    allow_zero: false,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [
            DifficultyPreset::Easy,
            DifficultyPreset::Medium,
            DifficultyPreset::Hard,
        ] {
            assert_eq!(preset.config().validate(), Ok(()));
        }
    }

    #[test]
    fn test_preset_round_trip() {
        assert_eq!(DifficultyPreset::from_str("hard"), Some(DifficultyPreset::Hard));
        assert_eq!(
            DifficultyPreset::from_str(DifficultyPreset::Medium.as_str()),
            Some(DifficultyPreset::Medium)
        );
        assert_eq!(DifficultyPreset::from_str("nightmare"), None);
    }

    #[test]
    fn test_validate_rejects_empty_sets() {
        let mut config = DifficultyConfig::default();
        config.operations.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoOperations));

        let mut config = DifficultyConfig::default();
        config.unknown_positions.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoUnknownPositions));
    }

    #[test]
    fn test_validate_rejects_bad_bounds() {
        let mut config = DifficultyConfig::default();
        config.constraints.min_operand = 8;
        config.constraints.max_operand = 3;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedOperandBounds { min: 8, max: 3 })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_unknown() {
        let mut config = DifficultyConfig::default();
        config.unknown_positions = vec![UnknownPosition::Operand(2)];
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownIndexOutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_infeasible_addition() {
        let mut config = DifficultyConfig::default();
        config.constraints.min_operand = 8;
        config.constraints.max_operand = 9;
        config.constraints.max_result = 10;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InfeasibleAddition { max_result: 10 })
        );
    }

    #[test]
    fn test_zero_forced_at_tiny_max_result() {
        let constraints = Constraints {
            max_result: 1,
            allow_zero: false,
            ..Constraints::default()
        };
        assert!(constraints.include_zero());
    }
}
