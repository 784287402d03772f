//! Math Dash - an arithmetic drill engine
//!
//! Core modules:
//! - `generator`: Constrained problem generation (deterministic, seeded RNG)
//! - `game`: Game state machine, reducer actions, animation orchestration
//! - `config`: Difficulty configuration and presets
//! - `settings`: Persisted drill preferences
//! - `persistence`: Key-value storage port with JSON values

pub mod config;
pub mod game;
pub mod generator;
pub mod persistence;
pub mod settings;

pub use config::{Constraints, DifficultyConfig, DifficultyPreset};
pub use game::{Action, AnswerVerdict, CelebrationPhase, GameSession, GameState, Orchestrator};
pub use generator::{GenerateError, Operation, Problem, UnknownPosition, generate};
pub use persistence::{FileStorage, MemoryStorage, Storage};
pub use settings::DrillSettings;

/// Engine configuration constants
pub mod consts {
    /// Nominal orchestrator tick rate (ticks per second)
    pub const TICK_HZ: u32 = 60;

    /// Ticks spent in the `Revealing` phase showing answer feedback (1.5s)
    pub const REVEAL_DELAY_TICKS: u32 = 90;
    /// Ticks spent in the `Transitioning` phase sliding problems (0.6s)
    pub const TRANSITION_DELAY_TICKS: u32 = 36;

    /// Maximum typed answer length in digits
    pub const MAX_ANSWER_DIGITS: usize = 3;

    /// Bounded retry budget when solving for a hidden operand
    pub const SOLVE_RETRY_BUDGET: u32 = 100;

    /// Storage key for the persisted high score
    pub const HIGH_SCORE_KEY: &str = "math_dash_high_score";
    /// Storage key for the persisted settings object
    pub const SETTINGS_KEY: &str = "math_dash_settings";
}
