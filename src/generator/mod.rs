//! Constrained problem generation
//!
//! This module must be pure and deterministic:
//! - Seeded RNG only, injected by the caller
//! - Constructive draws over precomputed constraint spaces
//! - Bounded retries with explicit failure, never unbounded loops
//! - No game-state or platform dependencies

pub mod generate;
pub mod pairs;
pub mod problem;
pub mod rng;

pub use generate::{GenerateError, generate};
pub use problem::{Operation, Problem, UnknownPosition, evaluate};
