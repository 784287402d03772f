//! Game state machine and animation orchestration
//!
//! `state` owns the reducer; `orchestrator` owns the timers. The state is
//! mutated only through dispatched actions, in order, on one thread.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{Orchestrator, TimerHandle};
pub use state::{
    Action, AnswerVerdict, CelebrationPhase, GameSession, GameState, SessionError, SessionStats,
};
