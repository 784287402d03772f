//! Game state and reducer
//!
//! All gameplay state lives in `GameState` and is mutated only through
//! `GameSession::dispatch`, so transitions are atomic and processed in
//! dispatch order. Input arriving outside the `Idle` phase is a silent
//! no-op rather than an error.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, DifficultyConfig};
use crate::consts::{HIGH_SCORE_KEY, MAX_ANSWER_DIGITS};
use crate::generator::{GenerateError, Problem, generate};
use crate::persistence::{self, Storage};

/// Phase of the reveal/transition animation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CelebrationPhase {
    /// Accepting input
    Idle,
    /// Showing answer feedback
    Revealing,
    /// Sliding the old problem out and the new one in
    Transitioning,
}

/// Outcome of the last submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnswerVerdict {
    /// No submission evaluated yet for the current problem
    Unknown,
    Correct,
    Incorrect,
}

/// Reducer actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append one numeric digit to the typed answer
    PushDigit(char),
    /// Remove the last typed digit
    DeleteDigit,
    /// Evaluate the typed answer against the current problem
    Submit,
    /// Enter the slide phase (dispatched by the orchestrator)
    BeginTransition,
    /// Install the next problem and return to `Idle`
    Advance,
}

/// Complete drill state exposed to the rendering layer
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub problem: Problem,
    /// Typed answer, digits only, at most `MAX_ANSWER_DIGITS` long
    pub answer_input: String,
    /// Consecutive correct answers since the last miss
    pub streak: u32,
    /// Best streak ever achieved, persisted across sessions
    pub high_score: u32,
    pub verdict: AnswerVerdict,
    pub phase: CelebrationPhase,
}

/// Per-session counters, reset every session and never persisted
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SessionStats {
    pub attempted: u32,
    pub correct: u32,
    pub best_streak: u32,
}

/// Session construction failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Owns the game state, the difficulty configuration, the seeded RNG, and
/// the injected storage port.
pub struct GameSession {
    state: GameState,
    stats: SessionStats,
    config: DifficultyConfig,
    rng: Pcg32,
    storage: Box<dyn Storage>,
}

impl GameSession {
    /// Validate the configuration, load the persisted high score, and
    /// generate the first problem.
    pub fn new(
        config: DifficultyConfig,
        storage: Box<dyn Storage>,
        seed: u64,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let high_score = persistence::load(storage.as_ref(), HIGH_SCORE_KEY, 0u32);
        let mut rng = Pcg32::seed_from_u64(seed);
        let problem = generate(&config, None, &mut rng)?;
        log::info!(
            "session started: difficulty '{}', high score {}",
            config.name,
            high_score
        );
        Ok(Self {
            state: GameState {
                problem,
                answer_input: String::new(),
                streak: 0,
                high_score,
                verdict: AnswerVerdict::Unknown,
                phase: CelebrationPhase::Idle,
            },
            stats: SessionStats::default(),
            config,
            rng,
            storage,
        })
    }

    /// Read-only snapshot of the current state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Session counters (not persisted)
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Append one digit to the typed answer
    pub fn update_answer(&mut self, digit: char) {
        // PushDigit cannot fail
        let _ = self.dispatch(Action::PushDigit(digit));
    }

    /// Remove the last typed digit
    pub fn delete_digit(&mut self) {
        let _ = self.dispatch(Action::DeleteDigit);
    }

    /// Evaluate the typed answer
    pub fn submit(&mut self) {
        let _ = self.dispatch(Action::Submit);
    }

    /// Install the next problem
    pub fn advance(&mut self) -> Result<(), GenerateError> {
        self.dispatch(Action::Advance)
    }

    /// Apply one action. Only `Advance` can fail (problem generation).
    pub fn dispatch(&mut self, action: Action) -> Result<(), GenerateError> {
        match action {
            Action::PushDigit(digit) => {
                if self.state.phase != CelebrationPhase::Idle {
                    return Ok(());
                }
                if !digit.is_ascii_digit() {
                    return Ok(());
                }
                if self.state.answer_input.len() >= MAX_ANSWER_DIGITS {
                    return Ok(());
                }
                self.state.answer_input.push(digit);
            }

            Action::DeleteDigit => {
                if self.state.phase != CelebrationPhase::Idle {
                    return Ok(());
                }
                self.state.answer_input.pop();
            }

            Action::Submit => {
                // Empty input and mid-animation submits are expected UI
                // races, not faults
                if self.state.phase != CelebrationPhase::Idle || self.state.answer_input.is_empty()
                {
                    return Ok(());
                }
                let typed: i64 = self.state.answer_input.parse().unwrap_or(i64::MIN);
                self.evaluate_submission(typed);
            }

            Action::BeginTransition => {
                if self.state.phase == CelebrationPhase::Revealing {
                    self.state.phase = CelebrationPhase::Transitioning;
                }
            }

            Action::Advance => {
                // Deferred streak reset: the missed streak stays visible
                // through the feedback phases
                if self.state.verdict == AnswerVerdict::Incorrect {
                    self.state.streak = 0;
                }
                let next = generate(&self.config, Some(&self.state.problem), &mut self.rng)?;
                self.state.problem = next;
                self.state.answer_input.clear();
                self.state.verdict = AnswerVerdict::Unknown;
                self.state.phase = CelebrationPhase::Idle;
            }
        }
        Ok(())
    }

    fn evaluate_submission(&mut self, typed: i64) {
        self.stats.attempted += 1;
        if typed == self.state.problem.answer {
            self.state.verdict = AnswerVerdict::Correct;
            self.state.streak += 1;
            self.stats.correct += 1;
            self.stats.best_streak = self.stats.best_streak.max(self.state.streak);
            if self.state.streak > self.state.high_score {
                // High score tracks the streak synchronously, never lagging
                self.state.high_score = self.state.streak;
                persistence::save(self.storage.as_mut(), HIGH_SCORE_KEY, &self.state.high_score);
                log::info!("new high score: {}", self.state.high_score);
            }
        } else {
            self.state.verdict = AnswerVerdict::Incorrect;
            log::debug!(
                "incorrect: typed {} for '{}'",
                typed,
                self.state.problem.display
            );
        }
        // Both outcomes flow through the same animated transition
        self.state.phase = CelebrationPhase::Revealing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DifficultyPreset;
    use crate::persistence::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Cloneable storage handle so tests can observe what a session wrote
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<RefCell<MemoryStorage>>);

    impl Storage for SharedStorage {
        fn read(&self, key: &str) -> Option<String> {
            self.0.borrow().read(key)
        }
        fn write(&mut self, key: &str, value: &str) -> std::io::Result<()> {
            self.0.borrow_mut().write(key, value)
        }
    }

    fn easy_session() -> GameSession {
        GameSession::new(
            DifficultyPreset::Easy.config(),
            Box::new(MemoryStorage::new()),
            12345,
        )
        .unwrap()
    }

    fn type_answer(session: &mut GameSession, value: i64) {
        for digit in value.to_string().chars() {
            session.update_answer(digit);
        }
    }

    #[test]
    fn test_correct_flow() {
        let mut session = easy_session();
        let answer = session.state().problem.answer;

        type_answer(&mut session, answer);
        session.submit();

        let state = session.state();
        assert_eq!(state.verdict, AnswerVerdict::Correct);
        assert_eq!(state.streak, 1);
        assert_eq!(state.high_score, 1);
        assert_eq!(state.phase, CelebrationPhase::Revealing);

        session.advance().unwrap();
        let state = session.state();
        assert_eq!(state.phase, CelebrationPhase::Idle);
        assert_eq!(state.verdict, AnswerVerdict::Unknown);
        assert!(state.answer_input.is_empty());
        assert_eq!(state.streak, 1);
    }

    #[test]
    fn test_incorrect_flow_defers_streak_reset() {
        let mut session = easy_session();

        // Build a streak of one first
        let answer = session.state().problem.answer;
        type_answer(&mut session, answer);
        session.submit();
        session.advance().unwrap();
        assert_eq!(session.state().streak, 1);

        // Miss on purpose: streak stays visible through the feedback
        let wrong = session.state().problem.answer + 1;
        type_answer(&mut session, wrong);
        session.submit();
        assert_eq!(session.state().verdict, AnswerVerdict::Incorrect);
        assert_eq!(session.state().streak, 1);

        // The reset lands on advance
        session.advance().unwrap();
        assert_eq!(session.state().streak, 0);
        assert_eq!(session.state().high_score, 1);
    }

    #[test]
    fn test_no_double_submit() {
        let mut session = easy_session();
        let answer = session.state().problem.answer;
        type_answer(&mut session, answer);
        session.submit();
        assert_eq!(session.state().streak, 1);

        // Second submit without an intervening advance changes nothing
        session.submit();
        assert_eq!(session.state().streak, 1);
        assert_eq!(session.stats().attempted, 1);
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let mut session = easy_session();
        session.submit();
        assert_eq!(session.state().phase, CelebrationPhase::Idle);
        assert_eq!(session.state().verdict, AnswerVerdict::Unknown);
    }

    #[test]
    fn test_digit_cap_and_non_digit_rejection() {
        let mut session = easy_session();
        for digit in ['1', '2', '3', '4'] {
            session.update_answer(digit);
        }
        assert_eq!(session.state().answer_input, "123");

        session.delete_digit();
        assert_eq!(session.state().answer_input, "12");

        session.update_answer('x');
        session.update_answer(' ');
        assert_eq!(session.state().answer_input, "12");
    }

    #[test]
    fn test_input_gated_while_revealing() {
        let mut session = easy_session();
        let answer = session.state().problem.answer;
        type_answer(&mut session, answer);
        session.submit();
        assert_eq!(session.state().phase, CelebrationPhase::Revealing);

        let frozen = session.state().answer_input.clone();
        session.update_answer('5');
        session.delete_digit();
        assert_eq!(session.state().answer_input, frozen);
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let mut session = easy_session();
        session.delete_digit();
        assert!(session.state().answer_input.is_empty());
    }

    #[test]
    fn test_streak_never_exceeds_high_score_after_advance() {
        let mut session = easy_session();
        for round in 0..20 {
            let answer = session.state().problem.answer;
            // Miss every fifth round
            let typed = if round % 5 == 4 { answer + 1 } else { answer };
            type_answer(&mut session, typed);
            session.submit();
            session.advance().unwrap();
            assert!(session.state().streak <= session.state().high_score);
        }
    }

    #[test]
    fn test_high_score_loaded_from_storage() {
        let mut storage = MemoryStorage::new();
        persistence::save(&mut storage, HIGH_SCORE_KEY, &7u32);
        let session = GameSession::new(
            DifficultyPreset::Easy.config(),
            Box::new(storage),
            1,
        )
        .unwrap();
        assert_eq!(session.state().high_score, 7);
    }

    #[test]
    fn test_high_score_persisted_on_new_record() {
        let shared = SharedStorage::default();
        let mut session = GameSession::new(
            DifficultyPreset::Easy.config(),
            Box::new(shared.clone()),
            1,
        )
        .unwrap();

        let answer = session.state().problem.answer;
        type_answer(&mut session, answer);
        session.submit();

        let persisted: u32 = persistence::load(&shared, HIGH_SCORE_KEY, 0);
        assert_eq!(persisted, 1);
    }

    #[test]
    fn test_existing_high_score_not_lowered() {
        let mut storage = MemoryStorage::new();
        persistence::save(&mut storage, HIGH_SCORE_KEY, &10u32);
        let mut session = GameSession::new(
            DifficultyPreset::Easy.config(),
            Box::new(storage),
            1,
        )
        .unwrap();

        let answer = session.state().problem.answer;
        type_answer(&mut session, answer);
        session.submit();
        assert_eq!(session.state().streak, 1);
        assert_eq!(session.state().high_score, 10);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = DifficultyPreset::Easy.config();
        config.operations.clear();
        let result = GameSession::new(config, Box::new(MemoryStorage::new()), 1);
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[test]
    fn test_session_stats_track_attempts() {
        let mut session = easy_session();
        let answer = session.state().problem.answer;
        type_answer(&mut session, answer);
        session.submit();
        session.advance().unwrap();

        let wrong = session.state().problem.answer + 1;
        type_answer(&mut session, wrong);
        session.submit();
        session.advance().unwrap();

        let stats = session.stats();
        assert_eq!(stats.attempted, 2);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.best_streak, 1);
    }
}
