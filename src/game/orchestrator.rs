//! Animation orchestration
//!
//! A tick-counted scheduler drives the reveal/transition chain: entering
//! `Revealing` schedules `BeginTransition` after the reveal delay and
//! `Advance` after the reveal plus transition delays. Every scheduled task
//! returns a handle and can be cancelled before firing, so tearing the
//! orchestrator down never fires a stale `Advance` against a fresh
//! problem. At most one chain is in flight at a time; the reducer refuses
//! `Submit` until the chain has returned the phase to `Idle`.

use crate::consts::{REVEAL_DELAY_TICKS, TRANSITION_DELAY_TICKS};
use crate::game::state::{Action, CelebrationPhase, GameSession};
use crate::generator::GenerateError;

/// Identifies a scheduled task for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

/// What a fired timer does to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainStep {
    BeginTransition,
    Advance,
}

#[derive(Debug)]
struct Scheduled {
    id: u64,
    ticks_left: u32,
    step: ChainStep,
}

/// Deterministic tick-counted task scheduler
#[derive(Debug, Default)]
struct Scheduler {
    next_id: u64,
    pending: Vec<Scheduled>,
}

impl Scheduler {
    /// Schedule a step to fire after `ticks` calls to `tick`
    fn schedule_after(&mut self, ticks: u32, step: ChainStep) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            ticks_left: ticks,
            step,
        });
        TimerHandle(id)
    }

    /// Revoke a pending task; fired or unknown handles are no-ops
    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|task| task.id != handle.0);
    }

    /// Advance time by one tick and return the steps that came due, in
    /// schedule order
    fn tick(&mut self) -> Vec<ChainStep> {
        let mut due = Vec::new();
        self.pending.retain_mut(|task| {
            task.ticks_left = task.ticks_left.saturating_sub(1);
            if task.ticks_left == 0 {
                due.push(task.step);
                false
            } else {
                true
            }
        });
        due
    }
}

/// Pending timer handles for one reveal/transition chain
#[derive(Debug)]
struct Chain {
    begin: TimerHandle,
    advance: TimerHandle,
}

/// Drives the timed reveal/transition cycle of a session
#[derive(Debug, Default)]
pub struct Orchestrator {
    scheduler: Scheduler,
    chain: Option<Chain>,
    sliding: bool,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cosmetic slide animation is in progress
    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    /// Whether a reveal/transition chain is in flight
    pub fn chain_active(&self) -> bool {
        self.chain.is_some()
    }

    /// Observe the session phase and advance the timers by one tick.
    ///
    /// Call this once per frame. The chain start is idempotent: repeated
    /// observations of the same `Revealing` entry schedule nothing new.
    pub fn tick(&mut self, session: &mut GameSession) -> Result<(), GenerateError> {
        if session.state().phase == CelebrationPhase::Revealing && self.chain.is_none() {
            let begin = self
                .scheduler
                .schedule_after(REVEAL_DELAY_TICKS, ChainStep::BeginTransition);
            let advance = self.scheduler.schedule_after(
                REVEAL_DELAY_TICKS + TRANSITION_DELAY_TICKS,
                ChainStep::Advance,
            );
            self.chain = Some(Chain { begin, advance });
            log::debug!("reveal chain started");
        }

        for step in self.scheduler.tick() {
            match step {
                ChainStep::BeginTransition => {
                    self.sliding = true;
                    session.dispatch(Action::BeginTransition)?;
                }
                ChainStep::Advance => {
                    // Free the chain slot before dispatching so a failed
                    // generation cannot wedge the orchestrator
                    self.sliding = false;
                    self.chain = None;
                    session.dispatch(Action::Advance)?;
                }
            }
        }
        Ok(())
    }

    /// Cancel the in-flight chain, if any. No further reducer actions
    /// fire from it.
    pub fn cancel_chain(&mut self) {
        if let Some(chain) = self.chain.take() {
            self.scheduler.cancel(chain.begin);
            self.scheduler.cancel(chain.advance);
            self.sliding = false;
            log::debug!("reveal chain cancelled");
        }
    }
}
