//! Constrained problem generation
//!
//! Problems are built constructively wherever possible (draw the result
//! first, derive the rest), so constraints hold by construction instead of
//! by rejection. The only bounded rejection loop is the algebraic-inverse
//! solve for a hidden operand; exhausting its budget signals an infeasible
//! configuration and is a hard error.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::pairs::{achievable_sums, pairs_for_sum};
use super::problem::{Operation, Problem, UnknownPosition, evaluate};
use super::rng::{choose, pick_int};
use crate::config::{Constraints, DifficultyConfig};
use crate::consts::SOLVE_RETRY_BUDGET;

/// Generation failures
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The hidden-operand solve exhausted its retry budget. The
    /// configuration admits no (or almost no) valid equation.
    #[error(
        "no {operation:?} problem with a hidden operand satisfies the constraints after {budget} attempts"
    )]
    Infeasible { operation: Operation, budget: u32 },
    /// A generated problem failed re-verification. Internal invariant
    /// violation; must never occur in correct code.
    #[error("generated problem failed re-verification: {display}")]
    Verification { display: String },
}

/// Generate one problem satisfying `config`.
///
/// `previous` enables the anti-repeat policy for two-operand addition: the
/// exact ordered pair just answered is excluded unless it is the only
/// feasible pair in the whole constraint space.
pub fn generate<R: Rng>(
    config: &DifficultyConfig,
    previous: Option<&Problem>,
    rng: &mut R,
) -> Result<Problem, GenerateError> {
    let operation = choose(rng, &config.operations)
        .copied()
        .unwrap_or(Operation::Addition);

    // Non-addition operations are inherently two-operand
    let slots = match operation {
        Operation::Addition => config.operand_count,
        _ => 2,
    };

    // Hidden-slot candidates valid for this operation's slot count
    let valid_unknowns: Vec<UnknownPosition> = config
        .unknown_positions
        .iter()
        .copied()
        .filter(|pos| match pos {
            UnknownPosition::Result => true,
            UnknownPosition::Operand(i) => *i < slots,
        })
        .collect();
    let unknown = choose(rng, &valid_unknowns)
        .copied()
        .unwrap_or(UnknownPosition::Result);

    let problem = match unknown {
        UnknownPosition::Result => {
            generate_result_unknown(operation, slots, &config.constraints, previous, rng)
        }
        UnknownPosition::Operand(hidden) => {
            solve_hidden_operand(operation, slots, hidden, &config.constraints, rng)?
        }
    };

    // Hard correctness gate: the equation must hold when re-evaluated
    if !problem.verify() {
        log::error!("re-verification failed for '{}'", problem.display);
        return Err(GenerateError::Verification {
            display: problem.display,
        });
    }

    log::debug!("generated '{}' (answer {})", problem.display, problem.answer);
    Ok(problem)
}

/// Build a problem whose result is the hidden slot. Never fails: every
/// draw is bounded and clamped into range.
fn generate_result_unknown<R: Rng>(
    operation: Operation,
    slots: usize,
    c: &Constraints,
    previous: Option<&Problem>,
    rng: &mut R,
) -> Problem {
    match operation {
        Operation::Addition if slots == 2 => generate_addition_pair(c, previous, rng),
        Operation::Addition => generate_addition_chain(slots, c, rng),
        Operation::Subtraction => generate_subtraction(c, rng),
        Operation::Multiplication => generate_multiplication(c, rng),
        Operation::Division => generate_division(c, rng),
    }
}

/// Two-operand addition via the pair lookup tables: draw an achievable sum
/// uniformly, then an ordered pair for it. Uniform over the constraint
/// space and non-degenerate even at `max_result = 1`.
fn generate_addition_pair<R: Rng>(
    c: &Constraints,
    previous: Option<&Problem>,
    rng: &mut R,
) -> Problem {
    let include_zero = c.include_zero();
    if include_zero && !c.allow_zero {
        log::debug!("zero inclusion forced at max_result {}", c.max_result);
    }

    let sums = achievable_sums(c.max_result, c.min_operand, c.max_operand, include_zero);
    let Some(&sum) = choose(rng, &sums) else {
        // Misconfigured space with no achievable sum; clamp a degenerate
        // equation rather than loop
        let v = c.min_operand.min(c.max_operand);
        log::warn!("no achievable addition sum under max_result {}", c.max_result);
        return Problem::new(Operation::Addition, vec![v, v], UnknownPosition::Result, v + v);
    };

    let mut pool = pairs_for_sum(sum, c.min_operand, c.max_operand, include_zero);

    // Anti-repeat: drop the ordered pair that was just answered
    if let Some(prev_pair) = previous_addition_pair(previous) {
        let filtered: Vec<(i64, i64)> = pool.iter().copied().filter(|&p| p != prev_pair).collect();
        if !filtered.is_empty() {
            pool = filtered;
        } else {
            // The chosen sum only offers the repeat; look for any other
            // sum with a different pair before allowing it
            let alternates: Vec<i64> = sums
                .iter()
                .copied()
                .filter(|&s| {
                    pairs_for_sum(s, c.min_operand, c.max_operand, include_zero)
                        .iter()
                        .any(|&p| p != prev_pair)
                })
                .collect();
            if let Some(&alt_sum) = choose(rng, &alternates) {
                pool = pairs_for_sum(alt_sum, c.min_operand, c.max_operand, include_zero)
                    .into_iter()
                    .filter(|&p| p != prev_pair)
                    .collect();
            } else {
                // Provably the sole possible problem; the repeat stands
                log::debug!("repeat allowed: ({}, {}) is the only pair", prev_pair.0, prev_pair.1);
            }
        }
    }

    let &(a, b) = choose(rng, &pool).unwrap_or(&(c.min_operand, c.min_operand));
    Problem::new(Operation::Addition, vec![a, b], UnknownPosition::Result, a + b)
}

/// The ordered operand pair of the previous problem, when it was also a
/// two-operand addition with the result hidden.
fn previous_addition_pair(previous: Option<&Problem>) -> Option<(i64, i64)> {
    let prev = previous?;
    if prev.operation == Operation::Addition
        && prev.unknown == UnknownPosition::Result
        && prev.operands.len() == 2
    {
        Some((prev.operands[0], prev.operands[1]))
    } else {
        None
    }
}

/// Addition over more than two operands: draw a total, then allocate each
/// slot while leaving the rest enough headroom, final slot absorbs the
/// remainder. Shuffled afterwards to avoid magnitude bias in the last slot.
fn generate_addition_chain<R: Rng>(slots: usize, c: &Constraints, rng: &mut R) -> Problem {
    let em = c.effective_min_operand();
    let n = slots as i64;

    let lo_total = em * n;
    let hi_total = (c.max_operand * n).min(c.max_result);
    let total = pick_int(rng, lo_total, hi_total.max(lo_total));

    let mut operands = Vec::with_capacity(slots);
    let mut left = total;
    for i in 0..slots - 1 {
        let after = (slots - 1 - i) as i64;
        let lo = em.max(left - c.max_operand * after);
        let hi = c.max_operand.min(left - em * after);
        let v = pick_int(rng, lo, hi.max(lo));
        operands.push(v);
        left -= v;
    }
    operands.push(left.clamp(em.min(c.max_operand), c.max_operand));
    operands.shuffle(rng);

    let answer = operands.iter().sum();
    Problem::new(Operation::Addition, operands, UnknownPosition::Result, answer)
}

/// Subtraction: draw the result first so it is non-negative and in range,
/// then derive the minuend, clamping with a compensating adjustment to the
/// subtrahend so the equation still holds exactly.
fn generate_subtraction<R: Rng>(c: &Constraints, rng: &mut R) -> Problem {
    let em = c.effective_min_operand();
    let r_hi = c.max_result.min(c.max_operand - em).max(0);
    let result = pick_int(rng, 0, r_hi);

    let mut subtrahend = pick_int(rng, em, c.max_operand.max(em));
    let mut minuend = result + subtrahend;
    if minuend > c.max_operand {
        subtrahend -= minuend - c.max_operand;
        minuend = c.max_operand;
    }

    Problem::new(
        Operation::Subtraction,
        vec![minuend, subtrahend],
        UnknownPosition::Result,
        result,
    )
}

/// Multiplication: bound the second factor by `max_result / first` so the
/// product never exceeds the cap.
fn generate_multiplication<R: Rng>(c: &Constraints, rng: &mut R) -> Problem {
    let em = c.effective_min_operand();
    let first = pick_int(rng, em, c.max_operand.max(em));
    let second = if first == 0 {
        pick_int(rng, em, c.max_operand.max(em))
    } else {
        let hi = (c.max_result / first).min(c.max_operand);
        pick_int(rng, em, hi.max(em))
    };

    Problem::new(
        Operation::Multiplication,
        vec![first, second],
        UnknownPosition::Result,
        first * second,
    )
}

/// Division: draw the quotient, then a non-zero divisor, and derive the
/// dividend as their product. Whole-number results by construction.
fn generate_division<R: Rng>(c: &Constraints, rng: &mut R) -> Problem {
    let include_zero = c.include_zero();
    let q_lo = if include_zero { 0 } else { 1 };
    let quotient = pick_int(rng, q_lo, c.max_result.max(q_lo));

    let d_lo = c.effective_min_operand().max(1);
    let d_hi = if quotient == 0 {
        c.max_operand
    } else {
        c.max_operand / quotient
    };
    let divisor = pick_int(rng, d_lo, d_hi.max(d_lo));

    Problem::new(
        Operation::Division,
        vec![quotient * divisor, divisor],
        UnknownPosition::Result,
        quotient,
    )
}

/// Solve for a hidden operand: draw the target result and the known
/// operands, then invert the operation algebraically. Rejects derived
/// values outside the operand range (or non-integral, or requiring a zero
/// divisor) and retries up to the budget.
fn solve_hidden_operand<R: Rng>(
    operation: Operation,
    slots: usize,
    hidden: usize,
    c: &Constraints,
    rng: &mut R,
) -> Result<Problem, GenerateError> {
    let em = c.effective_min_operand();
    let include_zero = c.include_zero();

    for _ in 0..SOLVE_RETRY_BUDGET {
        let target_lo = if include_zero { 0 } else { 1 };
        let target = pick_int(rng, target_lo.min(c.max_result), c.max_result);

        let candidate = match operation {
            Operation::Addition => {
                let knowns: Vec<i64> = (0..slots - 1)
                    .map(|_| pick_int(rng, em, c.max_operand.max(em)))
                    .collect();
                let known_sum: i64 = knowns.iter().sum();
                let value = target - known_sum;
                let mut operands = knowns;
                operands.insert(hidden, value);
                Some((operands, value))
            }
            Operation::Subtraction => {
                let known = pick_int(rng, em, c.max_operand.max(em));
                if hidden == 0 {
                    // ? − known = target
                    let value = target + known;
                    Some((vec![value, known], value))
                } else {
                    // known − ? = target
                    let value = known - target;
                    Some((vec![known, value], value))
                }
            }
            Operation::Multiplication => {
                let known = pick_int(rng, em, c.max_operand.max(em));
                if known == 0 || target % known != 0 {
                    None
                } else {
                    let value = target / known;
                    let operands = if hidden == 0 {
                        vec![value, known]
                    } else {
                        vec![known, value]
                    };
                    Some((operands, value))
                }
            }
            Operation::Division => {
                if hidden == 0 {
                    // ? ÷ known = target
                    let known = pick_int(rng, em.max(1), c.max_operand.max(1));
                    let value = target * known;
                    Some((vec![value, known], value))
                } else {
                    // known ÷ ? = target
                    let known = pick_int(rng, em, c.max_operand.max(em));
                    if target == 0 || known % target != 0 {
                        None
                    } else {
                        let value = known / target;
                        Some((vec![known, value], value))
                    }
                }
            }
        };

        let Some((operands, value)) = candidate else {
            continue;
        };

        // Derived operand must respect the operand constraints
        if value < c.min_operand || value > c.max_operand {
            continue;
        }
        if !include_zero && value == 0 {
            continue;
        }
        if operation == Operation::Division && hidden == 1 && value == 0 {
            continue;
        }

        // Independent re-evaluation against the drawn target
        if evaluate(operation, &operands) != Some(target) {
            let display = Problem::new(operation, operands, UnknownPosition::Operand(hidden), value)
                .display;
            log::error!("inverse solve produced inconsistent equation '{}'", display);
            return Err(GenerateError::Verification { display });
        }

        return Ok(Problem::new(
            operation,
            operands,
            UnknownPosition::Operand(hidden),
            value,
        ));
    }

    log::warn!(
        "hidden-operand solve for {:?} exhausted {} attempts",
        operation,
        SOLVE_RETRY_BUDGET
    );
    Err(GenerateError::Infeasible {
        operation,
        budget: SOLVE_RETRY_BUDGET,
    })
}
