//! Problem value types and equation evaluation
//!
//! A `Problem` is constructed once by the generator and never mutated;
//! advancing the game installs a fresh one.

use serde::{Deserialize, Serialize};

/// Arithmetic operation of a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    /// Display symbol used in the equation string
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Addition => "+",
            Operation::Subtraction => "−",
            Operation::Multiplication => "×",
            Operation::Division => "÷",
        }
    }

    /// Apply the operation to a pair of operands.
    ///
    /// Returns `None` for division by zero or a non-integral quotient.
    pub fn apply(&self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Operation::Addition => Some(lhs + rhs),
            Operation::Subtraction => Some(lhs - rhs),
            Operation::Multiplication => Some(lhs * rhs),
            Operation::Division => {
                if rhs == 0 || lhs % rhs != 0 {
                    None
                } else {
                    Some(lhs / rhs)
                }
            }
        }
    }
}

/// Which slot of the equation is hidden and must be supplied by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnknownPosition {
    /// The result is hidden (`3 + 4 = ?`)
    Result,
    /// The operand at this zero-based index is hidden (`? × 4 = 12`)
    Operand(usize),
}

/// Evaluate an operation left-to-right over an operand sequence.
///
/// Returns `None` if any step is undefined (division by zero or a
/// fractional quotient).
pub fn evaluate(operation: Operation, operands: &[i64]) -> Option<i64> {
    let (first, rest) = operands.split_first()?;
    rest.iter()
        .try_fold(*first, |acc, &rhs| operation.apply(acc, rhs))
}

/// A single generated arithmetic problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub operation: Operation,
    /// Full operand values, including the hidden one
    pub operands: Vec<i64>,
    pub unknown: UnknownPosition,
    /// Value the user must type for the hidden slot
    pub answer: i64,
    /// Equation text with the hidden slot shown as `?`
    pub display: String,
}

impl Problem {
    /// Build a problem and its display string.
    ///
    /// `operands` must contain the true value of every slot; `answer` is
    /// the visible result when the result is unknown, or the hidden
    /// operand's value otherwise.
    pub(crate) fn new(
        operation: Operation,
        operands: Vec<i64>,
        unknown: UnknownPosition,
        answer: i64,
    ) -> Self {
        let display = format_display(operation, &operands, unknown, answer);
        Self {
            operation,
            operands,
            unknown,
            answer,
            display,
        }
    }

    /// The visible result on the right-hand side of the equation
    pub fn visible_result(&self) -> Option<i64> {
        match self.unknown {
            UnknownPosition::Result => Some(self.answer),
            UnknownPosition::Operand(_) => evaluate(self.operation, &self.operands),
        }
    }

    /// Re-evaluate the equation with the unknown slot filled by `answer`
    /// and check it against the visible result.
    pub fn verify(&self) -> bool {
        let Some(visible) = self.visible_result() else {
            return false;
        };
        let mut filled = self.operands.clone();
        if let UnknownPosition::Operand(i) = self.unknown {
            if i >= filled.len() {
                return false;
            }
            filled[i] = self.answer;
        }
        evaluate(self.operation, &filled) == Some(visible)
    }
}

fn format_display(
    operation: Operation,
    operands: &[i64],
    unknown: UnknownPosition,
    answer: i64,
) -> String {
    let lhs = operands
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if unknown == UnknownPosition::Operand(i) {
                "?".to_string()
            } else {
                v.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(&format!(" {} ", operation.symbol()));

    match unknown {
        UnknownPosition::Result => format!("{} = ?", lhs),
        UnknownPosition::Operand(_) => {
            let result = evaluate(operation, operands).unwrap_or(answer);
            format!("{} = {}", lhs, result)
        }
    }
}
