//! Addition pair lookup tables
//!
//! Closed-form enumeration of the ordered operand pairs for each
//! achievable sum. Drawing a sum first and then a pair gives uniform
//! coverage of the constraint space and stays non-degenerate at small
//! result caps, where rejection sampling falls apart.

/// All ordered pairs `(a, b)` with `a + b == sum` and both operands in
/// `[min_operand, max_operand]`. Pairs containing zero are excluded when
/// `include_zero` is false.
pub fn pairs_for_sum(sum: i64, min_operand: i64, max_operand: i64, include_zero: bool) -> Vec<(i64, i64)> {
    let lo = min_operand.max(sum - max_operand);
    let hi = max_operand.min(sum - min_operand);
    (lo..=hi)
        .map(|a| (a, sum - a))
        .filter(|&(a, b)| include_zero || (a != 0 && b != 0))
        .collect()
}

/// Sums in `1..=max_result` with at least one valid pair.
pub fn achievable_sums(max_result: i64, min_operand: i64, max_operand: i64, include_zero: bool) -> Vec<i64> {
    (1..=max_result)
        .filter(|&sum| !pairs_for_sum(sum, min_operand, max_operand, include_zero).is_empty())
        .collect()
}
