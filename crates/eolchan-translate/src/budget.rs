//! Consumable poll-time budget for readiness checks.
//!
//! When a channel has no native length to consult, readiness polling
//! must not monopolize a caller-level event loop that services many
//! channels in sequence. The configured budget is therefore spent in
//! fixed-size chunks: each check gets at most one chunk, and repeated
//! checks monotonically exhaust the budget.

use std::time::Duration;

/// Largest slice of budget a single readiness check may consume.
pub const MIN_POLL_CHUNK: Duration = Duration::from_millis(25);

/// Take one poll chunk out of `budget`.
///
/// Returns `None` when no budget is configured or the budget is
/// exhausted, meaning the caller should not poll. Otherwise returns
/// `min(remaining, MIN_POLL_CHUNK)` and decrements the remaining
/// budget by the amount returned, saturating at zero.
pub fn consume_poll_chunk(budget: &mut Option<Duration>) -> Option<Duration> {
    let remaining = (*budget)?;
    if remaining.is_zero() {
        return None;
    }
    let chunk = remaining.min(MIN_POLL_CHUNK);
    *budget = Some(remaining.saturating_sub(chunk));
    Some(chunk)
}
