use crate::state::SubmissionRecord;
use chrono::{DateTime, TimeDelta, Utc};

const MINUTE_MS: i64 = 60_000;

/// Whether a record taken at `at` still counts at `now`.
///
/// Records stamped in the future (clock moved back, hand-edited log) never count.
fn in_window(at: DateTime<Utc>, window: TimeDelta, now: DateTime<Utc>) -> bool {
    let age = now - at;
    age >= TimeDelta::zero() && age < window
}

/// Drop records that fell out of the trailing window
pub fn prune(
    records: Vec<SubmissionRecord>,
    window: TimeDelta,
    now: DateTime<Utc>,
) -> Vec<SubmissionRecord> {
    records
        .into_iter()
        .filter(|r| in_window(r.timestamp, window, now))
        .collect()
}

/// Remaining wait before `email` may submit again, or `None` if it may submit now.
///
/// Measured from the earliest in-window submission for that email.
pub fn remaining_wait(
    records: &[SubmissionRecord],
    email: &str,
    window: TimeDelta,
    now: DateTime<Utc>,
) -> Option<TimeDelta> {
    let earliest = records
        .iter()
        .filter(|r| r.email == email && in_window(r.timestamp, window, now))
        .map(|r| r.timestamp)
        .min()?;

    Some(window - (now - earliest))
}

/// Whole minutes, rounded up, never below one
pub fn whole_minutes_ceil(wait: TimeDelta) -> i64 {
    let ms = wait.num_milliseconds().max(1);
    ((ms + MINUTE_MS - 1) / MINUTE_MS).max(1)
}
