use crate::guard::rate_limit::whole_minutes_ceil;
use crate::models::RsvpConfig;
use crate::state::SubmissionRecord;
use crate::Result;
use chrono::{DateTime, Local, TimeDelta, Utc};
use colored::Colorize;

/// A record still inside the rate-limit window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub email: String,
    pub submitted_at: DateTime<Utc>,
    pub remaining: TimeDelta,
}

/// Pair each in-window record with the time left before it expires
pub fn entries(
    records: Vec<SubmissionRecord>,
    email: Option<&str>,
    window: TimeDelta,
    now: DateTime<Utc>,
) -> Vec<HistoryEntry> {
    let email = email.map(|e| e.trim().to_lowercase());
    records
        .into_iter()
        .filter(|r| email.as_deref().map_or(true, |e| r.email == e))
        .map(|r| HistoryEntry {
            remaining: window - (now - r.timestamp),
            email: r.email,
            submitted_at: r.timestamp,
        })
        .collect()
}

pub fn run(config: &RsvpConfig, email: Option<&str>, json: bool) -> Result<()> {
    let guard = super::build_guard(config)?;
    let now = Utc::now();
    let records = guard.recent_submissions(now)?;
    let entries = entries(records, email, guard.policy().rate_limit_window, now);

    if json {
        let value: Vec<_> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "email": e.email,
                    "timestamp": e.submitted_at.timestamp_millis(),
                    "remaining_ms": e.remaining.num_milliseconds(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Recent submissions ({})", config.store_path().display())
            .cyan()
            .bold()
    );
    println!();

    if entries.is_empty() {
        println!("   {}", "No submissions inside the rate-limit window".bright_black());
        return Ok(());
    }

    for entry in &entries {
        println!(
            "   {} {}  {}",
            "•".cyan(),
            entry.email,
            entry
                .submitted_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black()
        );
        println!(
            "     blocked for {} more minute(s)",
            whole_minutes_ceil(entry.remaining).to_string().yellow()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_entries_report_remaining_time() {
        let records = vec![
            SubmissionRecord::new("a@b.com", t(0)),
            SubmissionRecord::new("c@d.com", t(100)),
        ];
        let entries = entries(records, None, TimeDelta::seconds(300), t(60));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].remaining, TimeDelta::seconds(240));
        assert_eq!(entries[1].remaining, TimeDelta::seconds(340));
    }

    #[test]
    fn test_entries_filter_by_email_case_insensitively() {
        let records = vec![
            SubmissionRecord::new("a@b.com", t(0)),
            SubmissionRecord::new("c@d.com", t(10)),
        ];
        let entries = entries(records, Some(" A@B.COM"), TimeDelta::seconds(300), t(20));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].email, "a@b.com");
    }
}
