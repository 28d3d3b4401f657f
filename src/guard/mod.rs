//! Submission guard
//!
//! Decides whether a completed form may produce the outbound request.
//! Checks run in a fixed order and the first failure wins:
//! 1. Honeypot (silent)
//! 2. Per-email rate limit (visible, reports the wait)
//! 3. Minimum fill time (silent)
//! 4. Field validation (visible, names the field)

pub mod rate_limit;

use crate::models::validation::validate_submission;
use crate::models::{FieldError, RsvpFormData, SubmissionConfig};
use crate::state::{StoreError, SubmissionRecord, SubmissionStore};
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

/// Thresholds applied by the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    pub rate_limit_window: TimeDelta,
    pub min_fill_time: TimeDelta,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            rate_limit_window: TimeDelta::minutes(5),
            min_fill_time: TimeDelta::seconds(10),
        }
    }
}

impl TryFrom<&SubmissionConfig> for GuardPolicy {
    type Error = anyhow::Error;

    fn try_from(config: &SubmissionConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            rate_limit_window: config.rate_limit_window()?,
            min_fill_time: config.min_fill_time()?,
        })
    }
}

/// Why a submission attempt was turned away
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("honeypot field was filled")]
    Honeypot,

    #[error(
        "Já recebemos uma resposta com este email. Por favor, aguarde {remaining_minutes} minuto(s) antes de tentar novamente."
    )]
    RateLimited { remaining_minutes: i64 },

    #[error("form completed too quickly ({elapsed_ms:?} ms)")]
    TooFast { elapsed_ms: Option<i64> },

    #[error(transparent)]
    Invalid(#[from] FieldError),
}

impl Rejection {
    /// Suspected automation gets no feedback at all
    pub fn is_silent(&self) -> bool {
        matches!(self, Rejection::Honeypot | Rejection::TooFast { .. })
    }

    /// Message to show the guest, if any
    pub fn user_message(&self) -> Option<String> {
        if self.is_silent() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

/// Applies the anti-abuse checks and keeps the rate-limit log
pub struct SubmissionGuard {
    store: Arc<dyn SubmissionStore>,
    policy: GuardPolicy,
}

impl SubmissionGuard {
    pub fn new(store: Arc<dyn SubmissionStore>, policy: GuardPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Run every check in order.
    ///
    /// `elapsed` is the session timer reading; `None` means the details page
    /// was never reached and counts as too fast. An unreadable or unwritable
    /// log is logged and treated as empty, so a broken store never blocks a guest.
    pub fn check(
        &self,
        data: &RsvpFormData,
        elapsed: Option<TimeDelta>,
        now: DateTime<Utc>,
    ) -> Result<(), Rejection> {
        if data.is_honeypot_filled() {
            return Err(Rejection::Honeypot);
        }

        self.check_rate_limit(&data.normalized_email(), now)?;

        match elapsed {
            Some(elapsed) if elapsed >= self.policy.min_fill_time => {}
            _ => {
                return Err(Rejection::TooFast {
                    elapsed_ms: elapsed.map(|e| e.num_milliseconds()),
                })
            }
        }

        validate_submission(data)?;
        Ok(())
    }

    /// Remember a successful submission for `email`
    pub fn record_success(&self, email: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut records =
            rate_limit::prune(self.store.read()?, self.policy.rate_limit_window, now);
        records.push(SubmissionRecord::new(email.trim().to_lowercase(), now));
        self.store.write(&records)
    }

    /// In-window records, oldest first
    pub fn recent_submissions(&self, now: DateTime<Utc>) -> Result<Vec<SubmissionRecord>, StoreError> {
        let mut records =
            rate_limit::prune(self.store.read()?, self.policy.rate_limit_window, now);
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    /// Remaining wait for `email`, if it is still rate limited
    pub fn remaining_wait(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TimeDelta>, StoreError> {
        let records = self.store.read()?;
        Ok(rate_limit::remaining_wait(
            &records,
            &email.trim().to_lowercase(),
            self.policy.rate_limit_window,
            now,
        ))
    }

    fn check_rate_limit(&self, email: &str, now: DateTime<Utc>) -> Result<(), Rejection> {
        let window = self.policy.rate_limit_window;
        let records = match self.store.read() {
            Ok(records) => rate_limit::prune(records, window, now),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read submission log, skipping rate limit");
                Vec::new()
            }
        };
        if let Err(e) = self.store.write(&records) {
            tracing::warn!(error = %e, "failed to rewrite submission log");
        }

        if let Some(wait) = rate_limit::remaining_wait(&records, email, window, now) {
            let remaining_minutes = rate_limit::whole_minutes_ceil(wait);
            tracing::info!(email, remaining_minutes, "submission rate limited");
            return Err(Rejection::RateLimited { remaining_minutes });
        }
        Ok(())
    }
}
