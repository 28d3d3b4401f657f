//! RsvpSession - one guest filling in the form
//!
//! Owns the form record and step machine, and is the only place where the
//! guard, the dispatcher and the clock meet. Every method takes `&self` so
//! a repeated submit can observe the in-flight flag of an outstanding one.

use crate::dispatch::{DispatchError, Dispatcher, RsvpPayload};
use crate::guard::{Rejection, SubmissionGuard};
use crate::models::{FieldError, FormStep, FormUpdate, RsvpFormData};
use crate::state::{Clock, StepMachine, Transition};
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of a submission attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Delivered; the form was reset and the wizard is on the thank-you step
    Sent { attending: bool },
    /// Another submission is still outstanding; nothing happened
    InFlight,
    /// Turned away by the guard
    Rejected(Rejection),
    /// The request did not go through; answers are kept for a retry
    TransportFailed(DispatchError),
}

impl SubmitOutcome {
    /// Message to show the guest, if any
    pub fn user_message(&self) -> Option<String> {
        match self {
            SubmitOutcome::Rejected(rejection) => rejection.user_message(),
            SubmitOutcome::TransportFailed(e) => Some(e.user_message().to_string()),
            SubmitOutcome::Sent { .. } | SubmitOutcome::InFlight => None,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, SubmitOutcome::Sent { .. })
    }
}

/// Outcome of pressing "next"
#[derive(Debug)]
pub enum AdvanceOutcome {
    Moved(FormStep),
    Blocked(Vec<FieldError>),
    Submitted(SubmitOutcome),
    Finished,
}

/// Clears the in-flight flag on every exit path
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RsvpSession {
    form: Mutex<RsvpFormData>,
    machine: Mutex<StepMachine>,
    in_flight: AtomicBool,
    guard: SubmissionGuard,
    dispatcher: Arc<dyn Dispatcher>,
    clock: Arc<dyn Clock>,
    token: String,
}

impl RsvpSession {
    pub fn new(
        guard: SubmissionGuard,
        dispatcher: Arc<dyn Dispatcher>,
        clock: Arc<dyn Clock>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            form: Mutex::new(RsvpFormData::default()),
            machine: Mutex::new(StepMachine::new()),
            in_flight: AtomicBool::new(false),
            guard,
            dispatcher,
            clock,
            token: token.into(),
        }
    }

    fn form_lock(&self) -> MutexGuard<'_, RsvpFormData> {
        self.form.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn machine_lock(&self) -> MutexGuard<'_, StepMachine> {
        self.machine.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn step(&self) -> FormStep {
        self.machine_lock().step()
    }

    /// Snapshot of the current answers
    pub fn form(&self) -> RsvpFormData {
        self.form_lock().clone()
    }

    pub fn update(&self, update: FormUpdate) {
        self.form_lock().apply(update);
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    /// Move forward, submitting when the form is complete
    pub async fn advance(&self) -> AdvanceOutcome {
        let transition = {
            let form = self.form_lock();
            self.machine_lock().advance(&form, self.clock.now())
        };

        match transition {
            Transition::Moved(step) => {
                tracing::debug!(%step, "wizard moved");
                AdvanceOutcome::Moved(step)
            }
            Transition::Blocked(errors) => AdvanceOutcome::Blocked(errors),
            Transition::Submit => AdvanceOutcome::Submitted(self.submit().await),
            Transition::Finished => AdvanceOutcome::Finished,
        }
    }

    /// Go back one step. Refused while a submission is outstanding.
    pub fn back(&self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.machine_lock().back()
    }

    /// Guard, serialize and send the answers.
    ///
    /// A call made while another is outstanding is a no-op. Once the payload
    /// is delivered the form is always reset, even if the rate-limit log
    /// cannot be updated.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("submission already in flight, ignoring");
            return SubmitOutcome::InFlight;
        };

        let now = self.clock.now();
        let data = self.form();
        let elapsed = self.machine_lock().session_elapsed(now);

        if let Err(rejection) = self.guard.check(&data, elapsed, now) {
            if rejection.is_silent() {
                tracing::info!(reason = %rejection, "suspected automated submission dropped");
            }
            return SubmitOutcome::Rejected(rejection);
        }

        let payload = RsvpPayload::build(&data, &now.with_timezone(&Local), &self.token);

        if let Err(e) = self.dispatcher.dispatch(&payload).await {
            tracing::warn!(error = %e, "failed to send rsvp");
            return SubmitOutcome::TransportFailed(e);
        }

        if let Err(e) = self.guard.record_success(&data.email, now) {
            tracing::warn!(error = %e, "rsvp sent but not recorded for rate limiting");
        }
        self.form_lock().reset();
        self.machine_lock().finish();

        tracing::info!(attending = data.attending, "rsvp sent");
        SubmitOutcome::Sent {
            attending: data.attending,
        }
    }
}
