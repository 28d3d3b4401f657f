// Rsvp - Wedding RSVP wizard
// Guided guest response form with anti-abuse guard and spreadsheet delivery

pub mod cli;
pub mod dispatch;
pub mod guard;
pub mod models;
pub mod session;
pub mod state;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use dispatch::{DispatchError, Dispatcher, HttpDispatcher, RsvpPayload};
pub use guard::{GuardPolicy, Rejection, SubmissionGuard};
pub use models::{FieldError, FormStep, FormUpdate, RsvpConfig, RsvpFormData};
pub use session::{AdvanceOutcome, RsvpSession, SubmitOutcome};
pub use state::{JsonFileStore, MemoryStore, StepMachine, SubmissionStore};
