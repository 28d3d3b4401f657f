//! Session state
//!
//! - Step transitions and the session timer
//! - The persisted submission log used for rate limiting
//! - Injectable time source

mod clock;
mod machine;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use machine::{SessionTimer, StepMachine, Transition};
pub use store::{
    JsonFileStore, MemoryStore, StoreError, StoreResult, SubmissionRecord, SubmissionStore,
};
