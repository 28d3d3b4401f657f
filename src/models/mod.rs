pub mod config;
pub mod form;
pub mod step;
pub mod validation;

pub use config::{EventConfig, RsvpConfig, SubmissionConfig, CONFIG_FILE};
pub use form::{FormUpdate, RsvpFormData};
pub use step::FormStep;
pub use validation::{FieldError, FormField};
