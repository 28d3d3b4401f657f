use super::form::{RsvpFormData, DIETARY_DETAILS_MAX_LEN, EMAIL_MAX_LEN, NAME_MAX_LEN};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Free-text fields that carry validation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    Name,
    Email,
    DietaryDetails,
}

impl FormField {
    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Nome Completo",
            FormField::Email => "Email",
            FormField::DietaryDetails => "Quais?",
        }
    }

    /// Maximum accepted length, in characters
    pub fn max_len(&self) -> usize {
        match self {
            FormField::Name => NAME_MAX_LEN,
            FormField::Email => EMAIL_MAX_LEN,
            FormField::DietaryDetails => DIETARY_DETAILS_MAX_LEN,
        }
    }
}

/// A violated field constraint. `Display` is the message shown to the guest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("O campo \"{}\" é obrigatório.", .0.label())]
    Required(FormField),

    #[error("O campo \"{}\" não pode ter mais de {max} caracteres.", .field.label())]
    TooLong { field: FormField, max: usize },

    #[error("O email introduzido não é válido.")]
    InvalidEmail,
}

impl FieldError {
    /// Field the error should be displayed against
    pub fn field(&self) -> FormField {
        match self {
            FieldError::Required(field) => *field,
            FieldError::TooLong { field, .. } => *field,
            FieldError::InvalidEmail => FormField::Email,
        }
    }
}

/// Length of the trimmed value, the text that is actually sent
fn check_len(value: &str, field: FormField) -> Result<(), FieldError> {
    let max = field.max_len();
    if value.trim().chars().count() > max {
        return Err(FieldError::TooLong { field, max });
    }
    Ok(())
}

/// Name must be non-blank and at most 100 characters
pub fn validate_name(name: &str) -> Result<(), FieldError> {
    if name.trim().is_empty() {
        return Err(FieldError::Required(FormField::Name));
    }
    check_len(name, FormField::Name)
}

/// Email must be present, at most 255 characters and shaped like `local@domain.tld`
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FieldError::Required(FormField::Email));
    }
    check_len(email, FormField::Email)?;
    if !EMAIL_RE.is_match(email) {
        return Err(FieldError::InvalidEmail);
    }
    Ok(())
}

/// Details are required only when a restriction was declared
pub fn validate_dietary(data: &RsvpFormData) -> Result<(), FieldError> {
    if !data.has_dietary_restriction {
        return Ok(());
    }
    if data.dietary_details.trim().is_empty() {
        return Err(FieldError::Required(FormField::DietaryDetails));
    }
    check_len(&data.dietary_details, FormField::DietaryDetails)
}

/// Validate the details page, collecting the name and email errors independently
pub fn validate_details(data: &RsvpFormData) -> Vec<FieldError> {
    [validate_name(&data.name), validate_email(&data.email)]
        .into_iter()
        .filter_map(Result::err)
        .collect()
}

/// Full re-validation before anything leaves the machine. Reports the first violation.
pub fn validate_submission(data: &RsvpFormData) -> Result<(), FieldError> {
    validate_email(&data.email)?;
    validate_name(&data.name)?;
    validate_dietary(data)?;
    // Details typed before the restriction was switched off still must not exceed the limit
    check_len(&data.dietary_details, FormField::DietaryDetails)
}
