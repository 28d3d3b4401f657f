use serde::{Deserialize, Serialize};

/// Maximum length of the guest's full name, in characters
pub const NAME_MAX_LEN: usize = 100;
/// Maximum length of the email address, in characters
pub const EMAIL_MAX_LEN: usize = 255;
/// Maximum length of the dietary details free text, in characters
pub const DIETARY_DETAILS_MAX_LEN: usize = 500;

/// A guest's answers, owned by the active form session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpFormData {
    /// Full name as it should appear on the guest list
    pub name: String,
    /// Contact email, also the rate-limit identifier
    pub email: String,
    /// Whether the guest will attend
    pub attending: bool,
    /// Whether the guest declared an allergy or dietary restriction
    pub has_dietary_restriction: bool,
    /// Free text describing the restriction
    pub dietary_details: String,
    /// Never shown to humans; anything in here marks the session as automated
    pub honeypot: String,
}

impl Default for RsvpFormData {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            attending: true,
            has_dietary_restriction: false,
            dietary_details: String::new(),
            honeypot: String::new(),
        }
    }
}

/// A single field update coming from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormUpdate {
    Name(String),
    Email(String),
    Attending(bool),
    DietaryRestriction(bool),
    DietaryDetails(String),
    Honeypot(String),
}

impl RsvpFormData {
    /// Apply one update, leaving every other field untouched
    pub fn apply(&mut self, update: FormUpdate) {
        match update {
            FormUpdate::Name(name) => self.name = name,
            FormUpdate::Email(email) => self.email = email,
            FormUpdate::Attending(attending) => self.attending = attending,
            FormUpdate::DietaryRestriction(flag) => self.has_dietary_restriction = flag,
            FormUpdate::DietaryDetails(details) => self.dietary_details = details,
            FormUpdate::Honeypot(value) => self.honeypot = value,
        }
    }

    /// Restore every field to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Email as used for rate limiting: trimmed and lowercased
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// True when the hidden honeypot input carries anything at all
    pub fn is_honeypot_filled(&self) -> bool {
        !self.honeypot.is_empty()
    }
}
