use serde::{Deserialize, Serialize};
use std::fmt;

/// Page of the RSVP wizard. Exactly one is active per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormStep {
    Welcome,
    Details,
    Presence,
    Diet,
    ThankYou,
}

impl FormStep {
    /// The thank-you page has no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, FormStep::ThankYou)
    }

    /// Heading shown above the step
    pub fn heading(&self) -> &'static str {
        match self {
            FormStep::Welcome => "Confirmar Presença",
            FormStep::Details => "Informação Pessoal",
            FormStep::Presence => "Podemos contar com a tua presença?",
            FormStep::Diet => "Restrições Alimentares",
            FormStep::ThankYou => "Obrigado!",
        }
    }
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormStep::Welcome => "WELCOME",
            FormStep::Details => "DETAILS",
            FormStep::Presence => "PRESENCE",
            FormStep::Diet => "DIET",
            FormStep::ThankYou => "THANK_YOU",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_thank_you_is_terminal() {
        assert!(FormStep::ThankYou.is_terminal());
        for step in [
            FormStep::Welcome,
            FormStep::Details,
            FormStep::Presence,
            FormStep::Diet,
        ] {
            assert!(!step.is_terminal(), "{} should not be terminal", step);
        }
    }

    #[test]
    fn test_display_matches_serde_name() {
        let json = serde_json::to_string(&FormStep::ThankYou).unwrap();
        assert_eq!(json, "\"THANK_YOU\"");
        assert_eq!(FormStep::ThankYou.to_string(), "THANK_YOU");
    }
}
