use crate::models::RsvpFormData;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const LABEL_NAME: &str = "Nome Completo";
pub const LABEL_EMAIL: &str = "Email";
pub const LABEL_ATTENDING: &str = "Presença";
pub const LABEL_DIETARY: &str = "Restrições Alimentares";
pub const LABEL_DIETARY_DETAILS: &str = "Quais?";
pub const LABEL_SUBMITTED_AT: &str = "Data de Submissão";
pub const LABEL_TOKEN: &str = "token";

/// Strip `<` and `>` and trim surrounding whitespace.
///
/// Not HTML escaping, just enough that nothing tag-like reaches the sheet.
pub fn sanitize(input: &str) -> String {
    input.replace(['<', '>'], "").trim().to_string()
}

/// Portuguese locale rendering, e.g. `27/06/2026, 18:30:00`
pub fn format_submission_date<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Sim"
    } else {
        "Não"
    }
}

/// Ordered label/value pairs sent to the spreadsheet endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpPayload {
    fields: Vec<(&'static str, String)>,
}

impl RsvpPayload {
    pub fn build<Tz>(data: &RsvpFormData, submitted_at: &DateTime<Tz>, token: &str) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let details = sanitize(&data.dietary_details);
        let details = if data.has_dietary_restriction && !details.is_empty() {
            details
        } else {
            "N/A".to_string()
        };

        let fields = vec![
            (LABEL_NAME, sanitize(&data.name)),
            (LABEL_EMAIL, sanitize(&data.email)),
            (LABEL_ATTENDING, yes_no(data.attending).to_string()),
            (LABEL_DIETARY, yes_no(data.has_dietary_restriction).to_string()),
            (LABEL_DIETARY_DETAILS, details),
            (LABEL_SUBMITTED_AT, format_submission_date(submitted_at)),
            (LABEL_TOKEN, token.to_string()),
        ];

        Self { fields }
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    /// `application/x-www-form-urlencoded` body
    pub fn to_form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn lisbon_summer(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2026, 6, 27, h, m, s)
            .unwrap()
    }

    fn guest() -> RsvpFormData {
        RsvpFormData {
            name: "  Ana Sousa ".to_string(),
            email: "ana@example.pt".to_string(),
            attending: true,
            has_dietary_restriction: true,
            dietary_details: "Sem glúten".to_string(),
            honeypot: String::new(),
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("<script>x</script>"), "scriptx/script");
        assert_eq!(sanitize("  <b>Vegetariano</b>  "), "bVegetariano/b");
        assert_eq!(sanitize("Sem glúten"), "Sem glúten");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn test_fields_in_fixed_order() {
        let payload = RsvpPayload::build(&guest(), &lisbon_summer(18, 5, 9), "tok");
        let expected: Vec<(&str, String)> = vec![
            ("Nome Completo", "Ana Sousa".to_string()),
            ("Email", "ana@example.pt".to_string()),
            ("Presença", "Sim".to_string()),
            ("Restrições Alimentares", "Sim".to_string()),
            ("Quais?", "Sem glúten".to_string()),
            ("Data de Submissão", "27/06/2026, 18:05:09".to_string()),
            ("token", "tok".to_string()),
        ];
        assert_eq!(payload.fields().to_vec(), expected);
    }

    #[test]
    fn test_details_default_to_na() {
        let mut data = guest();
        data.attending = false;
        data.has_dietary_restriction = false;
        data.dietary_details = "left over from earlier".to_string();

        let payload = RsvpPayload::build(&data, &lisbon_summer(9, 0, 0), "tok");
        assert_eq!(payload.get(LABEL_ATTENDING), Some("Não"));
        assert_eq!(payload.get(LABEL_DIETARY), Some("Não"));
        assert_eq!(payload.get(LABEL_DIETARY_DETAILS), Some("N/A"));
    }

    #[test]
    fn test_details_that_sanitize_to_nothing_become_na() {
        let mut data = guest();
        data.dietary_details = "<>".to_string();
        let payload = RsvpPayload::build(&data, &lisbon_summer(9, 0, 0), "tok");
        assert_eq!(payload.get(LABEL_DIETARY_DETAILS), Some("N/A"));
    }

    #[test]
    fn test_form_body_encoding() {
        let mut data = guest();
        data.name = "Zé & Sofia".to_string();
        data.dietary_details = "<script>x</script>".to_string();

        let payload = RsvpPayload::build(&data, &lisbon_summer(18, 5, 9), "rsvp_2026");
        let body = payload.to_form_body();

        assert!(body.starts_with("Nome+Completo=Z%C3%A9+%26+Sofia&Email=ana%40example.pt&"));
        assert!(body.contains("Presen%C3%A7a=Sim"));
        assert!(body.contains("Quais%3F=scriptx%2Fscript"));
        assert!(body.contains("Data+de+Submiss%C3%A3o=27%2F06%2F2026%2C+18%3A05%3A09"));
        assert!(body.ends_with("&token=rsvp_2026"));
    }
}
