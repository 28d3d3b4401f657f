//! Wizard step transitions and the session timer

use crate::models::validation::{validate_details, validate_dietary};
use crate::models::{FieldError, FormStep, RsvpFormData};
use chrono::{DateTime, TimeDelta, Utc};

/// Elapsed time since the guest first reached the details page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTimer {
    started_at: Option<DateTime<Utc>>,
}

impl SessionTimer {
    /// Start the timer unless it is already running
    pub fn start_once(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// `None` until the timer has been started
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.started_at.map(|start| now - start)
    }

    pub fn clear(&mut self) {
        self.started_at = None;
    }
}

/// Result of asking the machine to move forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Now showing this step
    Moved(FormStep),
    /// Stayed put; these field errors should be surfaced
    Blocked(Vec<FieldError>),
    /// The form is complete and submission should run
    Submit,
    /// Already on the terminal step; nothing happened
    Finished,
}

/// Tracks the active wizard step
#[derive(Debug, Clone)]
pub struct StepMachine {
    step: FormStep,
    timer: SessionTimer,
}

impl Default for StepMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StepMachine {
    pub fn new() -> Self {
        Self {
            step: FormStep::Welcome,
            timer: SessionTimer::default(),
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn session_elapsed(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.timer.elapsed(now)
    }

    /// Move forward from the current step given the form contents
    pub fn advance(&mut self, data: &RsvpFormData, now: DateTime<Utc>) -> Transition {
        match self.step {
            FormStep::Welcome => self.enter(FormStep::Details, now),
            FormStep::Details => {
                let errors = validate_details(data);
                if errors.is_empty() {
                    self.enter(FormStep::Presence, now)
                } else {
                    Transition::Blocked(errors)
                }
            }
            FormStep::Presence if data.attending => self.enter(FormStep::Diet, now),
            FormStep::Presence => Transition::Submit,
            FormStep::Diet => match validate_dietary(data) {
                Ok(()) => Transition::Submit,
                Err(e) => Transition::Blocked(vec![e]),
            },
            FormStep::ThankYou => Transition::Finished,
        }
    }

    /// Go back one step. Only Presence and Diet have a way back.
    /// Entered data is never touched.
    pub fn back(&mut self) -> bool {
        let previous = match self.step {
            FormStep::Presence => FormStep::Details,
            FormStep::Diet => FormStep::Presence,
            _ => return false,
        };
        self.step = previous;
        true
    }

    /// Jump to the thank-you page after a successful send
    pub fn finish(&mut self) {
        self.step = FormStep::ThankYou;
        self.timer.clear();
    }

    fn enter(&mut self, step: FormStep, now: DateTime<Utc>) -> Transition {
        if step == FormStep::Details {
            self.timer.start_once(now);
        }
        self.step = step;
        Transition::Moved(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormField;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000 + secs, 0).unwrap()
    }

    fn details_ok() -> RsvpFormData {
        RsvpFormData {
            name: "Rui Costa".to_string(),
            email: "rui@example.pt".to_string(),
            ..Default::default()
        }
    }

    fn machine_at(step: FormStep) -> StepMachine {
        let mut machine = StepMachine::new();
        machine.step = step;
        machine
    }

    #[test]
    fn test_welcome_always_advances_and_starts_timer() {
        let mut machine = StepMachine::new();
        assert_eq!(machine.step(), FormStep::Welcome);
        assert!(machine.session_elapsed(t(0)).is_none());

        let transition = machine.advance(&RsvpFormData::default(), t(0));
        assert_eq!(transition, Transition::Moved(FormStep::Details));
        assert_eq!(machine.timer().started_at(), Some(t(0)));
        assert_eq!(machine.session_elapsed(t(7)), Some(TimeDelta::seconds(7)));
    }

    #[test]
    fn test_details_blocks_on_each_invalid_field() {
        let cases = [
            ("", "rui@example.pt", vec![FieldError::Required(FormField::Name)]),
            ("Rui", "rui-at-example", vec![FieldError::InvalidEmail]),
            (
                "",
                "",
                vec![
                    FieldError::Required(FormField::Name),
                    FieldError::Required(FormField::Email),
                ],
            ),
        ];

        for (name, email, expected) in cases {
            let mut machine = machine_at(FormStep::Details);
            let data = RsvpFormData {
                name: name.to_string(),
                email: email.to_string(),
                ..Default::default()
            };
            assert_eq!(machine.advance(&data, t(1)), Transition::Blocked(expected));
            assert_eq!(machine.step(), FormStep::Details);
        }
    }

    #[test]
    fn test_details_advances_when_both_valid() {
        let mut machine = machine_at(FormStep::Details);
        assert_eq!(
            machine.advance(&details_ok(), t(1)),
            Transition::Moved(FormStep::Presence)
        );
    }

    #[test]
    fn test_presence_branches_on_attendance() {
        let mut machine = machine_at(FormStep::Presence);
        let mut data = details_ok();
        assert_eq!(
            machine.advance(&data, t(1)),
            Transition::Moved(FormStep::Diet)
        );

        let mut machine = machine_at(FormStep::Presence);
        data.attending = false;
        assert_eq!(machine.advance(&data, t(1)), Transition::Submit);
        assert_eq!(machine.step(), FormStep::Presence);
    }

    #[test]
    fn test_diet_requires_details_when_declared() {
        let mut machine = machine_at(FormStep::Diet);
        let mut data = details_ok();
        data.has_dietary_restriction = true;

        assert_eq!(
            machine.advance(&data, t(1)),
            Transition::Blocked(vec![FieldError::Required(FormField::DietaryDetails)])
        );
        assert_eq!(machine.step(), FormStep::Diet);

        data.dietary_details = "Alergia a marisco".to_string();
        assert_eq!(machine.advance(&data, t(1)), Transition::Submit);
    }

    #[test]
    fn test_back_only_from_presence_and_diet() {
        let mut machine = machine_at(FormStep::Diet);
        assert!(machine.back());
        assert_eq!(machine.step(), FormStep::Presence);
        assert!(machine.back());
        assert_eq!(machine.step(), FormStep::Details);
        assert!(!machine.back());
        assert_eq!(machine.step(), FormStep::Details);

        let mut machine = machine_at(FormStep::ThankYou);
        assert!(!machine.back());
        let mut machine = StepMachine::new();
        assert!(!machine.back());
    }

    #[test]
    fn test_reentering_details_keeps_original_start() {
        let mut machine = StepMachine::new();
        let data = details_ok();
        machine.advance(&data, t(0));
        machine.advance(&data, t(5));
        assert!(machine.back());

        // Back to Details and forward again later
        machine.advance(&data, t(30));
        assert_eq!(machine.timer().started_at(), Some(t(0)));
    }

    #[test]
    fn test_thank_you_is_terminal() {
        let mut machine = machine_at(FormStep::Diet);
        machine.timer.start_once(t(0));
        machine.finish();

        assert_eq!(machine.step(), FormStep::ThankYou);
        assert!(machine.session_elapsed(t(1)).is_none());
        assert_eq!(
            machine.advance(&details_ok(), t(2)),
            Transition::Finished
        );
        assert_eq!(machine.step(), FormStep::ThankYou);
    }
}
