//! Candidate-facing copy.

use super::domain::IntakeOutcome;
use super::policy::ValidationError;

pub(crate) const GREETING: &str = "Hi! I'm the hiring bot of the Kofemashina coffee-shop chain. \
Fill in a short questionnaire and I'll point you to open vacancies.";
pub(crate) const ASK_NAME: &str = "Please send your full name:";
pub(crate) const ASK_AGE: &str = "How old are you? Please answer with a number.";
pub(crate) const ASK_PHONE: &str = "Please send your phone number:";
pub(crate) const ASK_CITY: &str = "Which city do you live in?";
pub(crate) const ASK_SHIFT: &str =
    "Which shifts suit you: day or night? Choose a partial option if you can't work a full shift.";
pub(crate) const ASK_SHIFT_TIME: &str =
    "Which hours can you work? Send a range, for example 10:00-17:00.";
pub(crate) const ASK_CAFE: &str = "Which one is most convenient for you?";
pub(crate) const GENERIC_FAILURE: &str =
    "Sorry, something went wrong while saving your application. \
     Please try again later with /start.";
pub(crate) const EMPTY_FAQ: &str = "The FAQ is empty for now.";
pub(crate) const ADMIN_ONLY: &str = "This command is available to the administrator only.";
pub(crate) const HELP: &str =
    "Commands: /start to fill in the questionnaire, /faq for frequently asked questions.";

pub(crate) fn retry(error: &ValidationError, minimum_age: i32) -> String {
    match error {
        ValidationError::Empty { .. } => "Please send a non-empty answer.".to_string(),
        ValidationError::NotANumber { .. } => {
            format!("Please enter your age as a number (for example, {minimum_age}).")
        }
        ValidationError::UnknownShift { .. } => {
            "Please pick one of the options: day, night, partial day or partial night.".to_string()
        }
        ValidationError::ShiftFormat(_) => {
            "I couldn't read that time range. Example: 10:00-17:00".to_string()
        }
        ValidationError::ShiftTooShort { minimum, .. } => format!(
            "A shift must last at least {}. Please send another range, for example 10:00-17:00.",
            span(*minimum)
        ),
    }
}

fn span(minutes: u32) -> String {
    if minutes % 60 == 0 {
        format!("{} hours", minutes / 60)
    } else {
        format!("{minutes} minutes")
    }
}

pub(crate) fn vacancy_list(city: &str, options: &[String]) -> String {
    format!(
        "Here are cafes in {city} with open vacancies:\n\n{}\n\n{ASK_CAFE}",
        options.join("\n")
    )
}

pub(crate) fn outcome(outcome: IntakeOutcome, minimum_age: i32) -> String {
    match outcome {
        IntakeOutcome::Accepted => {
            "Thank you! I've passed your application to the manager.".to_string()
        }
        IntakeOutcome::Rejected(_) => format!(
            "Thanks for your answers! Unfortunately we can only consider candidates \
             aged {minimum_age} or older."
        ),
        IntakeOutcome::NoMatch => {
            "There are no open vacancies in your city for this schedule yet. \
             We've saved your application."
                .to_string()
        }
        IntakeOutcome::NoMatchPartial => {
            "No cafe in your city takes partial shifts right now. We've saved your application."
                .to_string()
        }
    }
}
