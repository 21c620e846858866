use serde::{Deserialize, Serialize};

use super::domain::ShiftPreference;
use super::shift_window::ShiftWindowFormatError;
use crate::config::HiringConfig;
use crate::workflows::hiring::catalog::ShiftPeriod;

/// Eligibility thresholds and prompt options for the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakePolicy {
    pub minimum_age: i32,
    pub minimum_shift_minutes: u32,
    /// Offered as quick choices; any non-empty city is accepted.
    pub cities: Vec<String>,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::from_config(&HiringConfig::default())
    }
}

impl IntakePolicy {
    pub fn from_config(config: &HiringConfig) -> Self {
        Self {
            minimum_age: i32::from(config.minimum_age),
            minimum_shift_minutes: config.minimum_shift_minutes,
            cities: config.cities.clone(),
        }
    }

    pub fn shift_choices() -> Vec<String> {
        ["Day", "Night", "Partial day", "Partial night"]
            .iter()
            .map(|choice| choice.to_string())
            .collect()
    }
}

/// Retryable input problem; the candidate is asked the same question again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("'{input}' is not a whole number")]
    NotANumber { input: String },
    #[error("'{input}' does not name a day or night shift")]
    UnknownShift { input: String },
    #[error(transparent)]
    ShiftFormat(#[from] ShiftWindowFormatError),
    #[error("shift of {minutes} minutes is shorter than the {minimum} minute minimum")]
    ShiftTooShort { minutes: i32, minimum: u32 },
}

pub(crate) fn require_text(field: &'static str, input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn parse_age(input: &str) -> Result<i32, ValidationError> {
    let trimmed = input.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| ValidationError::NotANumber {
            input: trimmed.to_string(),
        })
}

const PARTIAL_MARKERS: [&str; 4] = ["partial", "part-time", "part time", "непол"];
const DAY_MARKERS: [&str; 3] = ["day", "днев", "день"];
const NIGHT_MARKERS: [&str; 2] = ["night", "ноч"];

/// Read a shift answer such as "Day", "partial night" or "Неполные дневные".
/// Exactly one of day/night must be named; "full" qualifiers are ignored.
pub(crate) fn parse_shift_preference(input: &str) -> Result<ShiftPreference, ValidationError> {
    let lowered = input.trim().to_lowercase();
    let mentions = |markers: &[&str]| markers.iter().any(|marker| lowered.contains(marker));

    let period = match (mentions(&DAY_MARKERS), mentions(&NIGHT_MARKERS)) {
        (true, false) => ShiftPeriod::Day,
        (false, true) => ShiftPeriod::Night,
        _ => {
            return Err(ValidationError::UnknownShift {
                input: input.trim().to_string(),
            })
        }
    };

    Ok(ShiftPreference {
        period,
        partial: mentions(&PARTIAL_MARKERS),
    })
}
