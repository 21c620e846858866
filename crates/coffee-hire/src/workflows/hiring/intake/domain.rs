use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::shift_window::ShiftWindow;
use crate::workflows::hiring::catalog::ShiftPeriod;

/// Transport-level identity of a candidate (chat user id or similar).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which shifts the candidate wants and whether they need a shortened schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPreference {
    pub period: ShiftPeriod,
    pub partial: bool,
}

impl ShiftPreference {
    pub const fn label(self) -> &'static str {
        match (self.period, self.partial) {
            (ShiftPeriod::Day, false) => "day",
            (ShiftPeriod::Night, false) => "night",
            (ShiftPeriod::Day, true) => "partial day",
            (ShiftPeriod::Night, true) => "partial night",
        }
    }
}

/// Answers collected so far. Fields fill strictly in questionnaire order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub shift: Option<ShiftPreference>,
    pub shift_window: Option<ShiftWindow>,
    pub cafe: Option<String>,
}

impl CandidateProfile {
    /// Rendered value for uncollected fields in logs and notices.
    pub const MISSING: &'static str = "-";

    pub fn name_or_missing(&self) -> &str {
        self.full_name.as_deref().unwrap_or(Self::MISSING)
    }

    pub fn age_or_missing(&self) -> String {
        display_or_missing(self.age)
    }

    pub fn phone_or_missing(&self) -> &str {
        self.phone.as_deref().unwrap_or(Self::MISSING)
    }

    pub fn city_or_missing(&self) -> &str {
        self.city.as_deref().unwrap_or(Self::MISSING)
    }

    pub fn shift_or_missing(&self) -> &str {
        self.shift
            .map(ShiftPreference::label)
            .unwrap_or(Self::MISSING)
    }

    pub fn shift_window_or_missing(&self) -> String {
        display_or_missing(self.shift_window)
    }

    pub fn cafe_or_missing(&self) -> &str {
        self.cafe.as_deref().unwrap_or(Self::MISSING)
    }
}

fn display_or_missing<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| CandidateProfile::MISSING.to_string())
}

/// Questionnaire position. Vacancy matching runs between `AwaitingShiftType`/`AwaitingShiftTime`
/// and `AwaitingCafeChoice` without waiting for input, so it has no resting stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "stage")]
pub enum IntakeStage {
    AwaitingName,
    AwaitingAge,
    AwaitingPhone,
    AwaitingCity,
    AwaitingShiftType,
    AwaitingShiftTime,
    AwaitingCafeChoice { options: Vec<String> },
}

impl IntakeStage {
    pub const fn label(&self) -> &'static str {
        match self {
            IntakeStage::AwaitingName => "awaiting_name",
            IntakeStage::AwaitingAge => "awaiting_age",
            IntakeStage::AwaitingPhone => "awaiting_phone",
            IntakeStage::AwaitingCity => "awaiting_city",
            IntakeStage::AwaitingShiftType => "awaiting_shift_type",
            IntakeStage::AwaitingShiftTime => "awaiting_shift_time",
            IntakeStage::AwaitingCafeChoice { .. } => "awaiting_cafe_choice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSession {
    pub candidate: CandidateId,
    pub stage: IntakeStage,
    pub profile: CandidateProfile,
    /// Failed attempts at the current stage.
    pub retries: u32,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl CandidateSession {
    pub fn new(candidate: CandidateId, now: DateTime<Utc>) -> Self {
        Self {
            candidate,
            stage: IntakeStage::AwaitingName,
            profile: CandidateProfile::default(),
            retries: 0,
            started_at: now,
            last_activity: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Accepted,
    Rejected,
    NoMatch,
    NoMatchPartial,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::NoMatch => "NO_MATCH",
            ApplicationStatus::NoMatchPartial => "NO_MATCH_PARTIAL",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    Underage,
}

impl RejectionReason {
    pub const fn note(self) -> &'static str {
        match self {
            RejectionReason::Underage => "underage",
        }
    }
}

/// How a questionnaire ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeOutcome {
    Accepted,
    Rejected(RejectionReason),
    NoMatch,
    NoMatchPartial,
}

impl IntakeOutcome {
    pub const fn status(self) -> ApplicationStatus {
        match self {
            IntakeOutcome::Accepted => ApplicationStatus::Accepted,
            IntakeOutcome::Rejected(_) => ApplicationStatus::Rejected,
            IntakeOutcome::NoMatch => ApplicationStatus::NoMatch,
            IntakeOutcome::NoMatchPartial => ApplicationStatus::NoMatchPartial,
        }
    }

    pub const fn note(self) -> Option<&'static str> {
        match self {
            IntakeOutcome::Rejected(reason) => Some(reason.note()),
            IntakeOutcome::NoMatchPartial => Some("no vacancies accept partial shifts"),
            IntakeOutcome::Accepted | IntakeOutcome::NoMatch => None,
        }
    }
}

/// Terminal result handed from the state machine to the service for logging and notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub candidate: CandidateId,
    pub outcome: IntakeOutcome,
    pub profile: CandidateProfile,
}

/// Outbound message for the transport, with optional quick-reply choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(text: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            text: text.into(),
            choices,
        }
    }
}
