use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationStatus, CandidateId, CandidateProfile, Completion, IntakeOutcome,
};

/// Message for the administrator channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminNotice {
    pub candidate: CandidateId,
    pub status: ApplicationStatus,
    pub text: String,
}

impl AdminNotice {
    pub fn from_completion(completion: &Completion) -> Self {
        let profile = &completion.profile;
        let text = match completion.outcome {
            IntakeOutcome::Rejected(reason) => format!(
                "Rejected candidate: {} (age {}, {})",
                profile.name_or_missing(),
                profile.age_or_missing(),
                reason.note()
            ),
            IntakeOutcome::Accepted => format!("New application:\n{}", snapshot(profile)),
            IntakeOutcome::NoMatch => {
                format!("Application without matching vacancies:\n{}", snapshot(profile))
            }
            IntakeOutcome::NoMatchPartial => {
                format!("Application without partial-shift vacancies:\n{}", snapshot(profile))
            }
        };

        Self {
            candidate: completion.candidate.clone(),
            status: completion.outcome.status(),
            text,
        }
    }
}

fn snapshot(profile: &CandidateProfile) -> String {
    format!(
        "Name: {}\nAge: {}\nPhone: {}\nCity: {}\nShift: {}\nShift time: {}\nCafe: {}",
        profile.name_or_missing(),
        profile.age_or_missing(),
        profile.phone_or_missing(),
        profile.city_or_missing(),
        profile.shift_or_missing(),
        profile.shift_window_or_missing(),
        profile.cafe_or_missing(),
    )
}

/// Outbound hook to whoever reviews applications (chat admin, e-mail, ...).
pub trait AdminNotifier: Send + Sync {
    fn notify(&self, notice: AdminNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
