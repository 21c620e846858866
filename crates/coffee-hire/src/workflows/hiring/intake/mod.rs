//! Candidate questionnaire: per-identity sessions, validation rules, the transition machine,
//! and the collaborators that receive finished applications.
//!
//! [`IntakeService`] is the entry point for transports. It owns the session store, consults the
//! FAQ for idle identities, drives [`IntakeMachine`] for active ones, and on completion writes the
//! [`ApplicationLog`] row before handing an [`AdminNotice`] to the [`AdminNotifier`].

pub mod domain;
pub mod journal;
pub mod machine;
pub mod notifier;
pub mod policy;
pub(crate) mod prompts;
pub mod router;
pub mod service;
pub mod session;
pub mod shift_window;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationStatus, CandidateId, CandidateProfile, CandidateSession, Completion, IntakeOutcome,
    IntakeStage, RejectionReason, Reply, ShiftPreference,
};
pub use journal::{
    ApplicationLog, ApplicationLogEntry, CsvApplicationLog, LogWriteError, LOG_HEADER,
};
pub use machine::{IntakeMachine, Step};
pub use notifier::{AdminNotice, AdminNotifier, NotifyError};
pub use policy::{IntakePolicy, ValidationError};
pub use router::{intake_router, InboundMessage, MessageReplies, VacancyListing, VacancyQuery};
pub use service::{IntakeService, IntakeServiceError, SessionView};
pub use session::SessionStore;
pub use shift_window::{parse_shift_window, ShiftWindow, ShiftWindowFormatError};
