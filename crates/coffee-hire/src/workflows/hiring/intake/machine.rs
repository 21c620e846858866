use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use super::domain::{
    CandidateId, CandidateSession, Completion, IntakeOutcome, IntakeStage, RejectionReason, Reply,
};
use super::policy::{self, IntakePolicy, ValidationError};
use super::prompts;
use super::shift_window::parse_shift_window;
use crate::workflows::hiring::catalog::VacancyCatalog;

/// Result of feeding one inbound message to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Input accepted; the session moved to its next stage.
    Advanced(Reply),
    /// Input rejected; the session stays on the same stage.
    Retry {
        error: ValidationError,
        reply: Reply,
    },
    /// Questionnaire finished; the session must be discarded.
    Complete(Completion),
}

/// Transition rules for the questionnaire. Holds no per-candidate state.
pub struct IntakeMachine {
    policy: IntakePolicy,
    catalog: Arc<VacancyCatalog>,
}

impl IntakeMachine {
    pub fn new(policy: IntakePolicy, catalog: Arc<VacancyCatalog>) -> Self {
        Self { policy, catalog }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    pub fn begin(&self, candidate: CandidateId, now: DateTime<Utc>) -> (CandidateSession, Reply) {
        (
            CandidateSession::new(candidate, now),
            Reply::text(prompts::ASK_NAME),
        )
    }

    pub fn step(&self, session: &mut CandidateSession, input: &str) -> Step {
        let step = match session.stage {
            IntakeStage::AwaitingName => self.accept_name(session, input),
            IntakeStage::AwaitingAge => self.accept_age(session, input),
            IntakeStage::AwaitingPhone => self.accept_phone(session, input),
            IntakeStage::AwaitingCity => self.accept_city(session, input),
            IntakeStage::AwaitingShiftType => self.accept_shift_type(session, input),
            IntakeStage::AwaitingShiftTime => self.accept_shift_time(session, input),
            IntakeStage::AwaitingCafeChoice { .. } => self.accept_cafe(session, input),
        };

        match &step {
            Step::Retry { error, .. } => {
                debug!(
                    candidate = %session.candidate,
                    stage = session.stage.label(),
                    retries = session.retries,
                    %error,
                    "answer rejected"
                );
            }
            Step::Advanced(_) => {
                debug!(
                    candidate = %session.candidate,
                    stage = session.stage.label(),
                    "questionnaire advanced"
                );
            }
            Step::Complete(completion) => {
                debug!(
                    candidate = %session.candidate,
                    status = %completion.outcome.status(),
                    "questionnaire complete"
                );
            }
        }

        step
    }

    fn accept_name(&self, session: &mut CandidateSession, input: &str) -> Step {
        match policy::require_text("full name", input) {
            Ok(name) => {
                session.profile.full_name = Some(name);
                advance(session, IntakeStage::AwaitingAge, Reply::text(prompts::ASK_AGE))
            }
            Err(error) => self.retry(session, error, Vec::new()),
        }
    }

    fn accept_age(&self, session: &mut CandidateSession, input: &str) -> Step {
        let age = match policy::parse_age(input) {
            Ok(age) => age,
            Err(error) => return self.retry(session, error, Vec::new()),
        };

        if age < self.policy.minimum_age {
            let mut profile = session.profile.clone();
            profile.age = Some(age);
            return Step::Complete(Completion {
                candidate: session.candidate.clone(),
                outcome: IntakeOutcome::Rejected(RejectionReason::Underage),
                profile,
            });
        }

        session.profile.age = Some(age);
        advance(
            session,
            IntakeStage::AwaitingPhone,
            Reply::text(prompts::ASK_PHONE),
        )
    }

    fn accept_phone(&self, session: &mut CandidateSession, input: &str) -> Step {
        match policy::require_text("phone", input) {
            Ok(phone) => {
                session.profile.phone = Some(phone);
                advance(
                    session,
                    IntakeStage::AwaitingCity,
                    Reply::with_choices(prompts::ASK_CITY, self.policy.cities.clone()),
                )
            }
            Err(error) => self.retry(session, error, Vec::new()),
        }
    }

    fn accept_city(&self, session: &mut CandidateSession, input: &str) -> Step {
        match policy::require_text("city", input) {
            Ok(city) => {
                session.profile.city = Some(city);
                advance(
                    session,
                    IntakeStage::AwaitingShiftType,
                    Reply::with_choices(prompts::ASK_SHIFT, IntakePolicy::shift_choices()),
                )
            }
            Err(error) => self.retry(session, error, self.policy.cities.clone()),
        }
    }

    fn accept_shift_type(&self, session: &mut CandidateSession, input: &str) -> Step {
        let preference = match policy::parse_shift_preference(input) {
            Ok(preference) => preference,
            Err(error) => return self.retry(session, error, IntakePolicy::shift_choices()),
        };

        session.profile.shift = Some(preference);
        if preference.partial {
            return advance(
                session,
                IntakeStage::AwaitingShiftTime,
                Reply::text(prompts::ASK_SHIFT_TIME),
            );
        }

        self.match_vacancies(session)
    }

    fn accept_shift_time(&self, session: &mut CandidateSession, input: &str) -> Step {
        let window = match parse_shift_window(input) {
            Ok(window) => window,
            Err(error) => return self.retry(session, error.into(), Vec::new()),
        };

        let minutes = window.duration_minutes();
        let minimum = self.policy.minimum_shift_minutes;
        if i64::from(minutes) < i64::from(minimum) {
            return self.retry(
                session,
                ValidationError::ShiftTooShort { minutes, minimum },
                Vec::new(),
            );
        }

        session.profile.shift_window = Some(window);
        self.match_vacancies(session)
    }

    /// Runs as soon as the shift answers are complete; no input is consumed.
    fn match_vacancies(&self, session: &mut CandidateSession) -> Step {
        let (Some(city), Some(shift)) = (session.profile.city.clone(), session.profile.shift)
        else {
            // Unreachable through `step`: city and shift are collected before matching.
            return Step::Complete(Completion {
                candidate: session.candidate.clone(),
                outcome: IntakeOutcome::NoMatch,
                profile: session.profile.clone(),
            });
        };

        let matches = self.catalog.query(&city, shift.period, shift.partial);
        if matches.is_empty() {
            let outcome = if shift.partial {
                IntakeOutcome::NoMatchPartial
            } else {
                IntakeOutcome::NoMatch
            };
            return Step::Complete(Completion {
                candidate: session.candidate.clone(),
                outcome,
                profile: session.profile.clone(),
            });
        }

        let options: Vec<String> = matches
            .iter()
            .map(|record| record.display_label())
            .collect();
        let reply = Reply::with_choices(prompts::vacancy_list(&city, &options), options.clone());
        advance(session, IntakeStage::AwaitingCafeChoice { options }, reply)
    }

    fn accept_cafe(&self, session: &mut CandidateSession, input: &str) -> Step {
        match policy::require_text("cafe", input) {
            Ok(cafe) => {
                let mut profile = session.profile.clone();
                profile.cafe = Some(cafe);
                Step::Complete(Completion {
                    candidate: session.candidate.clone(),
                    outcome: IntakeOutcome::Accepted,
                    profile,
                })
            }
            Err(error) => {
                let options = match &session.stage {
                    IntakeStage::AwaitingCafeChoice { options } => options.clone(),
                    _ => Vec::new(),
                };
                self.retry(session, error, options)
            }
        }
    }

    fn retry(
        &self,
        session: &mut CandidateSession,
        error: ValidationError,
        choices: Vec<String>,
    ) -> Step {
        session.retries += 1;
        let text = prompts::retry(&error, self.policy.minimum_age);
        Step::Retry {
            error,
            reply: Reply::with_choices(text, choices),
        }
    }
}

fn advance(session: &mut CandidateSession, next: IntakeStage, reply: Reply) -> Step {
    session.stage = next;
    session.retries = 0;
    Step::Advanced(reply)
}
