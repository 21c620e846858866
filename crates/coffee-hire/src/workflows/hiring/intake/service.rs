use chrono::{DateTime, Duration, Local, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::domain::{CandidateId, CandidateProfile, CandidateSession, Completion, Reply};
use super::journal::{ApplicationLog, ApplicationLogEntry, LogWriteError};
use super::machine::{IntakeMachine, Step};
use super::notifier::{AdminNotice, AdminNotifier};
use super::policy::IntakePolicy;
use super::prompts;
use super::session::SessionStore;
use crate::workflows::hiring::catalog::{CatalogLoadError, VacancyCatalog};
use crate::workflows::hiring::faq::FaqBook;

/// Chat commands understood outside the questionnaire flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Faq,
    UpdateVacancies,
    Unknown,
}

impl Command {
    /// `/start@SomeBot` style suffixes are ignored.
    fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let name = word.split('@').next().unwrap_or(word).to_lowercase();
        Some(match name.as_str() {
            "start" => Self::Start,
            "faq" => Self::Faq,
            "update_vacancies" => Self::UpdateVacancies,
            _ => Self::Unknown,
        })
    }
}

/// Read-only view of a live questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub candidate: CandidateId,
    pub stage: &'static str,
    pub retries: u32,
    pub profile: CandidateProfile,
}

impl From<&CandidateSession> for SessionView {
    fn from(session: &CandidateSession) -> Self {
        Self {
            candidate: session.candidate.clone(),
            stage: session.stage.label(),
            retries: session.retries,
            profile: session.profile.clone(),
        }
    }
}

/// Composes the questionnaire, session store, FAQ, application log and admin channel.
pub struct IntakeService<L, N> {
    machine: IntakeMachine,
    catalog: Arc<VacancyCatalog>,
    faq: Arc<FaqBook>,
    sessions: SessionStore,
    log: Arc<L>,
    notifier: Arc<N>,
    admin: Option<CandidateId>,
    vacancies_path: Option<PathBuf>,
}

impl<L, N> IntakeService<L, N>
where
    L: ApplicationLog + 'static,
    N: AdminNotifier + 'static,
{
    pub fn new(
        catalog: Arc<VacancyCatalog>,
        faq: Arc<FaqBook>,
        log: Arc<L>,
        notifier: Arc<N>,
        policy: IntakePolicy,
    ) -> Self {
        Self {
            machine: IntakeMachine::new(policy, Arc::clone(&catalog)),
            catalog,
            faq,
            sessions: SessionStore::default(),
            log,
            notifier,
            admin: None,
            vacancies_path: None,
        }
    }

    /// Identity allowed to run administrative commands.
    pub fn with_admin(mut self, admin: CandidateId) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Source re-read by `/update_vacancies` and [`IntakeService::reload_catalog`].
    pub fn with_vacancies_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.vacancies_path = Some(path.into());
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.sessions = SessionStore::new(Some(timeout));
        self
    }

    pub fn catalog(&self) -> &VacancyCatalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn handle_message(&self, candidate: &CandidateId, text: &str) -> Vec<Reply> {
        self.handle_message_at(candidate, text, Utc::now())
    }

    pub fn handle_message_at(
        &self,
        candidate: &CandidateId,
        text: &str,
        now: DateTime<Utc>,
    ) -> Vec<Reply> {
        let text = text.trim();

        match Command::parse(text) {
            Some(Command::Start) => self.restart(candidate, now),
            Some(Command::Faq) => vec![Reply::text(
                self.faq
                    .render()
                    .unwrap_or_else(|| prompts::EMPTY_FAQ.to_string()),
            )],
            Some(Command::UpdateVacancies) => vec![self.update_vacancies(candidate)],
            Some(Command::Unknown) => vec![Reply::text(prompts::HELP)],
            None => self.converse(candidate, text, now),
        }
    }

    pub fn session_view(&self, candidate: &CandidateId) -> Option<SessionView> {
        self.sessions
            .get(candidate, Utc::now())
            .as_ref()
            .map(SessionView::from)
    }

    pub fn evict_idle_sessions(&self, now: DateTime<Utc>) -> usize {
        let evicted = self.sessions.evict_idle(now);
        if evicted > 0 {
            info!(evicted, "idle sessions evicted");
        }
        evicted
    }

    pub fn reload_catalog(&self) -> Result<usize, IntakeServiceError> {
        let path = self
            .vacancies_path
            .as_ref()
            .ok_or(IntakeServiceError::NoVacancySource)?;
        let records = self.catalog.reload(path)?;
        info!(path = %path.display(), records, "vacancy catalog reloaded");
        Ok(records)
    }

    fn restart(&self, candidate: &CandidateId, now: DateTime<Utc>) -> Vec<Reply> {
        self.sessions.with_session(candidate, now, |slot| {
            let (session, prompt) = self.machine.begin(candidate.clone(), now);
            *slot = Some(session);
            vec![Reply::text(prompts::GREETING), prompt]
        })
    }

    fn converse(&self, candidate: &CandidateId, text: &str, now: DateTime<Utc>) -> Vec<Reply> {
        self.sessions.with_session(candidate, now, |slot| {
            let Some(session) = slot.as_mut() else {
                if let Some(answer) = self.faq.lookup(text) {
                    return vec![Reply::text(answer)];
                }
                let (session, prompt) = self.machine.begin(candidate.clone(), now);
                *slot = Some(session);
                info!(%candidate, "questionnaire started");
                return vec![Reply::text(prompts::GREETING), prompt];
            };

            match self.machine.step(session, text) {
                Step::Advanced(reply) | Step::Retry { reply, .. } => vec![reply],
                Step::Complete(completion) => {
                    *slot = None;
                    let reply = self.finish(&completion, now).unwrap_or_else(|err| {
                        error!(
                            %candidate,
                            status = %completion.outcome.status(),
                            error = %err,
                            "application could not be recorded"
                        );
                        Reply::text(prompts::GENERIC_FAILURE)
                    });
                    vec![reply]
                }
            }
        })
    }

    /// Record the outcome, then tell the administrator. A failed log write aborts before any
    /// notification goes out.
    fn finish(
        &self,
        completion: &Completion,
        now: DateTime<Utc>,
    ) -> Result<Reply, IntakeServiceError> {
        let recorded_at = now.with_timezone(&Local).naive_local();
        let entry = ApplicationLogEntry::from_completion(recorded_at, completion);
        self.log.append(&entry)?;

        if let Err(err) = self.notifier.notify(AdminNotice::from_completion(completion)) {
            warn!(candidate = %completion.candidate, error = %err, "admin notification failed");
        }

        info!(
            candidate = %completion.candidate,
            status = %completion.outcome.status(),
            "application closed"
        );
        Ok(Reply::text(prompts::outcome(
            completion.outcome,
            self.machine.policy().minimum_age,
        )))
    }

    fn update_vacancies(&self, candidate: &CandidateId) -> Reply {
        if self.admin.as_ref() != Some(candidate) {
            return Reply::text(prompts::ADMIN_ONLY);
        }

        match self.reload_catalog() {
            Ok(records) => Reply::text(format!("Vacancies reloaded: {records} records.")),
            Err(err) => {
                warn!(error = %err, "vacancy reload failed");
                Reply::text(format!("Could not reload vacancies: {err}"))
            }
        }
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(transparent)]
    Log(#[from] LogWriteError),
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    #[error("no vacancy source configured")]
    NoVacancySource,
}
