use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::hiring::catalog::VacancyCatalog;
use crate::workflows::hiring::faq::{FaqBook, FaqEntry};
use crate::workflows::hiring::intake::{
    AdminNotice, AdminNotifier, ApplicationLog, ApplicationLogEntry, CandidateId, IntakePolicy,
    IntakeService, LogWriteError, NotifyError, Reply,
};

pub(super) const SHEET: &str = "Город,День,Ночь,Кофейня,Адрес,Неполный\n\
Vladivostok,2,0,Harbour,Svetlanskaya 1,no\n\
Vladivostok,1,1,Campus,Russky Island 3,yes\n\
Artem,0,1,Station,Kirova 5,no\n\
Nakhodka,1,0,Bay,Lenina 8,no\n";

pub(super) fn catalog() -> Arc<VacancyCatalog> {
    Arc::new(VacancyCatalog::from_reader(Cursor::new(SHEET)).expect("sheet parses"))
}

pub(super) fn faq() -> Arc<FaqBook> {
    Arc::new(FaqBook::new(vec![
        FaqEntry {
            question: "salary".to_string(),
            answer: "From 250 per hour.".to_string(),
        },
        FaqEntry {
            question: "uniform".to_string(),
            answer: "We provide an apron.".to_string(),
        },
    ]))
}

pub(super) fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) type TestService = IntakeService<MemoryLog, MemoryNotifier>;

pub(super) fn build_service() -> (TestService, Arc<MemoryLog>, Arc<MemoryNotifier>) {
    let log = Arc::new(MemoryLog::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = IntakeService::new(
        catalog(),
        faq(),
        log.clone(),
        notifier.clone(),
        IntakePolicy::default(),
    );
    (service, log, notifier)
}

/// Send each message in order and return the replies to the last one.
pub(super) fn converse<L, N>(
    service: &IntakeService<L, N>,
    candidate: &CandidateId,
    messages: &[&str],
) -> Vec<Reply>
where
    L: ApplicationLog + 'static,
    N: AdminNotifier + 'static,
{
    let mut last = Vec::new();
    for (minute, message) in messages.iter().enumerate() {
        last = service.handle_message_at(candidate, message, at(minute as u32));
    }
    last
}

#[derive(Default)]
pub(super) struct MemoryLog {
    entries: Mutex<Vec<ApplicationLogEntry>>,
}

impl MemoryLog {
    pub(super) fn entries(&self) -> Vec<ApplicationLogEntry> {
        self.entries.lock().expect("log mutex poisoned").clone()
    }
}

impl ApplicationLog for MemoryLog {
    fn append(&self, entry: &ApplicationLogEntry) -> Result<(), LogWriteError> {
        self.entries
            .lock()
            .expect("log mutex poisoned")
            .push(entry.clone());
        Ok(())
    }
}

pub(super) struct FailingLog;

impl ApplicationLog for FailingLog {
    fn append(&self, _entry: &ApplicationLogEntry) -> Result<(), LogWriteError> {
        Err(LogWriteError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<AdminNotice>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<AdminNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl AdminNotifier for MemoryNotifier {
    fn notify(&self, notice: AdminNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl AdminNotifier for OfflineNotifier {
    fn notify(&self, _notice: AdminNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("admin chat unreachable".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
