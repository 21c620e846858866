use coffee_hire::config::HiringConfig;
use coffee_hire::workflows::hiring::intake::{
    AdminNotice, AdminNotifier, CandidateId, CsvApplicationLog, IntakePolicy, IntakeService,
    NotifyError,
};
use coffee_hire::workflows::hiring::{FaqBook, ShiftPeriod, VacancyCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) type BotService = IntakeService<CsvApplicationLog, OutboxNotifier>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) outbox: OutboxNotifier,
}

/// Holds administrator notices until an operator or chat adapter drains them.
#[derive(Default, Clone)]
pub(crate) struct OutboxNotifier {
    notices: Arc<Mutex<Vec<AdminNotice>>>,
}

impl AdminNotifier for OutboxNotifier {
    fn notify(&self, notice: AdminNotice) -> Result<(), NotifyError> {
        info!(candidate = %notice.candidate, status = %notice.status, "admin notice queued");
        let mut guard = self.notices.lock().expect("outbox mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl OutboxNotifier {
    pub(crate) fn drain(&self) -> Vec<AdminNotice> {
        std::mem::take(&mut *self.notices.lock().expect("outbox mutex poisoned"))
    }
}

/// Wire the intake service from configured data files.
pub(crate) fn build_service(config: &HiringConfig, outbox: OutboxNotifier) -> BotService {
    let catalog = Arc::new(VacancyCatalog::load(&config.vacancies_path));
    let faq = Arc::new(FaqBook::load(&config.faq_path));
    let log = Arc::new(CsvApplicationLog::new(&config.application_log_path));

    let mut service = IntakeService::new(
        catalog,
        faq,
        log,
        Arc::new(outbox),
        IntakePolicy::from_config(config),
    )
    .with_vacancies_path(&config.vacancies_path);

    if let Some(admin) = &config.admin_id {
        service = service.with_admin(CandidateId::new(admin.as_str()));
    }
    if let Some(minutes) = config.session_idle_minutes {
        service = service.with_idle_timeout(chrono::Duration::minutes(i64::from(minutes)));
    }
    service
}

pub(crate) fn parse_shift(raw: &str) -> Result<ShiftPeriod, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "day" => Ok(ShiftPeriod::Day),
        "night" => Ok(ShiftPeriod::Night),
        other => Err(format!("unknown shift '{other}' (expected day or night)")),
    }
}
