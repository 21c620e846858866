use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState, OutboxNotifier};
use crate::routes::with_bot_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use coffee_hire::config::AppConfig;
use coffee_hire::error::AppError;
use coffee_hire::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let outbox = OutboxNotifier::default();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        outbox: outbox.clone(),
    };

    let service = Arc::new(build_service(&config.hiring, outbox));

    if config.hiring.session_idle_minutes.is_some() {
        let sweeper = Arc::clone(&service);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(IDLE_SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                sweeper.evict_idle_sessions(Utc::now());
            }
        });
    }

    let app = with_bot_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hiring bot ready");

    axum::serve(listener, app).await?;
    Ok(())
}
