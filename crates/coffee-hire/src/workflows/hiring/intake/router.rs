use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CandidateId, Reply};
use super::journal::ApplicationLog;
use super::notifier::AdminNotifier;
use super::service::{IntakeService, IntakeServiceError};
use crate::workflows::hiring::catalog::{ShiftPeriod, VacancyRecord};

/// Inbound chat message relayed by a transport adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InboundMessage {
    pub identity: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageReplies {
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VacancyQuery {
    pub city: String,
    pub shift: ShiftPeriod,
    #[serde(default)]
    pub partial: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VacancyListing {
    pub city: String,
    pub shift: ShiftPeriod,
    pub partial: bool,
    pub vacancies: Vec<VacancyRecord>,
}

/// Router builder exposing the chat intake and vacancy catalog over HTTP.
pub fn intake_router<L, N>(service: Arc<IntakeService<L, N>>) -> Router
where
    L: ApplicationLog + 'static,
    N: AdminNotifier + 'static,
{
    Router::new()
        .route("/api/v1/intake/messages", post(message_handler::<L, N>))
        .route(
            "/api/v1/intake/sessions/:identity",
            get(session_handler::<L, N>),
        )
        .route("/api/v1/vacancies", get(vacancies_handler::<L, N>))
        .route(
            "/api/v1/admin/vacancies/reload",
            post(reload_handler::<L, N>),
        )
        .with_state(service)
}

pub(crate) async fn message_handler<L, N>(
    State(service): State<Arc<IntakeService<L, N>>>,
    axum::Json(message): axum::Json<InboundMessage>,
) -> Response
where
    L: ApplicationLog + 'static,
    N: AdminNotifier + 'static,
{
    let identity = message.identity.trim();
    if identity.is_empty() {
        let payload = json!({
            "error": "identity must not be empty",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    let candidate = CandidateId::new(identity);
    let replies = service.handle_message(&candidate, &message.text);
    (StatusCode::OK, axum::Json(MessageReplies { replies })).into_response()
}

pub(crate) async fn session_handler<L, N>(
    State(service): State<Arc<IntakeService<L, N>>>,
    Path(identity): Path<String>,
) -> Response
where
    L: ApplicationLog + 'static,
    N: AdminNotifier + 'static,
{
    let candidate = CandidateId::new(identity);
    match service.session_view(&candidate) {
        Some(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        None => {
            let payload = json!({
                "identity": candidate.0,
                "error": "no active session",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn vacancies_handler<L, N>(
    State(service): State<Arc<IntakeService<L, N>>>,
    Query(query): Query<VacancyQuery>,
) -> Response
where
    L: ApplicationLog + 'static,
    N: AdminNotifier + 'static,
{
    let vacancies = service
        .catalog()
        .query(&query.city, query.shift, query.partial);
    let listing = VacancyListing {
        city: query.city,
        shift: query.shift,
        partial: query.partial,
        vacancies,
    };
    (StatusCode::OK, axum::Json(listing)).into_response()
}

pub(crate) async fn reload_handler<L, N>(
    State(service): State<Arc<IntakeService<L, N>>>,
) -> Response
where
    L: ApplicationLog + 'static,
    N: AdminNotifier + 'static,
{
    match service.reload_catalog() {
        Ok(records) => (StatusCode::OK, axum::Json(json!({ "records": records }))).into_response(),
        Err(IntakeServiceError::NoVacancySource) => {
            let payload = json!({
                "error": IntakeServiceError::NoVacancySource.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(IntakeServiceError::Catalog(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "records": service.catalog().len(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
