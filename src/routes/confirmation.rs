//! Confirmation endpoints: `POST /nino` and `POST /mobile`.
//!
//! Both routes share one dispatch skeleton; what differs per route is data: a
//! translation function, an update function, and a failure-kind-to-status
//! table. The bodies are taken as raw strings so malformed JSON reaches the
//! validator and comes back as a mapped 400 instead of an extractor rejection.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::app::AppState;
use crate::error::ConfirmError;
use crate::payload::ImagePayload;
use crate::storage::{ImageStore, StorageError};
use crate::validation::{JsonValidator, ValidationError};

/// Fixed error body for every mapped failure; only the status differs.
pub const ERROR_MSG: &str = "Unable to process request";

/// Per-failure-kind status table for one route.
struct FailureStatuses {
    validation: StatusCode,
    encryption: StatusCode,
    io: StatusCode,
    render: StatusCode,
}

/// Everything that distinguishes one confirmation route from the other.
struct RouteSpec {
    /// Subject of the info-level success trace.
    updated: &'static str,
    translate: fn(&JsonValidator, &str) -> Result<ImagePayload, ValidationError>,
    update: fn(&dyn ImageStore, &mut ImagePayload) -> Result<(), StorageError>,
    failures: FailureStatuses,
}

const NINO_ROUTE: RouteSpec = RouteSpec {
    updated: "NINO",
    translate: |validator, raw| validator.translate_nino_confirmation(raw),
    update: |store, payload| store.apply_nino_update(payload),
    failures: FailureStatuses {
        validation: StatusCode::BAD_REQUEST,
        encryption: StatusCode::INTERNAL_SERVER_ERROR,
        io: StatusCode::INTERNAL_SERVER_ERROR,
        render: StatusCode::INTERNAL_SERVER_ERROR,
    },
};

/// The mobile route treats an encryption failure as client-attributable (the
/// sealing step operates on caller-supplied contact data), so it answers 400
/// where `/nino` answers 500. Deliberate per-route behavior; do not unify.
const MOBILE_ROUTE: RouteSpec = RouteSpec {
    updated: "mobile number",
    translate: |validator, raw| validator.translate_mobile_confirmation(raw),
    update: |store, payload| store.apply_mobile_update(payload),
    failures: FailureStatuses {
        validation: StatusCode::BAD_REQUEST,
        encryption: StatusCode::BAD_REQUEST,
        io: StatusCode::INTERNAL_SERVER_ERROR,
        render: StatusCode::INTERNAL_SERVER_ERROR,
    },
};

#[tracing::instrument(skip(state, body), fields(request_bytes = body.len()))]
pub async fn confirm_nino(State(state): State<Arc<AppState>>, body: String) -> Response {
    dispatch(&state, &body, &NINO_ROUTE)
}

#[tracing::instrument(skip(state, body), fields(request_bytes = body.len()))]
pub async fn confirm_mobile(State(state): State<Arc<AppState>>, body: String) -> Response {
    dispatch(&state, &body, &MOBILE_ROUTE)
}

fn dispatch(state: &AppState, raw: &str, route: &RouteSpec) -> Response {
    match run(state, raw, route) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => {
            let (status, kind) = match &err {
                ConfirmError::Validation(_) => (route.failures.validation, "Validation failure"),
                ConfirmError::Encryption(_) => (route.failures.encryption, "Encryption failure"),
                ConfirmError::Io(_) => (route.failures.io, "I/O failure"),
                ConfirmError::Render(_) => (route.failures.render, "Render failure"),
            };
            // Short message at error level; full detail stays at debug.
            tracing::error!("{kind} :: {err}");
            tracing::debug!(error = ?err, "{ERROR_MSG}");
            json_response(status, ERROR_MSG.to_string())
        }
    }
}

/// Translate, update, render. The same payload instance flows through the
/// update and into the view, so storage mutations land in the response.
fn run(state: &AppState, raw: &str, route: &RouteSpec) -> Result<String, ConfirmError> {
    let mut payload = (route.translate)(&state.validator, raw)?;
    tracing::debug!("json validated");

    (route.update)(state.store.as_ref(), &mut payload)?;
    tracing::info!("{} updated", route.updated);

    let body = serde_json::to_string(&payload.session_view())?;
    Ok(body)
}

/// Success and error bodies alike go out as `application/json`; error bodies
/// carry the bare fixed string as the entity, reproduced exactly for
/// compatibility with existing callers.
fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
