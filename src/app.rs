//! Router construction for the confirmation HTTP API.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{routes, settings::Settings, storage::ImageStore, validation::JsonValidator};

/// Immutable collaborators shared by the confirmation handlers.
///
/// The handlers themselves hold no mutable state; per-request state lives in
/// the single payload instance for the duration of one call.
pub struct AppState {
    pub validator: JsonValidator,
    pub store: Arc<dyn ImageStore>,
}

pub fn build_router(settings: &Settings, state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/build-info", get(routes::build_info))
        .route("/nino", post(routes::confirm_nino))
        .route("/mobile", post(routes::confirm_mobile))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(settings.body_limit_bytes()))
        .with_state(state)
}
