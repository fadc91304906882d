//! Confirmation Service - image submission confirmation HTTP API
//!
//! Accepts NINO and mobile-number confirmations for previously-uploaded image
//! sessions, sealing and persisting each confirmed value.

use std::sync::Arc;

use confirmation_service::{
    app::{build_router, AppState},
    settings::Settings,
    storage::{random_master_key, EncryptedStore},
    telemetry,
    validation::JsonValidator,
};

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let settings = Settings::from_env();
    if let Err(message) = settings.validate() {
        tracing::error!("{message}");
        std::process::exit(1);
    }

    let master_key = settings.master_key().unwrap_or_else(|| {
        tracing::warn!(
            "CONFIRM_MASTER_KEY not set; sealing with an ephemeral key that will not survive restart"
        );
        random_master_key()
    });

    let store = match EncryptedStore::open(settings.db_path(), &master_key) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!("Failed to open confirmation store: {err}");
            std::process::exit(1);
        }
    };
    tracing::info!(path = %settings.db_path().display(), "Confirmation store ready");

    let state = Arc::new(AppState {
        validator: JsonValidator::new(),
        store: Arc::new(store),
    });
    let app = build_router(&settings, state);

    let addr = settings.socket_addr();
    tracing::info!("Confirmation service listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");

    telemetry::shutdown_tracing();
}
