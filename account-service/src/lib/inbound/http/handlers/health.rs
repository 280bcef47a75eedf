use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::user::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Backend is running!")
}

pub async fn db_health<S: AccountServicePort>(
    State(state): State<AppState<S>>,
) -> (StatusCode, &'static str) {
    match state.account_service.check_store().await {
        Ok(()) => (StatusCode::OK, "Database is healthy!"),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database not reachable")
        }
    }
}
