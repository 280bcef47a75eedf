use std::sync::Arc;

use auth::AuthError;
use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;

/// Verified identity of the caller, valid for the current request only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates the bearer token and adds the caller's identity
/// to request extensions. Any failure ends the request with 401; the protected
/// handler is not called.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user_id = authenticator.authorize(authorization).map_err(|e| {
        tracing::warn!(error = %e, "Rejected request to protected route");
        unauthorized(&e)
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(user_id),
    });

    Ok(next.run(req).await)
}

fn unauthorized(err: &AuthError) -> ApiError {
    let message = match err {
        AuthError::MissingCredential => "Missing or invalid Authorization header",
        AuthError::Malformed(_)
        | AuthError::UnexpectedAlgorithm(_)
        | AuthError::InvalidSignature
        | AuthError::Expired => "Invalid or expired token",
    };
    ApiError::Unauthorized(message.to_string())
}
