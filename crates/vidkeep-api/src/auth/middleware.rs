use crate::auth::jwt::verify_token;
use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use vidkeep_core::AppError;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
}

/// Authentication middleware: verifies the bearer token and stores the caller
/// identity in request extensions. Runs before any handler touches a resource.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthenticated(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthenticated(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    match verify_token(token, &auth_state.jwt_secret) {
        Ok(user_id) => {
            request.extensions_mut().insert(AuthUser(user_id));
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}
