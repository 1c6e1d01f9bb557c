use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::{cookie, jwt};
use crate::shared::error::AppError;
use crate::AppState;

/// Middleware that requires a valid session token (cookie or bearer)
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = cookie::session_token(req.headers(), &state.config.auth.cookie_name)
        .ok_or(AppError::Unauthorized)?;

    let claims = jwt::validate_token(&state.jwt_secret, &token).map_err(|e| {
        tracing::debug!("Rejected session token: {:#}", e);
        AppError::Unauthorized
    })?;

    // Claims are read back by the `CurrentUser` extractor
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
