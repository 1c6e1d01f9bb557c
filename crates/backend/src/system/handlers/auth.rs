use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use contracts::system::auth::{LoginRequest, SignupRequest, UserInfo};
use contracts::system::users::{UpdateProfileDto, User};
use serde_json::json;

use crate::shared::error::AppError;
use crate::system::auth::{cookie, extractor::CurrentUser, jwt};
use crate::system::users::service as user_service;
use crate::AppState;

/// Session cookie for a freshly authenticated user
fn session_headers(state: &AppState, user: &User) -> Result<HeaderMap, AppError> {
    let token = jwt::generate_session_token(
        &state.jwt_secret,
        &user.id,
        &user.email,
        state.config.auth.session_hours,
    )?;
    let cookie = cookie::session_cookie(&state.config.auth, &token)
        .ok_or_else(|| anyhow::anyhow!("Session cookie is not a valid header value"))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);
    Ok(headers)
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::signup(&state.db, request).await?;
    let headers = session_headers(&state, &user)?;
    Ok((StatusCode::CREATED, headers, Json(user.info())))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::verify_credentials(&state.db, &request.email, &request.password).await?;
    let headers = session_headers(&state, &user)?;
    tracing::info!("User {} logged in", user.email);
    Ok((headers, Json(user.info())))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cookie = cookie::clear_session_cookie(&state.config.auth)
        .ok_or_else(|| anyhow::anyhow!("Session cookie is not a valid header value"))?;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);
    Ok((headers, Json(json!({ "message": "Logged out successfully" }))))
}

/// GET /api/auth/user
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserInfo>, AppError> {
    let user = user_service::get_by_id(&state.db, &claims.sub)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized,
            other => other,
        })?;
    Ok(Json(user.info()))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<UpdateProfileDto>,
) -> Result<Json<UserInfo>, AppError> {
    let user = user_service::update_profile(&state.db, &claims.sub, dto).await?;
    Ok(Json(user.info()))
}
