// handlers/public/auth.rs - email/password accounts and cookie sessions

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::auth::{clear_cookie, session_cookie, token_from_headers};
use crate::error::ApiError;
use crate::middleware::ValidatedJson;
use crate::services::{SessionInfo, SignedIn};
use crate::state::AppState;
use crate::validation::{SignIn, SignUp};

fn signed_in_response(state: &AppState, status: StatusCode, signed: SignedIn) -> impl IntoResponse {
    let security = &state.config.security;
    let cookie = session_cookie(&signed.token, security.session_ttl_hours, security.secure_cookies);
    (
        status,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({ "user": signed.user })),
    )
}

/// POST /api/auth/sign-up/email - Create an account and sign it in
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignUp>,
) -> Result<impl IntoResponse, ApiError> {
    let signed = state.auth.sign_up(input).await?;
    Ok(signed_in_response(&state, StatusCode::CREATED, signed))
}

/// POST /api/auth/sign-in/email - Open a session for existing credentials
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignIn>,
) -> Result<impl IntoResponse, ApiError> {
    let signed = state.auth.sign_in(input).await?;
    Ok(signed_in_response(&state, StatusCode::OK, signed))
}

/// POST /api/auth/sign-out - Drop the current session, if any
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = token_from_headers(&headers);
    state.auth.sign_out(token.as_deref()).await?;
    let cookie = clear_cookie(state.config.security.secure_cookies);
    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    ))
}

/// GET /api/auth/get-session - `{user, session}` for a live cookie, else `null`
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Option<SessionInfo>>, ApiError> {
    let info = match token_from_headers(&headers) {
        Some(token) => state.auth.resolve(&token).await?,
        None => None,
    };
    Ok(Json(info))
}
