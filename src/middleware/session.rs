use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{token_from_headers, Actor};
use crate::error::ApiError;
use crate::state::AppState;

/// Gate for every protected route: resolve the session cookie into an
/// [`Actor`] request extension or stop with 401 before any handler runs.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let info = state
        .auth
        .resolve(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Session expired or invalid"))?;

    request.extensions_mut().insert(Actor::from(&info.user));
    Ok(next.run(request).await)
}
