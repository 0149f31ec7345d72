// handlers/protected/professionals.rs - /api/professionals

use axum::extract::{Path, State};
use serde_json::Value;

use crate::auth::Actor;
use crate::database::models::Professional;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use crate::validation::{CreateProfessional, ProfessionalQuery, UpdateProfessional};

/// GET /api/professionals - All professionals, filtered by name, specialty, active
pub async fn list(
    State(state): State<AppState>,
    _actor: Actor,
    ValidatedQuery(filters): ValidatedQuery<ProfessionalQuery>,
) -> ApiResult<Value> {
    let professionals = state.professionals.list(filters).await?;
    ApiResponse::list("professionals", professionals)
}

/// POST /api/professionals - Administrators only
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(input): ValidatedJson<CreateProfessional>,
) -> ApiResult<Professional> {
    let professional = state.professionals.create(&actor, input).await?;
    Ok(ApiResponse::created(professional))
}

/// PATCH /api/professionals/:id - Administrators only
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdateProfessional>,
) -> ApiResult<Professional> {
    let professional = state.professionals.update(&actor, &id, patch).await?;
    Ok(ApiResponse::success(professional))
}

/// DELETE /api/professionals/:id - Administrators only
pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.professionals.delete(&actor, &id).await?;
    Ok(ApiResponse::deleted("Professional"))
}
