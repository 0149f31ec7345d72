// handlers/protected/locations.rs - /api/locations

use axum::extract::{Path, State};
use serde_json::Value;

use crate::auth::Actor;
use crate::database::models::Location;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use crate::validation::{CreateLocation, LocationQuery, UpdateLocation};

/// GET /api/locations - All clinic locations, filtered by name and city
pub async fn list(
    State(state): State<AppState>,
    _actor: Actor,
    ValidatedQuery(filters): ValidatedQuery<LocationQuery>,
) -> ApiResult<Value> {
    let locations = state.locations.list(filters).await?;
    ApiResponse::list("locations", locations)
}

/// POST /api/locations - Administrators only
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(input): ValidatedJson<CreateLocation>,
) -> ApiResult<Location> {
    let location = state.locations.create(&actor, input).await?;
    Ok(ApiResponse::created(location))
}

/// PATCH /api/locations/:id - Administrators only
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdateLocation>,
) -> ApiResult<Location> {
    let location = state.locations.update(&actor, &id, patch).await?;
    Ok(ApiResponse::success(location))
}

/// DELETE /api/locations/:id - Administrators only
pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.locations.delete(&actor, &id).await?;
    Ok(ApiResponse::deleted("Location"))
}
