// handlers/protected/pets.rs - /api/pets

use axum::extract::{Path, State};
use serde_json::Value;

use crate::auth::Actor;
use crate::database::models::Pet;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use crate::validation::{CreatePet, PetQuery, UpdatePet};

/// GET /api/pets/me - The caller's pets, filtered by name, species, breed
pub async fn list_mine(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedQuery(filters): ValidatedQuery<PetQuery>,
) -> ApiResult<Value> {
    let pets = state.pets.list_for_actor(&actor, filters).await?;
    ApiResponse::list("pets", pets)
}

/// GET /api/pets - Every owner's pets (administrators)
pub async fn list(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedQuery(filters): ValidatedQuery<PetQuery>,
) -> ApiResult<Value> {
    let pets = state.pets.list_all(&actor, filters).await?;
    ApiResponse::list("pets", pets)
}

/// POST /api/pets - Register a pet owned by the caller
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(input): ValidatedJson<CreatePet>,
) -> ApiResult<Pet> {
    let pet = state.pets.create(&actor, input).await?;
    Ok(ApiResponse::created(pet))
}

/// PATCH /api/pets/:id - Owner or administrator
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdatePet>,
) -> ApiResult<Pet> {
    let pet = state.pets.update(&actor, &id, patch).await?;
    Ok(ApiResponse::success(pet))
}

/// DELETE /api/pets/:id - Owner or administrator
pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.pets.delete(&actor, &id).await?;
    Ok(ApiResponse::deleted("Pet"))
}
