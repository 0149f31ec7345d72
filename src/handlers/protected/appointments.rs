// handlers/protected/appointments.rs - /api/appointments

use axum::extract::{Path, State};
use serde_json::Value;

use crate::auth::Actor;
use crate::database::models::Appointment;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use crate::validation::{AppointmentQuery, CreateAppointment, UpdateAppointment};

/// GET /api/appointments/me - Appointments of the caller's pets
pub async fn list_mine(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedQuery(filters): ValidatedQuery<AppointmentQuery>,
) -> ApiResult<Value> {
    let appointments = state.appointments.list_for_actor(&actor, filters).await?;
    ApiResponse::list("appointments", appointments)
}

/// GET /api/appointments - Every appointment (administrators)
pub async fn list(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedQuery(filters): ValidatedQuery<AppointmentQuery>,
) -> ApiResult<Value> {
    let appointments = state.appointments.list_all(&actor, filters).await?;
    ApiResponse::list("appointments", appointments)
}

/// POST /api/appointments - Book for one of the caller's pets
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    ValidatedJson(input): ValidatedJson<CreateAppointment>,
) -> ApiResult<Appointment> {
    let appointment = state.appointments.create(&actor, input).await?;
    Ok(ApiResponse::created(appointment))
}

/// PATCH /api/appointments/:id - Administrators only; the way statuses change
pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdateAppointment>,
) -> ApiResult<Appointment> {
    let appointment = state.appointments.update(&actor, &id, patch).await?;
    Ok(ApiResponse::success(appointment))
}

/// DELETE /api/appointments/:id - Pet owner or administrator
pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.appointments.delete(&actor, &id).await?;
    Ok(ApiResponse::deleted("Appointment"))
}
