use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service descriptor
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "VetClinic API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": ["/api/auth/sign-up/email", "/api/auth/sign-in/email", "/api/auth/sign-out", "/api/auth/get-session"],
            "pets": ["/api/pets", "/api/pets/me", "/api/pets/:id"],
            "locations": ["/api/locations", "/api/locations/:id"],
            "professionals": ["/api/professionals", "/api/professionals/:id"],
            "appointments": ["/api/appointments", "/api/appointments/me", "/api/appointments/:id"]
        }
    }))
}

/// GET /health - Liveness plus a database ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (status, database) = match &state.db {
        Some(db) => match db.health_check().await {
            Ok(()) => (StatusCode::OK, "connected"),
            Err(e) => {
                tracing::error!("Health check failed: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "unreachable")
            }
        },
        None => (StatusCode::OK, "not configured"),
    };

    let body = json!({
        "success": status == StatusCode::OK,
        "data": {
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "database": database,
        }
    });
    (status, Json(body))
}

/// Anything unrouted.
pub async fn fallback() -> crate::error::ApiError {
    crate::error::ApiError::not_found("Route not found")
}
