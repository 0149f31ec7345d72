use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::ApiError;

/// Successful handler output. The body is the serialized payload as-is;
/// errors never travel through here.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            data,
            status_code: StatusCode::CREATED,
        }
    }
}

impl ApiResponse<Value> {
    /// `{"<key>": [...]}`
    pub fn list<I: Serialize>(key: &str, items: Vec<I>) -> Result<Self, ApiError> {
        let items = serde_json::to_value(items).map_err(ApiError::internal)?;
        let mut body = Map::new();
        body.insert(key.to_string(), items);
        Ok(Self::success(Value::Object(body)))
    }

    /// `{"message": "Pet successfully deleted."}`
    pub fn deleted(kind: &str) -> Self {
        Self::success(json!({ "message": format!("{} successfully deleted.", kind) }))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.data) {
            Ok(value) => (self.status_code, Json(value)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::internal(e).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
