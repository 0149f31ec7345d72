// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::database::{ConflictKind, DatabaseError};

/// One offending field in a rejected payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every failure the request pipeline can raise. The set is closed: anything
/// that does not fit one of the client-facing kinds is `Internal`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    InvalidJson(String),
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 409 Conflict
    Conflict {
        kind: ConflictKind,
        message: String,
    },

    // 500 Internal Server Error
    Internal(anyhow::Error),
}

/// Wire shape shared by every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Attached to error responses so the normalizer middleware can log them and
/// decorate the body without re-deriving anything from the raw error.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub envelope: ErrorEnvelope,
    pub trace: String,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidJson(msg) => msg.clone(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Forbidden(msg) => msg.clone(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::MethodNotAllowed(msg) => msg.clone(),
            ApiError::Conflict { message, .. } => message.clone(),
            // Internal details never reach the client
            ApiError::Internal(_) => "Internal Server Error".to_string(),
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let details = match self {
            ApiError::Validation { details, .. } => Some(details.clone()),
            _ => None,
        };
        ErrorEnvelope {
            success: false,
            code: self.error_code(),
            message: self.message(),
            details,
            stack: None,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.envelope()).unwrap_or(Value::Null)
    }
}

// Static constructor methods
impl ApiError {
    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(kind: ConflictKind, message: impl Into<String>) -> Self {
        ApiError::Conflict {
            kind,
            message: message.into(),
        }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal(err.into())
    }

    /// Stand-in for an error status produced below the handlers (router,
    /// body limit) without an `ApiError` behind it.
    pub fn from_status(status: StatusCode) -> Self {
        let reason = status.canonical_reason().unwrap_or("Request failed");
        match status {
            StatusCode::UNAUTHORIZED => ApiError::unauthorized("Authentication required"),
            StatusCode::FORBIDDEN => ApiError::forbidden(reason),
            StatusCode::NOT_FOUND => ApiError::not_found("Route not found"),
            StatusCode::METHOD_NOT_ALLOWED => ApiError::MethodNotAllowed("Method not allowed".into()),
            s if s.is_client_error() => ApiError::invalid_json(reason),
            s => ApiError::internal(anyhow::anyhow!("upstream responded {}", s)),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Conflict { kind, .. } => {
                let message = match kind {
                    ConflictKind::Unique => "Resource already exists",
                    ConflictKind::ForeignKey => "Operation violates a reference to another resource",
                };
                ApiError::conflict(kind, message)
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for field '{}'", field));
                    FieldError::new(camel_case(field), message)
                })
            })
            .collect();
        // field_errors() is backed by a HashMap
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::validation("Validation failed", details)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON that does not fit the target type: wrong type,
            // unknown enum variant, missing field
            JsonRejection::JsonDataError(e) => {
                let detail = field_error_from_serde(&e.body_text(), "body");
                ApiError::validation("Validation failed", vec![detail])
            }
            JsonRejection::JsonSyntaxError(_) => ApiError::invalid_json("Malformed JSON body"),
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::invalid_json("Expected request with `Content-Type: application/json`")
            }
            other => ApiError::invalid_json(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        let detail = field_error_from_serde(&rejection.body_text(), "query");
        ApiError::validation("Validation failed, invalid filters", vec![detail])
    }
}

/// Serde errors surfaced by axum read like
/// `Failed to deserialize ...: species: unknown variant ...`. Pull the field
/// path out when there is one.
fn field_error_from_serde(text: &str, fallback_field: &str) -> FieldError {
    let body = text.split_once(": ").map(|(_, rest)| rest).unwrap_or(text);
    let (path, message) = match body.split_once(": ") {
        Some((path, message)) if is_field_path(path) => (Some(path), message),
        _ => (None, body),
    };
    // serde reports absent required fields at the parent's path
    if let Some(missing) = missing_field_name(message) {
        let field = match path {
            Some(parent) => format!("{}.{}", parent, missing),
            None => missing.to_string(),
        };
        return FieldError::new(field, format!("{} is required", missing));
    }
    FieldError::new(path.unwrap_or(fallback_field), message)
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path != "."
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split_once('`').map(|(name, _)| name)
}

/// Validation keys come from Rust field names; clients speak camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Internal(err) => write!(f, "{}", err),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let envelope = self.envelope();
        let report = ErrorReport {
            status,
            envelope: envelope.clone(),
            trace: format!("{:?}", self),
        };
        let mut response = (status, Json(envelope)).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
