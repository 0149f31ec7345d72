use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::config::AppConfig;
use crate::error::{ApiError, ErrorReport};

/// The one place failures are logged and finalized.
///
/// Every `ApiError` response carries an [`ErrorReport`]. Server errors are
/// always logged, client errors only outside production, and the debug trace
/// is added to the body as `stack` in development only. Bare error statuses
/// from the router itself (405 on a known path, for one) are rewritten into
/// the envelope first.
pub async fn normalize_errors(
    State(config): State<Arc<AppConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    if is_bare_error(&response) {
        response = envelope_for(response);
    }
    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    if report.status.is_server_error() {
        error!(
            %method,
            %path,
            status = report.status.as_u16(),
            code = report.envelope.code,
            error = %report.trace,
            "Request failed"
        );
    } else if !config.is_production() {
        warn!(
            %method,
            %path,
            status = report.status.as_u16(),
            code = report.envelope.code,
            message = %report.envelope.message,
            "Request rejected"
        );
    }

    if !config.is_development() {
        return response;
    }

    let mut envelope = report.envelope;
    envelope.stack = Some(report.trace);
    let body = match serde_json::to_vec(&envelope) {
        Ok(body) => body,
        Err(_) => return response,
    };
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body))
}

fn is_bare_error(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error())
        && response.extensions().get::<ErrorReport>().is_none()
        && !response.headers().contains_key(header::CONTENT_TYPE)
}

fn envelope_for(bare: Response) -> Response {
    let allow = bare.headers().get(header::ALLOW).cloned();
    let mut response = ApiError::from_status(bare.status()).into_response();
    if let Some(allow) = allow {
        response.headers_mut().insert(header::ALLOW, allow);
    }
    response
}

/// `CatchPanicLayer` hook: a panicking handler becomes an ordinary 500.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}
