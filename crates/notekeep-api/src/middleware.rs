//! Request middleware.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorBody, BODY_TOO_LARGE, METHOD_NOT_ALLOWED};

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Rewrap the bare 405 from method routing and the plain-text 413 from the
/// body limit layer in the failure envelope.
///
/// Other headers (notably `Allow`) are kept.
pub async fn envelope_bare_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let message = match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => METHOD_NOT_ALLOWED,
        StatusCode::PAYLOAD_TOO_LARGE => BODY_TOO_LARGE,
        _ => return response,
    };
    if is_json(&response) {
        return response;
    }

    tracing::debug!(
        subsystem = "api",
        component = "middleware",
        status = response.status().as_u16(),
        "Wrapping bare error response"
    );
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    (parts, Json(ErrorBody::new(message, None))).into_response()
}
