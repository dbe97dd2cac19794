//! Router composition and middleware stack.

use std::any::Any;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::AllowedOrigins;
use crate::error::{ErrorBody, UNEXPECTED_ERROR};
use crate::handlers::{self, notes};
use crate::middleware::envelope_bare_errors;
use crate::AppState;

/// Maximum accepted request body size. Larger bodies get 413.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let allow_origin = match origins {
        AllowedOrigins::Any => AllowOrigin::from(AnyOrigin),
        AllowedOrigins::List(list) => AllowOrigin::list(list.clone()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// Last-resort 500 for a panicking handler.
fn panic_response(err: Box<dyn Any + Send + 'static>, expose_errors: bool) -> Response {
    let message = panic_message(err.as_ref());
    tracing::error!(subsystem = "api", component = "router", error = %message, "Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(UNEXPECTED_ERROR, expose_errors.then_some(message))),
    )
        .into_response()
}

/// Routes under `/notes`.
pub fn notes_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route("/notes/search", get(notes::search_notes))
        .route(
            "/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
}

/// Build the full application router with its middleware stack.
pub fn build_router(state: AppState, origins: &AllowedOrigins) -> Router {
    let expose_errors = state.expose_errors;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .merge(notes_routes())
        .fallback(handlers::not_found)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(envelope_bare_errors))
        .layer(CatchPanicLayer::custom(move |err: Box<dyn Any + Send + 'static>| {
            panic_response(err, expose_errors)
        }))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(origins))
        .with_state(state)
}
