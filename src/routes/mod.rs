//! Route tables and the assembled application router.

mod clients;
mod common;

pub use clients::client_routes;
pub use common::common_routes_with_ready;

use crate::error::AppError;
use crate::middleware::{panic_response, trace_request};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    middleware, Router,
};
use tower_http::catch_panic::CatchPanicLayer;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::Rejected {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: format!("{} is not allowed on {}", method, uri.path()),
    }
}

/// Client and common routes behind the body limit, panic catcher and trace-id middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(client_routes(state))
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(trace_request))
}
