pub mod error;
pub mod health;
pub mod solar;

pub use error::{ApiError, ErrorEnvelope};

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::{any::Any, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Result<Router> {
    let server = &state.cfg.server;
    let origin = HeaderValue::from_str(&server.cors_origin)
        .with_context(|| format!("invalid CORS origin {:?}", server.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
    let timeout = Duration::from_secs(server.request_timeout_secs);

    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/solar-data", get(solar::get_solar_data))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(details).into_response()
}
