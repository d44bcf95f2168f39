//! Route table for the trigger service.

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::middleware::require_api_key;
use crate::handlers;
use crate::state::AppState;

/// Build the application router.
///
/// `cors_origins` of `None` allows any origin.
pub fn build_router(state: AppState, cors_origins: Option<Vec<String>>) -> Router {
    let allow_origin = match cors_origins {
        Some(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ),
        None => AllowOrigin::from(Any),
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, state.auth.header_name().clone()]);

    // Public routes (no auth required)
    let public_routes: Router = Router::new().route("/health", get(handlers::health_check));

    // Trigger routes (API key required when one is configured)
    let trigger_routes: Router = Router::new()
        .route("/trigger/{job_name}", post(handlers::trigger_job))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(trigger_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
