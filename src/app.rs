// app.rs - Router assembly
//
// Layer order, outermost first:
//   trace → cors → propagate_auth → (protected only) require_auth → handler

use axum::{extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::{propagate_auth, require_auth};
use crate::proxy::{self, catalog::catalog, dispatch::MAX_BODY_BYTES};
use crate::types::AppState;

pub fn app(state: AppState) -> Router {
    let (public, protected) = proxy::routes(catalog());

    let protected = protected
        .route("/api/search", get(handlers::search))
        .route_layer(from_fn(require_auth));

    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(public)
        .merge(protected)
        .layer(from_fn(propagate_auth))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.permissive_cors {
        return CorsLayer::permissive();
    }

    let origins: Vec<_> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
