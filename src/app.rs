use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use http::{header, Method};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application router.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(86400));

    let fileserver = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.fileserver_root))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::metrics::count_hits,
        ));

    let chirps = get(handlers::chirps::list_chirps).merge(
        post(handlers::chirps::create_chirp).route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        )),
    );

    let api_routes = Router::new()
        .route("/api/healthz", get(handlers::admin::healthz))
        .route("/api/validate_chirp", post(handlers::admin::validate_chirp))
        .route("/api/users", post(handlers::auth::create_user))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/refresh", post(handlers::auth::refresh))
        .route("/api/revoke", post(handlers::auth::revoke))
        .route("/api/chirps", chirps)
        .route("/api/chirps/{chirp_id}", get(handlers::chirps::get_chirp));

    let admin_routes = Router::new()
        .route("/admin/metrics", get(handlers::admin::metrics))
        .route("/admin/reset", post(handlers::admin::reset));

    Router::new()
        .merge(api_routes)
        .merge(admin_routes)
        .merge(fileserver)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}
