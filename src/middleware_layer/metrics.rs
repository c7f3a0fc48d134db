use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Counts every request that reaches the static file server.
pub async fn count_hits(State(state): State<AppState>, request: Request<Body>, next: Next) -> Response {
    state.hits.increment();
    next.run(request).await
}
