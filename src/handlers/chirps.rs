use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{Result, ValidationError},
    extract::AppJson,
    middleware_layer::auth::AuthenticatedUser,
    services::chirps::{self as chirp_service, SortOrder},
    state::AppState,
};

/// The request payload for creating a chirp.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateChirpRequest {
    pub body: String,
    /// The author the client claims. Must match the token when present.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// The query parameters for listing chirps.
#[derive(Deserialize)]
pub struct ListChirpsQuery {
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Creates a chirp for the authenticated user.
#[axum::debug_handler]
pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(req): AppJson<CreateChirpRequest>,
) -> Result<Response> {
    let chirp = chirp_service::create_chirp(&state, &user, &req.body, req.user_id).await?;
    Ok((StatusCode::CREATED, Json(chirp)).into_response())
}

/// Lists chirps.
#[axum::debug_handler]
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<Response> {
    let chirps = chirp_service::list_chirps(&state, query.author_id, query.sort).await?;
    Ok((StatusCode::OK, Json(chirps)).into_response())
}

/// Gets one chirp by id.
#[axum::debug_handler]
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> Result<Response> {
    let chirp_id = Uuid::parse_str(&chirp_id)
        .map_err(|_| ValidationError::Malformed("Invalid chirp ID".to_string()))?;
    let chirp = chirp_service::get_chirp(&state, chirp_id).await?;
    Ok((StatusCode::OK, Json(chirp)).into_response())
}
