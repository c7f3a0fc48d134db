use uuid::Uuid;

use crate::{
    error::{AuthError, Result},
    middleware_layer::auth::AuthenticatedUser,
    models::chirp::Chirp,
    state::AppState,
    validation::chirp::filter_chirp,
};

/// Requested ordering for chirp listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

/// Rejects a request whose named author differs from the token's subject.
pub fn authorize_author(
    author: &AuthenticatedUser,
    requested_author: Option<Uuid>,
) -> std::result::Result<(), AuthError> {
    match requested_author {
        Some(requested) if requested != author.user_id => Err(AuthError::Mismatch),
        _ => Ok(()),
    }
}

/// Runs the admission steps after authentication and persists the chirp.
///
/// The stored author is always the authenticated one, never the id the
/// client sent.
pub async fn create_chirp(
    state: &AppState,
    author: &AuthenticatedUser,
    body: &str,
    requested_author: Option<Uuid>,
) -> Result<Chirp> {
    authorize_author(author, requested_author).map_err(|e| {
        tracing::warn!(
            "❌ User {} tried to post as {:?}",
            author.user_id,
            requested_author
        );
        e
    })?;

    let cleaned = filter_chirp(body)?;

    let chirp = state.store.create_chirp(&cleaned, author.user_id).await?;
    tracing::info!("✅ Chirp {} created by {}", chirp.id, chirp.user_id);
    Ok(chirp)
}

/// Lists chirps, optionally by one author, in the requested order.
pub async fn list_chirps(
    state: &AppState,
    author_id: Option<Uuid>,
    sort: SortOrder,
) -> Result<Vec<Chirp>> {
    let mut chirps = state.store.list_chirps(author_id).await?;
    if sort == SortOrder::Desc {
        chirps.reverse();
    }
    Ok(chirps)
}

/// Fetches one chirp.
pub async fn get_chirp(state: &AppState, id: Uuid) -> Result<Chirp> {
    Ok(state.store.get_chirp_by_id(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_or_absent_author_is_allowed() {
        let user = AuthenticatedUser { user_id: Uuid::new_v4() };
        assert_eq!(authorize_author(&user, None), Ok(()));
        assert_eq!(authorize_author(&user, Some(user.user_id)), Ok(()));
    }

    #[test]
    fn different_author_is_rejected() {
        let user = AuthenticatedUser { user_id: Uuid::new_v4() };
        assert_eq!(
            authorize_author(&user, Some(Uuid::new_v4())),
            Err(AuthError::Mismatch)
        );
    }
}
