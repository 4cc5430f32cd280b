//! Route definitions for the authenticated user's own resources.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::image::{self, MAX_UPLOAD_BYTES};
use crate::state::AppState;

/// Routes mounted at `/users`. All require authentication.
///
/// ```text
/// POST   /me/profile-picture -> upload_profile_picture (multipart)
/// DELETE /me/profile-picture -> delete_profile_picture
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/me/profile-picture",
        post(image::upload_profile_picture)
            .delete(image::delete_profile_picture)
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
}
