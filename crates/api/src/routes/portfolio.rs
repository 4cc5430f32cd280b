//! Route definitions for portfolio management and portfolio image slots.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::image::{self, MAX_UPLOAD_BYTES};
use crate::handlers::portfolio;
use crate::state::AppState;

/// Routes mounted at `/portfolios`. All require authentication.
///
/// ```text
/// GET    /                          -> list_own
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PATCH  /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/publish              -> publish
/// POST   /{id}/unpublish            -> unpublish
/// POST   /{id}/header-image         -> upload_header_image (multipart)
/// DELETE /{id}/header-image         -> delete_header_image
/// POST   /{id}/gallery              -> upload_gallery_image (multipart)
/// DELETE /{id}/gallery/{*public_id} -> delete_gallery_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(portfolio::list_own).post(portfolio::create))
        .route(
            "/{id}",
            get(portfolio::get_by_id)
                .patch(portfolio::update)
                .delete(portfolio::delete),
        )
        .route("/{id}/publish", post(portfolio::publish))
        .route("/{id}/unpublish", post(portfolio::unpublish))
        .route(
            "/{id}/header-image",
            post(image::upload_header_image)
                .delete(image::delete_header_image)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/{id}/gallery",
            post(image::upload_gallery_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Public ids contain slashes, so the entry segment is a wildcard.
        .route(
            "/{id}/gallery/{*public_id}",
            delete(image::delete_gallery_image),
        )
}
