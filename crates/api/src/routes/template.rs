//! Route definitions for the template catalog and reviews.

use axum::routing::get;
use axum::Router;

use crate::handlers::template;
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// Reads are public; writes require the admin role except review
/// submission, which requires any authenticated user.
///
/// ```text
/// GET    /              -> search
/// POST   /              -> create (admin)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (admin)
/// DELETE /{id}          -> delete (admin)
/// GET    /{id}/reviews  -> list_reviews
/// POST   /{id}/reviews  -> submit_review (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(template::search).post(template::create))
        .route(
            "/{id}",
            get(template::get_by_id)
                .put(template::update)
                .delete(template::delete),
        )
        .route(
            "/{id}/reviews",
            get(template::list_reviews).post(template::submit_review),
        )
}
