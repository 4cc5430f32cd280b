pub mod health;
pub mod portfolio;
pub mod public;
pub mod template;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /portfolios                                  list own, create
/// /portfolios/{id}                             get, patch, delete
/// /portfolios/{id}/publish                     publish (POST)
/// /portfolios/{id}/unpublish                   unpublish (POST)
/// /portfolios/{id}/header-image                upload (POST), delete
/// /portfolios/{id}/gallery                     upload (POST)
/// /portfolios/{id}/gallery/{*public_id}        delete entry
///
/// /templates                                   search (public), create (admin)
/// /templates/{id}                              get (public), update, delete (admin)
/// /templates/{id}/reviews                      list (public), submit (auth)
///
/// /users/me/profile-picture                    upload (POST), delete
///
/// /public/portfolios/{subdomain}               published portfolio by subdomain
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/portfolios", portfolio::router())
        .nest("/templates", template::router())
        .nest("/users", user::router())
        .nest("/public", public::router())
}
