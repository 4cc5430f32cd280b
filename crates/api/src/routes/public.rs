//! Unauthenticated public site routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::portfolio;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET /portfolios/{subdomain} -> public_read (published only, counts the view)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/portfolios/{subdomain}", get(portfolio::public_read))
}
