//! User models.
//!
//! Only the fields the portfolio core needs: identity, role for the admin
//! gate, and the single-slot profile picture asset.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use super::portfolio::ImageRef;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    /// Role name (`"user"` or `"admin"`).
    pub role: String,
    /// Single-slot asset with the same lifecycle rules as portfolio slots.
    pub profile_picture: Option<Json<ImageRef>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
