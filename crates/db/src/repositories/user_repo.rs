//! Repository for the `users` table.
//!
//! Only the surface the portfolio core needs: identity lookup and the
//! single-slot profile picture.

use sqlx::types::Json;
use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::portfolio::ImageRef;
use crate::models::user::User;

/// Column list for `users` queries.
const USER_COLUMNS: &str =
    "id, email, display_name, role, profile_picture, created_at, updated_at";

/// Provides data access for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user. Used by account provisioning and test fixtures.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        display_name: Option<&str>,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, role) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(display_name)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Durably set the profile picture slot.
    pub async fn set_profile_picture(
        pool: &PgPool,
        id: DbId,
        image: &ImageRef,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET profile_picture = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(Json(image))
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the profile picture slot.
    pub async fn clear_profile_picture(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET profile_picture = NULL, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
