//! Repository for the `portfolios` table.
//!
//! Subdomain and custom-domain uniqueness are enforced by the `uq_*`
//! indexes; callers surface the resulting 23505 as a conflict instead of
//! pre-checking.

use sqlx::types::Json;
use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::portfolio::{CreatePortfolio, ImageRef, Portfolio, UpdatePortfolio};

/// Column list for `portfolios` queries.
const PORTFOLIO_COLUMNS: &str = "\
    id, user_id, template_id, title, subtitle, subdomain, custom_domain, \
    content, section_order, active_layout, active_color_scheme, \
    active_font_pairing, header_image, gallery_images, is_published, \
    view_count, created_at, updated_at";

/// Provides data access for portfolios.
pub struct PortfolioRepo;

impl PortfolioRepo {
    /// Insert a new draft portfolio.
    ///
    /// `subdomain` must already be normalized; a duplicate surfaces as a
    /// unique-constraint error from `uq_portfolios_subdomain`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        dto: &CreatePortfolio,
        subdomain: &str,
    ) -> Result<Portfolio, sqlx::Error> {
        let content = dto
            .content
            .clone()
            .map(serde_json::Value::Object)
            .unwrap_or_else(|| serde_json::json!({}));

        let query = format!(
            "INSERT INTO portfolios (user_id, template_id, title, subtitle, subdomain, content) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PORTFOLIO_COLUMNS}"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(user_id)
            .bind(dto.template_id)
            .bind(&dto.title)
            .bind(&dto.subtitle)
            .bind(subdomain)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Find a portfolio by its ID, any state.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Portfolio>, sqlx::Error> {
        let query = format!("SELECT {PORTFOLIO_COLUMNS} FROM portfolios WHERE id = $1");
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all portfolios owned by a user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Portfolio>, sqlx::Error> {
        let query = format!(
            "SELECT {PORTFOLIO_COLUMNS} FROM portfolios \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Public read: return a *published* portfolio by subdomain and count
    /// the view.
    ///
    /// The increment happens in the same statement as the read, so each
    /// public read bumps `view_count` by exactly 1 with no window for a
    /// concurrent reader to observe a stale count. Draft portfolios are
    /// invisible here.
    pub async fn public_read_by_subdomain(
        pool: &PgPool,
        subdomain: &str,
    ) -> Result<Option<Portfolio>, sqlx::Error> {
        let query = format!(
            "UPDATE portfolios SET view_count = view_count + 1 \
             WHERE lower(subdomain) = lower($1) AND is_published \
             RETURNING {PORTFOLIO_COLUMNS}"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(subdomain)
            .fetch_optional(pool)
            .await
    }

    /// Partially update a portfolio.
    ///
    /// Uses `COALESCE` so only provided fields are changed. `subtitle` and
    /// `custom_domain` use the provided/value bind pair to allow clearing.
    /// A provided `content` map is merged per top-level section key (each
    /// provided section replaces its previous value wholesale).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdatePortfolio,
    ) -> Result<Option<Portfolio>, sqlx::Error> {
        let subtitle_provided = dto.subtitle.is_some();
        let subtitle_value = dto.subtitle.as_ref().and_then(|v| v.as_deref());

        let custom_domain_provided = dto.custom_domain.is_some();
        let custom_domain_value = dto.custom_domain.as_ref().and_then(|v| v.as_deref());

        let content_patch = dto.content.clone().map(serde_json::Value::Object);

        let query = format!(
            "UPDATE portfolios SET \
                 title               = COALESCE($2, title), \
                 subtitle            = CASE WHEN $3 THEN $4 ELSE subtitle END, \
                 custom_domain       = CASE WHEN $5 THEN $6 ELSE custom_domain END, \
                 content             = CASE WHEN $7::jsonb IS NULL THEN content ELSE content || $7 END, \
                 section_order       = COALESCE($8, section_order), \
                 active_layout       = COALESCE($9, active_layout), \
                 active_color_scheme = COALESCE($10, active_color_scheme), \
                 active_font_pairing = COALESCE($11, active_font_pairing), \
                 updated_at          = now() \
             WHERE id = $1 \
             RETURNING {PORTFOLIO_COLUMNS}"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(id)
            .bind(&dto.title)
            .bind(subtitle_provided)
            .bind(subtitle_value)
            .bind(custom_domain_provided)
            .bind(custom_domain_value)
            .bind(content_patch)
            .bind(&dto.section_order)
            .bind(&dto.active_layout)
            .bind(&dto.active_color_scheme)
            .bind(&dto.active_font_pairing)
            .fetch_optional(pool)
            .await
    }

    /// Set the active layout and reset the section order to the layout's
    /// declared sections in one statement.
    pub async fn set_layout(
        pool: &PgPool,
        id: DbId,
        layout_id: &str,
        section_order: &[String],
    ) -> Result<Option<Portfolio>, sqlx::Error> {
        let query = format!(
            "UPDATE portfolios SET \
                 active_layout = $2, section_order = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING {PORTFOLIO_COLUMNS}"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(id)
            .bind(layout_id)
            .bind(section_order)
            .fetch_optional(pool)
            .await
    }

    /// Durably set the header image slot.
    pub async fn set_header_image(
        pool: &PgPool,
        id: DbId,
        image: &ImageRef,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE portfolios SET header_image = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(Json(image))
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the header image slot.
    pub async fn clear_header_image(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE portfolios SET header_image = NULL, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append one entry to the gallery array.
    pub async fn add_gallery_image(
        pool: &PgPool,
        id: DbId,
        image: &ImageRef,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE portfolios SET \
                 gallery_images = gallery_images || $2::jsonb, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(Json(image))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the gallery entry with the given public id, leaving siblings
    /// untouched.
    pub async fn remove_gallery_image(
        pool: &PgPool,
        id: DbId,
        public_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE portfolios SET \
                 gallery_images = COALESCE( \
                     (SELECT jsonb_agg(img) FROM jsonb_array_elements(gallery_images) img \
                      WHERE img->>'public_id' <> $2), \
                     '[]'::jsonb), \
                 updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(public_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip the published flag. The subdomain stays reserved either way.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        published: bool,
    ) -> Result<Option<Portfolio>, sqlx::Error> {
        let query = format!(
            "UPDATE portfolios SET is_published = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {PORTFOLIO_COLUMNS}"
        );
        sqlx::query_as::<_, Portfolio>(&query)
            .bind(id)
            .bind(published)
            .fetch_optional(pool)
            .await
    }

    /// Delete a portfolio row. Returns `true` if a row was deleted.
    ///
    /// Stored-object cascade deletion is the asset service's job and must
    /// happen before this call.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM portfolios WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
