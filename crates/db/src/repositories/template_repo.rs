//! Repository for the `templates` and `template_reviews` tables.

use sqlx::types::Json;
use sqlx::PgPool;

use folio_core::template::recompute_rating;
use folio_core::types::DbId;

use crate::models::template::{
    CreateReview, CreateTemplate, Template, TemplateReview, TemplateSearchParams, UpdateTemplate,
};

/// Column list for `templates` queries.
///
/// `usage_count` is computed per read from the referencing portfolio count
/// (it is never stored, so it cannot drift under concurrent create/delete).
const TEMPLATE_COLUMNS: &str = "\
    id, name, description, category, structure, is_published, featured, \
    rating_average, rating_count, \
    (SELECT COUNT(*) FROM portfolios p WHERE p.template_id = templates.id) AS usage_count, \
    created_by, created_at, updated_at";

/// Column list for `template_reviews` queries.
const REVIEW_COLUMNS: &str = "id, template_id, user_id, rating, comment, created_at";

/// Default and maximum page sizes for the catalog listing.
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Provides data access for the template catalog.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template.
    pub async fn create(
        pool: &PgPool,
        dto: &CreateTemplate,
        created_by: Option<DbId>,
    ) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (name, description, category, structure, is_published, featured, created_by) \
             VALUES ($1, $2, $3, $4, COALESCE($5, FALSE), COALESCE($6, FALSE), $7) \
             RETURNING {TEMPLATE_COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.category)
            .bind(Json(&dto.structure))
            .bind(dto.is_published)
            .bind(dto.featured)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a template by its ID, published or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Catalog listing: published templates with optional filters and
    /// pagination.
    pub async fn search(
        pool: &PgPool,
        params: &TemplateSearchParams,
    ) -> Result<Vec<Template>, sqlx::Error> {
        // Sort keys map to fixed ORDER BY clauses; anything else falls back
        // to newest-first. Never interpolate caller input directly.
        let order_by = match params.sort.as_deref() {
            Some("name") => "name ASC",
            Some("rating") => "rating_average DESC, rating_count DESC",
            Some("popular") => "usage_count DESC",
            _ => "created_at DESC",
        };

        let limit = params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (params.page.unwrap_or(1).max(1) - 1) * limit;

        let query = format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates \
             WHERE is_published \
               AND ($1::text IS NULL OR category = $1) \
               AND ($2::bool IS NULL OR featured = $2) \
               AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' \
                    OR description ILIKE '%' || $3 || '%') \
             ORDER BY {order_by} \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&params.category)
            .bind(params.featured)
            .bind(&params.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Partially update a template.
    ///
    /// Uses `COALESCE` so only provided fields are changed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let structure = dto.structure.as_ref().map(Json);

        let query = format!(
            "UPDATE templates SET \
                 name         = COALESCE($2, name), \
                 description  = COALESCE($3, description), \
                 category     = COALESCE($4, category), \
                 structure    = COALESCE($5, structure), \
                 is_published = COALESCE($6, is_published), \
                 featured     = COALESCE($7, featured), \
                 updated_at   = now() \
             WHERE id = $1 \
             RETURNING {TEMPLATE_COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.category)
            .bind(structure)
            .bind(dto.is_published)
            .bind(dto.featured)
            .fetch_optional(pool)
            .await
    }

    /// Delete a template, but only while no portfolio references it.
    ///
    /// The zero-references guard runs inside the DELETE itself, so a
    /// concurrent portfolio creation cannot slip between a check and the
    /// delete. Returns `true` if the row was removed.
    pub async fn delete_if_unused(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM templates WHERE id = $1 \
             AND NOT EXISTS (SELECT 1 FROM portfolios p WHERE p.template_id = templates.id)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a template row exists.
    pub async fn verify_exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM templates WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists.0)
    }

    // -----------------------------------------------------------------------
    // Reviews
    // -----------------------------------------------------------------------

    /// Append a review and recompute the rating summary in one transaction.
    ///
    /// A second review from the same user violates
    /// `uq_template_reviews_template_user` and rolls the whole thing back.
    pub async fn add_review(
        pool: &PgPool,
        template_id: DbId,
        user_id: DbId,
        dto: &CreateReview,
    ) -> Result<TemplateReview, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO template_reviews (template_id, user_id, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REVIEW_COLUMNS}"
        );
        let review = sqlx::query_as::<_, TemplateReview>(&insert)
            .bind(template_id)
            .bind(user_id)
            .bind(dto.rating)
            .bind(&dto.comment)
            .fetch_one(&mut *tx)
            .await?;

        let ratings: Vec<(i16,)> =
            sqlx::query_as("SELECT rating FROM template_reviews WHERE template_id = $1")
                .bind(template_id)
                .fetch_all(&mut *tx)
                .await?;
        let ratings: Vec<i16> = ratings.into_iter().map(|(r,)| r).collect();
        let summary = recompute_rating(&ratings);

        sqlx::query(
            "UPDATE templates SET rating_average = $2, rating_count = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(template_id)
        .bind(summary.average)
        .bind(summary.count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(review)
    }

    /// List all reviews for a template, newest first.
    pub async fn list_reviews(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<TemplateReview>, sqlx::Error> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM template_reviews \
             WHERE template_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, TemplateReview>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }
}
