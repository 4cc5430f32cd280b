//! Template catalog models and DTOs.

use folio_core::composition::TemplateStructure;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `templates` table.
///
/// `usage_count` is never stored; every query computes it from the count of
/// referencing portfolios, so it cannot drift.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// One of: professional, creative, minimal, modern, other.
    pub category: String,
    /// Structural definition: sections, layouts, theme options, defaults.
    pub structure: Json<TemplateStructure>,
    pub is_published: bool,
    pub featured: bool,
    pub rating_average: f64,
    pub rating_count: i64,
    /// Derived: number of portfolios referencing this template.
    pub usage_count: i64,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `template_reviews` table. One review per user per
/// template, enforced by `uq_template_reviews_template_user`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateReview {
    pub id: DbId,
    pub template_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a new template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub structure: TemplateStructure,
    pub is_published: Option<bool>,
    pub featured: Option<bool>,
}

/// DTO for partially updating a template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub structure: Option<TemplateStructure>,
    pub is_published: Option<bool>,
    pub featured: Option<bool>,
}

/// DTO for appending a review.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub rating: i16,
    pub comment: Option<String>,
}

/// Query parameters for the template listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateSearchParams {
    pub category: Option<String>,
    pub featured: Option<bool>,
    /// Case-insensitive substring match on name/description.
    pub search: Option<String>,
    /// One of: `newest`, `name`, `rating`, `popular`. Defaults to `newest`.
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
