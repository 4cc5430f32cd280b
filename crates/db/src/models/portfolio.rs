//! Portfolio models and DTOs.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Shared value types
// ---------------------------------------------------------------------------

/// Reference to one stored binary object.
///
/// Every `public_id` held by a row corresponds to exactly one live object in
/// the object store; the asset lifecycle service maintains that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub public_id: String,
}

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `portfolios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Portfolio {
    pub id: DbId,
    /// Owner; immutable after creation.
    pub user_id: DbId,
    /// Referenced template. `NULL` means fully custom.
    pub template_id: Option<DbId>,
    pub title: String,
    pub subtitle: Option<String>,
    /// Globally unique public address (lowercase-normalized).
    pub subdomain: String,
    /// Globally unique when set.
    pub custom_domain: Option<String>,
    /// Per-section overrides: `section_id -> opaque structured data`.
    pub content: serde_json::Value,
    pub section_order: Vec<String>,
    pub active_layout: Option<String>,
    pub active_color_scheme: Option<String>,
    pub active_font_pairing: Option<String>,
    pub header_image: Option<Json<ImageRef>>,
    pub gallery_images: Json<Vec<ImageRef>>,
    pub is_published: bool,
    pub view_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a new portfolio. Always starts in draft state.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePortfolio {
    pub title: String,
    pub subdomain: String,
    pub subtitle: Option<String>,
    pub template_id: Option<DbId>,
    pub content: Option<serde_json::Map<String, serde_json::Value>>,
}

/// DTO for partially updating a portfolio.
///
/// `subtitle`, `custom_domain`, and `active_layout` are tri-state: omitted
/// leaves the column unchanged, explicit `null` clears it. `header_image`
/// accepts only an explicit `null` ("clear this slot", which cascades to the
/// stored object); setting a new image goes through the upload endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePortfolio {
    pub title: Option<String>,
    #[serde(default, with = "double_option")]
    pub subtitle: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub custom_domain: Option<Option<String>>,
    pub content: Option<serde_json::Map<String, serde_json::Value>>,
    pub section_order: Option<Vec<String>>,
    pub active_layout: Option<String>,
    pub active_color_scheme: Option<String>,
    pub active_font_pairing: Option<String>,
    #[serde(default, with = "double_option")]
    pub header_image: Option<Option<ImageRef>>,
}

/// Serde helper distinguishing an absent field from an explicit `null`.
///
/// With plain `Option<Option<T>>`, serde collapses both to `None`; wrapping
/// the field keeps `Some(None)` for explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
