//! Handlers for image upload and deletion across all slots.
//!
//! Uploads arrive as `multipart/form-data` with a single `image` field. The
//! bytes are staged to a local temp file (removed on every exit path), then
//! handed to the asset lifecycle service, which validates the image header,
//! uploads, and commits the reference in the safe order.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use folio_core::types::DbId;
use folio_storage::{StagedFile, StoredObject};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::services::assets::{AssetLifecycle, AssetSlot, SlotRef};
use crate::state::AppState;

/// Maximum accepted upload size. Enforced via `DefaultBodyLimit` on the
/// upload routes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Pull the `image` field out of a multipart body and stage it to disk.
async fn stage_upload(state: &AppState, mut multipart: Multipart) -> AppResult<StagedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }

        let staged = StagedFile::create(&state.config.staging_dir, &bytes)
            .await
            .map_err(folio_storage::StorageError::Io)?;
        return Ok(staged);
    }

    Err(AppError::BadRequest(
        "Missing multipart field 'image'".into(),
    ))
}

/// POST /api/v1/portfolios/{id}/header-image
///
/// Replaces the header image. The previous object, if any, is deleted only
/// after the new reference is committed.
pub async fn upload_header_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<StoredObject>> {
    super::portfolio::load_owned(&state, &user, id).await?;

    let staged = stage_upload(&state, multipart).await?;
    let stored = AssetLifecycle::from_state(&state)
        .put_asset(AssetSlot::PortfolioHeader { portfolio_id: id }, staged)
        .await?;

    Ok(Json(stored))
}

/// DELETE /api/v1/portfolios/{id}/header-image
pub async fn delete_header_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    super::portfolio::load_owned(&state, &user, id).await?;

    AssetLifecycle::from_state(&state)
        .delete_asset(SlotRef::PortfolioHeader { portfolio_id: id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/portfolios/{id}/gallery
///
/// Appends one image to the gallery. Entries are independent; existing ones
/// are never touched.
pub async fn upload_gallery_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredObject>)> {
    super::portfolio::load_owned(&state, &user, id).await?;

    let staged = stage_upload(&state, multipart).await?;
    let stored = AssetLifecycle::from_state(&state)
        .put_asset(AssetSlot::PortfolioGallery { portfolio_id: id }, staged)
        .await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /api/v1/portfolios/{id}/gallery/{*public_id}
///
/// Public ids contain slashes, so the entry is addressed by a wildcard
/// path segment.
pub async fn delete_gallery_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, public_id)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    super::portfolio::load_owned(&state, &user, id).await?;

    AssetLifecycle::from_state(&state)
        .delete_asset(SlotRef::PortfolioGallery {
            portfolio_id: id,
            public_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/me/profile-picture
///
/// The profile picture lives under a fixed public id per user, so a
/// replacement overwrites the object in place.
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<StoredObject>> {
    let staged = stage_upload(&state, multipart).await?;
    let stored = AssetLifecycle::from_state(&state)
        .put_asset(
            AssetSlot::UserProfile {
                user_id: user.user_id,
            },
            staged,
        )
        .await?;

    Ok(Json(stored))
}

/// DELETE /api/v1/users/me/profile-picture
pub async fn delete_profile_picture(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<StatusCode> {
    AssetLifecycle::from_state(&state)
        .delete_asset(SlotRef::UserProfile {
            user_id: user.user_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
