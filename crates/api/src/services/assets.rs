//! Asset lifecycle service: keeps each image slot in sync with exactly one
//! stored object.
//!
//! A slot is one named place on a record holding at most one stored-object
//! reference: a portfolio's header image, one entry of a portfolio's
//! gallery, or a user's profile picture.
//!
//! Replace ordering rule: the old object is never deleted before the new
//! reference is durably committed. The converse failure (object uploaded,
//! record update fails) leaves a temporarily orphaned stored object; there
//! is no background reconciliation, so those are logged and accepted.

use std::sync::Arc;

use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::models::portfolio::{ImageRef, Portfolio};
use folio_db::repositories::{PortfolioRepo, UserRepo};
use folio_db::DbPool;
use folio_storage::{ObjectStore, StagedFile, StoredObject, UploadOptions};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Target slot for an upload.
#[derive(Debug, Clone, Copy)]
pub enum AssetSlot {
    PortfolioHeader { portfolio_id: DbId },
    PortfolioGallery { portfolio_id: DbId },
    UserProfile { user_id: DbId },
}

/// Target slot for a deletion. Gallery entries are addressed by public id.
#[derive(Debug, Clone)]
pub enum SlotRef {
    PortfolioHeader { portfolio_id: DbId },
    PortfolioGallery { portfolio_id: DbId, public_id: String },
    UserProfile { user_id: DbId },
}

/// Orchestrates uploads/replacements/deletions across the object store and
/// the document store.
pub struct AssetLifecycle {
    pool: DbPool,
    store: Arc<dyn ObjectStore>,
}

impl AssetLifecycle {
    pub fn new(pool: DbPool, store: Arc<dyn ObjectStore>) -> Self {
        Self { pool, store }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.pool.clone(), Arc::clone(&state.store))
    }

    /// Upload a staged file into a slot, replacing any previous object.
    ///
    /// Three sequential steps, never concurrent (correctness depends on the
    /// order): upload, commit the new reference, then best-effort delete of
    /// the previous object. `staged` is consumed and its temp file removed
    /// on every exit path.
    pub async fn put_asset(&self, slot: AssetSlot, staged: StagedFile) -> AppResult<StoredObject> {
        // Resolve the owning record and the slot's previous object before
        // touching the store, so a missing owner fails without uploading.
        let (options, previous) = match slot {
            AssetSlot::PortfolioHeader { portfolio_id } => {
                let portfolio = self.require_portfolio(portfolio_id).await?;
                let options = UploadOptions::image(format!("portfolios/{portfolio_id}/header"));
                (options, portfolio.header_image.map(|j| j.0))
            }
            AssetSlot::PortfolioGallery { portfolio_id } => {
                self.require_portfolio(portfolio_id).await?;
                let options = UploadOptions::image(format!("portfolios/{portfolio_id}/gallery"));
                (options, None)
            }
            AssetSlot::UserProfile { user_id } => {
                let user = self.require_user(user_id).await?;
                // Fixed public id: replacing a profile picture is an
                // in-place overwrite, so no separate delete is needed.
                let mut options = UploadOptions::image(format!("users/{user_id}"));
                options.public_id = Some(format!("users/{user_id}/profile"));
                options.overwrite = true;
                (options, user.profile_picture.map(|j| j.0))
            }
        };

        // Step 1: upload. A failure here leaves the record untouched and
        // the staged temp file is removed when `staged` drops.
        let stored = self.store.upload(staged.path(), &options).await?;

        let image = ImageRef {
            url: stored.url.clone(),
            public_id: stored.public_id.clone(),
        };

        // Step 2: durably commit the new reference.
        let committed = match slot {
            AssetSlot::PortfolioHeader { portfolio_id } => {
                PortfolioRepo::set_header_image(&self.pool, portfolio_id, &image).await?
            }
            AssetSlot::PortfolioGallery { portfolio_id } => {
                PortfolioRepo::add_gallery_image(&self.pool, portfolio_id, &image).await?
            }
            AssetSlot::UserProfile { user_id } => {
                UserRepo::set_profile_picture(&self.pool, user_id, &image).await?
            }
        };

        if !committed {
            // Owner row vanished between the existence check and the
            // update. The uploaded object is now an accepted orphan.
            tracing::warn!(
                public_id = %stored.public_id,
                slot = ?slot,
                "Slot owner disappeared after upload; stored object is orphaned",
            );
            return Err(AppError::NotFound(
                "Record was deleted while the upload was in flight".into(),
            ));
        }

        // Step 3: only now delete the previous object, unless the upload
        // overwrote it in place.
        if let Some(old) = previous {
            if old.public_id != stored.public_id {
                if let Err(e) = self.store.delete(&old.public_id).await {
                    // Partial cleanup failure: the new state is already
                    // correct, so this is logged and not surfaced.
                    tracing::warn!(
                        public_id = %old.public_id,
                        error = %e,
                        "Failed to delete replaced object; orphan left in store",
                    );
                }
            }
        }

        tracing::info!(public_id = %stored.public_id, slot = ?slot, "Asset stored");

        Ok(stored)
    }

    /// Delete the object in a slot, then clear the slot field.
    ///
    /// Fails with NotFound when the slot is already empty. A store failure
    /// propagates before the record is touched, so the operation stays
    /// retryable.
    pub async fn delete_asset(&self, slot: SlotRef) -> AppResult<()> {
        match slot {
            SlotRef::PortfolioHeader { portfolio_id } => {
                let portfolio = self.require_portfolio(portfolio_id).await?;
                let image = portfolio.header_image.ok_or(AppError::Core(CoreError::NotFound {
                    entity: "HeaderImage",
                    id: portfolio_id,
                }))?;

                self.store.delete(&image.public_id).await?;
                PortfolioRepo::clear_header_image(&self.pool, portfolio_id).await?;

                tracing::info!(portfolio_id, public_id = %image.public_id, "Header image deleted");
            }
            SlotRef::PortfolioGallery {
                portfolio_id,
                public_id,
            } => {
                let portfolio = self.require_portfolio(portfolio_id).await?;
                if !portfolio
                    .gallery_images
                    .iter()
                    .any(|img| img.public_id == public_id)
                {
                    return Err(AppError::Core(CoreError::NotFound {
                        entity: "GalleryImage",
                        id: portfolio_id,
                    }));
                }

                self.store.delete(&public_id).await?;
                PortfolioRepo::remove_gallery_image(&self.pool, portfolio_id, &public_id).await?;

                tracing::info!(portfolio_id, public_id = %public_id, "Gallery image deleted");
            }
            SlotRef::UserProfile { user_id } => {
                let user = self.require_user(user_id).await?;
                let image = user.profile_picture.ok_or(AppError::Core(CoreError::NotFound {
                    entity: "ProfilePicture",
                    id: user_id,
                }))?;

                self.store.delete(&image.public_id).await?;
                UserRepo::clear_profile_picture(&self.pool, user_id).await?;

                tracing::info!(user_id, public_id = %image.public_id, "Profile picture deleted");
            }
        }

        Ok(())
    }

    /// Best-effort cascade deletion of every object a portfolio references.
    ///
    /// Used by portfolio removal: a single image-deletion failure must not
    /// block the remaining images or the row removal, so every failure is
    /// logged and swallowed.
    pub async fn delete_all_portfolio_assets(&self, portfolio: &Portfolio) {
        let mut public_ids: Vec<&str> = Vec::new();
        if let Some(ref header) = portfolio.header_image {
            public_ids.push(&header.public_id);
        }
        for image in portfolio.gallery_images.iter() {
            public_ids.push(&image.public_id);
        }

        for public_id in public_ids {
            if let Err(e) = self.store.delete(public_id).await {
                tracing::warn!(
                    portfolio_id = portfolio.id,
                    public_id = %public_id,
                    error = %e,
                    "Failed to delete portfolio asset during cascade; orphan left in store",
                );
            }
        }
    }

    async fn require_portfolio(&self, id: DbId) -> AppResult<Portfolio> {
        PortfolioRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Portfolio",
                id,
            }))
    }

    async fn require_user(&self, id: DbId) -> AppResult<folio_db::models::user::User> {
        UserRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}
