//! Handlers for the `/templates` resource.
//!
//! Catalog reads are public. Catalog writes are admin-only; review
//! submission is open to any authenticated user.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use folio_core::error::CoreError;
use folio_core::template::{validate_rating, TemplateCategory};
use folio_core::types::DbId;
use folio_db::models::template::{
    CreateReview, CreateTemplate, Template, TemplateReview, TemplateSearchParams, UpdateTemplate,
};
use folio_db::repositories::TemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/templates
///
/// Public catalog listing: published templates only, with optional
/// category/featured/search filters and pagination.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<TemplateSearchParams>,
) -> AppResult<Json<Vec<Template>>> {
    if let Some(category) = &params.category {
        TemplateCategory::from_name(category)?;
    }
    let templates = TemplateRepo::search(&state.pool, &params).await?;
    Ok(Json(templates))
}

/// GET /api/v1/templates/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Template>> {
    let template = TemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))?;
    Ok(Json(template))
}

/// POST /api/v1/templates (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<Template>)> {
    TemplateCategory::from_name(&input.category)?;

    let template = TemplateRepo::create(&state.pool, &input, Some(admin.user_id)).await?;

    tracing::info!(template_id = template.id, name = %template.name, "Template created");

    Ok((StatusCode::CREATED, Json(template)))
}

/// PUT /api/v1/templates/{id} (admin)
///
/// Structure changes apply lazily: portfolios re-resolve against the new
/// structure on their next read, nothing is migrated eagerly.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<Json<Template>> {
    if let Some(category) = &input.category {
        TemplateCategory::from_name(category)?;
    }

    let template = TemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))?;
    Ok(Json(template))
}

/// DELETE /api/v1/templates/{id} (admin)
///
/// Refused with 409 while any portfolio references the template. The guard
/// runs inside the DELETE statement, so a concurrent portfolio creation
/// either wins (409 here) or loses (the reference check at portfolio
/// creation finds no template).
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TemplateRepo::delete_if_unused(&state.pool, id).await?;
    if deleted {
        tracing::info!(template_id = id, "Template deleted");
        return Ok(StatusCode::NO_CONTENT);
    }

    // Distinguish "still referenced" from "no such template".
    if TemplateRepo::verify_exists(&state.pool, id).await? {
        Err(AppError::Core(CoreError::Conflict(
            "Template is in use by existing portfolios and cannot be deleted".into(),
        )))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// GET /api/v1/templates/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<TemplateReview>>> {
    if !TemplateRepo::verify_exists(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }));
    }
    let reviews = TemplateRepo::list_reviews(&state.pool, id).await?;
    Ok(Json(reviews))
}

/// POST /api/v1/templates/{id}/reviews
///
/// One review per user per template; a second attempt is a 409 from the
/// unique index. The template's rating summary is recomputed in the same
/// transaction as the insert.
pub async fn submit_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<TemplateReview>)> {
    validate_rating(input.rating)?;

    if !TemplateRepo::verify_exists(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }));
    }

    let review = TemplateRepo::add_review(&state.pool, id, user.user_id, &input).await?;

    tracing::info!(template_id = id, user_id = user.user_id, rating = input.rating, "Review submitted");

    Ok((StatusCode::CREATED, Json(review)))
}
