//! Handlers for the `/portfolios` resource and the public site endpoint.
//!
//! Owner-scoped routes live under `/portfolios`; the unauthenticated
//! published view is served from `/public/portfolios/{subdomain}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use folio_core::composition::{
    self, ResolvedSection, TemplateStructure, CUSTOM_CSS_SECTION,
};
use folio_core::error::CoreError;
use folio_core::publication::check_publishable;
use folio_core::subdomain;
use folio_core::types::DbId;
use folio_db::models::portfolio::{CreatePortfolio, Portfolio, UpdatePortfolio};
use folio_db::repositories::{PortfolioRepo, TemplateRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::services::assets::{AssetLifecycle, SlotRef};
use crate::state::AppState;

/// Load a portfolio and verify the caller may modify it.
///
/// Owners and admins pass; everyone else gets 403. A missing row is 404
/// regardless of caller, so ids are not probeable for ownership.
pub(crate) async fn load_owned(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Portfolio> {
    let portfolio = PortfolioRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Portfolio",
            id,
        }))?;

    if portfolio.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this portfolio".into(),
        )));
    }

    Ok(portfolio)
}

/// Fetch the structure of the template a portfolio references.
///
/// A portfolio without a template gets an empty structure: every section is
/// custom and no layouts or theme options exist.
async fn load_structure(state: &AppState, portfolio: &Portfolio) -> AppResult<TemplateStructure> {
    match portfolio.template_id {
        Some(template_id) => {
            let template = TemplateRepo::find_by_id(&state.pool, template_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Template",
                    id: template_id,
                }))?;
            Ok(template.structure.0)
        }
        None => Ok(TemplateStructure::default()),
    }
}

/// POST /api/v1/portfolios
///
/// Creates a draft. The subdomain is normalized to lowercase and
/// format-checked here; uniqueness is enforced by the database index, so a
/// concurrent duplicate surfaces as 409.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreatePortfolio>,
) -> AppResult<(StatusCode, Json<Portfolio>)> {
    let normalized = subdomain::normalize_and_validate(&input.subdomain)?;

    if let Some(template_id) = input.template_id {
        if !TemplateRepo::verify_exists(&state.pool, template_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Template",
                id: template_id,
            }));
        }
    }

    let portfolio = PortfolioRepo::create(&state.pool, user.user_id, &input, &normalized).await?;

    tracing::info!(
        portfolio_id = portfolio.id,
        user_id = user.user_id,
        subdomain = %portfolio.subdomain,
        "Portfolio created",
    );

    Ok((StatusCode::CREATED, Json(portfolio)))
}

/// GET /api/v1/portfolios
pub async fn list_own(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Portfolio>>> {
    let portfolios = PortfolioRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(portfolios))
}

/// GET /api/v1/portfolios/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Portfolio>> {
    let portfolio = load_owned(&state, &user, id).await?;
    Ok(Json(portfolio))
}

/// PATCH /api/v1/portfolios/{id}
///
/// Partial update. Field rules:
///
/// - `section_order` may be any duplicate-free list, including custom ids
///   and omissions.
/// - `active_layout` is validated against the template and resets
///   `section_order` to the layout's declared sections, discarding any
///   order sent in the same request.
/// - `active_color_scheme`/`active_font_pairing` are validated as a pair
///   against the template's theme options (a change may provide one and
///   inherit the other, but both must end up selected).
/// - `header_image` accepts only explicit `null`, which clears the slot and
///   deletes the stored object. New images go through the upload endpoint.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdatePortfolio>,
) -> AppResult<Json<Portfolio>> {
    let portfolio = load_owned(&state, &user, id).await?;

    if let Some(order) = &input.section_order {
        composition::validate_section_order(order)?;
    }

    let needs_structure = input.active_layout.is_some()
        || input.active_color_scheme.is_some()
        || input.active_font_pairing.is_some();
    if needs_structure {
        let structure = load_structure(&state, &portfolio).await?;

        if let Some(layout_id) = &input.active_layout {
            // A layout switch invalidates the old order wholesale.
            let sections = composition::apply_layout(&structure, layout_id)?;
            input.section_order = Some(sections);
        }

        if input.active_color_scheme.is_some() || input.active_font_pairing.is_some() {
            let color = input
                .active_color_scheme
                .as_deref()
                .or(portfolio.active_color_scheme.as_deref());
            let font = input
                .active_font_pairing
                .as_deref()
                .or(portfolio.active_font_pairing.as_deref());
            match (color, font) {
                (Some(color), Some(font)) => composition::validate_theme(&structure, color, font)?,
                _ => {
                    return Err(AppError::Core(CoreError::Validation(
                        "Selecting a theme requires both a color scheme and a font pairing".into(),
                    )))
                }
            }
        }
    }

    match input.header_image.take() {
        Some(Some(_)) => {
            return Err(AppError::BadRequest(
                "header_image cannot be set directly; use the header-image upload endpoint".into(),
            ))
        }
        Some(None) => {
            // Explicit null clears the slot and its stored object.
            // Idempotent: an already empty slot is left alone.
            if portfolio.header_image.is_some() {
                AssetLifecycle::from_state(&state)
                    .delete_asset(SlotRef::PortfolioHeader { portfolio_id: id })
                    .await?;
            }
        }
        None => {}
    }

    let updated = PortfolioRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Portfolio",
            id,
        }))?;

    Ok(Json(updated))
}

/// POST /api/v1/portfolios/{id}/publish
///
/// Transitions draft to published after the publish preconditions pass.
/// Publishing an already published portfolio is a no-op success.
pub async fn publish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Portfolio>> {
    let portfolio = load_owned(&state, &user, id).await?;

    check_publishable(&portfolio.title, Some(&portfolio.subdomain))?;

    let published = PortfolioRepo::set_published(&state.pool, id, true)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Portfolio",
            id,
        }))?;

    tracing::info!(portfolio_id = id, subdomain = %published.subdomain, "Portfolio published");

    Ok(Json(published))
}

/// POST /api/v1/portfolios/{id}/unpublish
///
/// Returns the portfolio to draft. The subdomain stays reserved to it, so
/// republishing later cannot be hijacked.
pub async fn unpublish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Portfolio>> {
    load_owned(&state, &user, id).await?;

    let draft = PortfolioRepo::set_published(&state.pool, id, false)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Portfolio",
            id,
        }))?;

    tracing::info!(portfolio_id = id, "Portfolio unpublished");

    Ok(Json(draft))
}

/// DELETE /api/v1/portfolios/{id}
///
/// Deletes every stored object the portfolio references (best effort), then
/// removes the row. The subdomain becomes available again.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let portfolio = load_owned(&state, &user, id).await?;

    AssetLifecycle::from_state(&state)
        .delete_all_portfolio_assets(&portfolio)
        .await;

    let deleted = PortfolioRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(portfolio_id = id, subdomain = %portfolio.subdomain, "Portfolio deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Portfolio",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Public site view
// ---------------------------------------------------------------------------

/// The render-ready composition of a published portfolio.
#[derive(Debug, Serialize)]
pub struct PublicPortfolio {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    /// Ordered sections with template defaults and overrides merged.
    pub sections: Vec<ResolvedSection>,
    /// Opaque custom CSS, if the portfolio carries any.
    pub custom_css: Option<serde_json::Value>,
}

/// GET /api/v1/public/portfolios/{subdomain}
///
/// Serves a published portfolio by subdomain (case-insensitive) and counts
/// the view in the same statement. Drafts and unknown subdomains are both
/// 404 so draft existence is not leaked.
pub async fn public_read(
    State(state): State<AppState>,
    Path(subdomain_value): Path<String>,
) -> AppResult<Json<PublicPortfolio>> {
    let portfolio = PortfolioRepo::public_read_by_subdomain(&state.pool, &subdomain_value)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No published portfolio at '{subdomain_value}'")))?;

    let structure = load_structure(&state, &portfolio).await?;

    let content = portfolio
        .content
        .as_object()
        .cloned()
        .unwrap_or_default();

    let sections = composition::resolve_sections(
        &structure,
        &content,
        &portfolio.section_order,
        portfolio.active_layout.as_deref(),
    );

    let custom_css = content.get(CUSTOM_CSS_SECTION).cloned();

    Ok(Json(PublicPortfolio {
        portfolio,
        sections,
        custom_css,
    }))
}
