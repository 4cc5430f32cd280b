//! Portfolio composition: merging a template's structure with a portfolio's
//! per-section overrides into one renderable document.
//!
//! Section content is an opaque `serde_json::Value` at this layer. Each
//! section type has its own internal shape, but interpreting it belongs to
//! the render boundary, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reserved section key holding the portfolio's custom CSS as an opaque
/// string. Never interpreted or sanitized at this layer.
pub const CUSTOM_CSS_SECTION: &str = "custom-css";

// ---------------------------------------------------------------------------
// Template structure types
// ---------------------------------------------------------------------------

/// One selectable layout within a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDef {
    pub id: String,
    /// Section ids this layout declares, in render order.
    pub sections: Vec<String>,
    /// Grid system identifier (e.g. `"12-col"`), opaque to this layer.
    pub grid_system: String,
}

/// A named color scheme offered by a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    pub id: String,
    pub colors: serde_json::Value,
}

/// A named font pairing offered by a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontPairing {
    pub id: String,
    pub fonts: serde_json::Value,
}

/// Theme options a template offers: color schemes and font pairings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeOptions {
    #[serde(default)]
    pub color_schemes: Vec<ColorScheme>,
    #[serde(default)]
    pub font_pairings: Vec<FontPairing>,
}

/// The structural definition of a template, stored as one JSONB document.
///
/// `section_definitions` maps section ids to their default content.
/// `default_sections` is the fallback section order when a portfolio has
/// neither a custom order nor an active layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateStructure {
    #[serde(default)]
    pub default_sections: Vec<String>,
    #[serde(default)]
    pub layouts: Vec<LayoutDef>,
    #[serde(default)]
    pub theme_options: ThemeOptions,
    #[serde(default)]
    pub section_definitions: BTreeMap<String, serde_json::Value>,
}

impl TemplateStructure {
    /// Find a layout by id.
    pub fn layout(&self, layout_id: &str) -> Option<&LayoutDef> {
        self.layouts.iter().find(|l| l.id == layout_id)
    }
}

// ---------------------------------------------------------------------------
// Section resolution
// ---------------------------------------------------------------------------

/// One entry of the resolved, render-ready section list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSection {
    pub section_id: String,
    pub content: serde_json::Value,
}

/// Merge template defaults with portfolio overrides into an ordered section
/// list.
///
/// Content precedence per section: portfolio override, then the template's
/// section definition default, then `{}`.
///
/// Order precedence: the portfolio's `section_order` when non-empty, else
/// the active layout's declared sections, else the template's default
/// structure. Ids unknown to the template are tolerated as custom sections.
///
/// The reserved custom-CSS section is excluded from the resolved list; it is
/// styling, not a renderable section.
pub fn resolve_sections(
    structure: &TemplateStructure,
    content: &serde_json::Map<String, serde_json::Value>,
    section_order: &[String],
    active_layout: Option<&str>,
) -> Vec<ResolvedSection> {
    let order: Vec<String> = if !section_order.is_empty() {
        section_order.to_vec()
    } else if let Some(layout) = active_layout.and_then(|id| structure.layout(id)) {
        layout.sections.clone()
    } else {
        structure.default_sections.clone()
    };

    order
        .into_iter()
        .filter(|id| id != CUSTOM_CSS_SECTION)
        .map(|section_id| {
            let resolved = content
                .get(&section_id)
                .cloned()
                .or_else(|| structure.section_definitions.get(&section_id).cloned())
                .unwrap_or_else(|| serde_json::json!({}));
            ResolvedSection {
                section_id,
                content: resolved,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Layout / theme selection
// ---------------------------------------------------------------------------

/// Validate a layout id and return the section order it declares.
///
/// A layout change invalidates any order computed for a different grid, so
/// the caller replaces the portfolio's `section_order` wholesale with the
/// returned list.
pub fn apply_layout(structure: &TemplateStructure, layout_id: &str) -> Result<Vec<String>, CoreError> {
    let layout = structure.layout(layout_id).ok_or_else(|| {
        CoreError::Validation(format!("Layout '{layout_id}' does not exist in this template"))
    })?;
    Ok(layout.sections.clone())
}

/// Validate that both theme references exist in the template's options.
///
/// Never substitutes a default: an unknown id is an error the editor must
/// surface.
pub fn validate_theme(
    structure: &TemplateStructure,
    color_scheme_id: &str,
    font_pairing_id: &str,
) -> Result<(), CoreError> {
    if !structure
        .theme_options
        .color_schemes
        .iter()
        .any(|c| c.id == color_scheme_id)
    {
        return Err(CoreError::Validation(format!(
            "Color scheme '{color_scheme_id}' does not exist in this template"
        )));
    }

    if !structure
        .theme_options
        .font_pairings
        .iter()
        .any(|f| f.id == font_pairing_id)
    {
        return Err(CoreError::Validation(format!(
            "Font pairing '{font_pairing_id}' does not exist in this template"
        )));
    }

    Ok(())
}

/// Validate a caller-provided section order.
///
/// Any subset or permutation is accepted, including ids unknown to the
/// template (custom sections) and omissions (a user may hide a section
/// without deleting its content). Only duplicates are rejected.
pub fn validate_section_order(new_order: &[String]) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for id in new_order {
        if !seen.insert(id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate section id '{id}' in section order"
            )));
        }
    }
    Ok(())
}
