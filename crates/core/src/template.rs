//! Template catalog rules: categories, review ratings, and the derived
//! rating summary.

use crate::error::CoreError;

/// Template category enum matching the `category` column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCategory {
    Professional,
    Creative,
    Minimal,
    Modern,
    Other,
}

impl TemplateCategory {
    /// Parse from the database `category` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "professional" => Ok(Self::Professional),
            "creative" => Ok(Self::Creative),
            "minimal" => Ok(Self::Minimal),
            "modern" => Ok(Self::Modern),
            "other" => Ok(Self::Other),
            other => Err(CoreError::Validation(format!(
                "Unknown template category '{other}'. Must be one of: professional, creative, minimal, modern, other"
            ))),
        }
    }

    /// Database name value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Creative => "creative",
            Self::Minimal => "minimal",
            Self::Modern => "modern",
            Self::Other => "other",
        }
    }
}

/// Validate a review rating is within the 1-5 range.
pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between 1 and 5, got {rating}"
        )))
    }
}

/// Rating summary derived from a template's reviews.
///
/// `average` is the mean rating rounded to 1 decimal; `count` is the number
/// of reviews. Recomputed transactionally whenever a review is written.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

/// Recompute the rating summary from the full list of review ratings.
pub fn recompute_rating(ratings: &[i16]) -> RatingSummary {
    if ratings.is_empty() {
        return RatingSummary {
            average: 0.0,
            count: 0,
        };
    }
    let sum: i64 = ratings.iter().map(|&r| r as i64).sum();
    let mean = sum as f64 / ratings.len() as f64;
    RatingSummary {
        average: (mean * 10.0).round() / 10.0,
        count: ratings.len() as i64,
    }
}
