//! Publish preconditions for the draft/published lifecycle.
//!
//! Both states are long-lived and mutually reachable. Unpublishing never
//! releases the subdomain; it stays reserved to the portfolio so
//! republishing is idempotent and cannot be hijacked in the interim.

use crate::error::CoreError;
use crate::subdomain;

/// Check that a portfolio may transition from draft to published.
///
/// Requires a non-empty title and a set, format-valid subdomain. Subdomain
/// uniqueness is NOT checked here: that race belongs to the database's
/// unique index at write time, not an application-level check-then-act.
pub fn check_publishable(title: &str, subdomain_value: Option<&str>) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "A title is required before publishing".into(),
        ));
    }

    let value = subdomain_value.ok_or_else(|| {
        CoreError::Validation("A subdomain is required before publishing".into())
    })?;
    subdomain::validate(value)?;

    Ok(())
}
