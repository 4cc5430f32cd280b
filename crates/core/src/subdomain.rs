//! Subdomain normalization and validation.
//!
//! A subdomain is the public address of a published portfolio
//! (`{subdomain}.example.com`), so the rules here back a global uniqueness
//! guarantee: lowercase, `[a-z0-9-]`, 3-30 characters, no leading/trailing
//! hyphen, and not on the reserved list.

use crate::error::CoreError;

/// Minimum subdomain length.
pub const MIN_LEN: usize = 3;

/// Maximum subdomain length.
pub const MAX_LEN: usize = 30;

/// Names that can never be claimed as a portfolio subdomain.
const RESERVED: &[&str] = &["www", "api", "admin", "app", "mail"];

/// Lowercase and trim a raw subdomain value.
///
/// Normalization happens before validation and before any uniqueness check,
/// so `"Jane-Doe"` and `"jane-doe"` are the same address.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate an already-normalized subdomain.
///
/// Rules: 3-30 characters from `[a-z0-9-]`, must start and end with an
/// alphanumeric character, and must not be a reserved name.
pub fn validate(subdomain: &str) -> Result<(), CoreError> {
    if subdomain.len() < MIN_LEN || subdomain.len() > MAX_LEN {
        return Err(CoreError::Validation(format!(
            "Subdomain must be {MIN_LEN}-{MAX_LEN} characters, got {}",
            subdomain.len()
        )));
    }

    if !subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Subdomain may only contain lowercase letters, digits, and hyphens".into(),
        ));
    }

    // `len >= 3` guarantees first/last exist.
    if subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(CoreError::Validation(
            "Subdomain must not start or end with a hyphen".into(),
        ));
    }

    if RESERVED.contains(&subdomain) {
        return Err(CoreError::Validation(format!(
            "Subdomain '{subdomain}' is reserved"
        )));
    }

    Ok(())
}

/// Normalize and validate in one step, returning the normalized value.
pub fn normalize_and_validate(raw: &str) -> Result<String, CoreError> {
    let normalized = normalize(raw);
    validate(&normalized)?;
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_name() {
        assert!(validate("jane-doe").is_ok());
    }

    #[test]
    fn accepts_digits() {
        assert!(validate("portfolio2024").is_ok());
    }

    #[test]
    fn rejects_too_short() {
        assert!(validate("ab").is_err());
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(MAX_LEN + 1);
        assert!(validate(&long).is_err());
    }

    #[test]
    fn accepts_boundary_lengths() {
        assert!(validate(&"a".repeat(MIN_LEN)).is_ok());
        assert!(validate(&"a".repeat(MAX_LEN)).is_ok());
    }

    #[test]
    fn rejects_uppercase() {
        // Uppercase must be normalized away before validate is called.
        assert!(validate("Jane-Doe").is_err());
    }

    #[test]
    fn rejects_special_characters() {
        assert!(validate("jane_doe").is_err());
        assert!(validate("jane.doe").is_err());
        assert!(validate("jane doe").is_err());
    }

    #[test]
    fn rejects_leading_or_trailing_hyphen() {
        assert!(validate("-jane").is_err());
        assert!(validate("jane-").is_err());
    }

    #[test]
    fn rejects_reserved_names() {
        assert!(validate("www").is_err());
        assert!(validate("api").is_err());
        assert!(validate("admin").is_err());
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Jane-Doe "), "jane-doe");
    }

    #[test]
    fn normalize_and_validate_round_trip() {
        assert_eq!(normalize_and_validate("Jane-Doe").unwrap(), "jane-doe");
        assert!(normalize_and_validate("  WWW ").is_err());
    }
}
