//! Reference string helpers shared by the builders.

use crate::{RulerError, RulerResult};

/// Resource types a Composition author may point at.
pub const AUTHOR_RESOURCE_TYPES: [&str; 6] = [
    "Practitioner",
    "PractitionerRole",
    "Device",
    "Patient",
    "RelatedPerson",
    "Organization",
];

/// Prefix a bare id with `resource_type/`.
///
/// Empty values and values already starting with `resource_type/` are returned unchanged.
pub fn normalize_reference(resource_type: &str, value: String) -> String {
    if value.is_empty() {
        return value;
    }

    match value.strip_prefix(resource_type) {
        Some(rest) if rest.starts_with('/') => value,
        _ => format!("{resource_type}/{value}"),
    }
}

/// Check that `author` begins with one of [`AUTHOR_RESOURCE_TYPES`].
///
/// This is a plain prefix test: `Practitioner`, `Practitioner/a1` and `Patient123` all pass.
///
/// # Errors
///
/// Returns [`RulerError::InvalidAuthor`] otherwise.
pub fn validate_author_reference(author: &str) -> RulerResult<()> {
    let valid = AUTHOR_RESOURCE_TYPES
        .iter()
        .any(|resource_type| author.starts_with(resource_type));

    if !valid {
        tracing::warn!(author, "rejected Composition author reference");
        return Err(RulerError::InvalidAuthor(author.to_string()));
    }

    Ok(())
}
