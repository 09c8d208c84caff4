//! Form validation helpers
//!
//! The payload types derive `validator::Validate`. This module holds the
//! custom rules they reference and a flattened error type that both the
//! client (inline form errors) and the API service (422 responses) report.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use validator::{Validate, ValidationError, ValidationErrors};

/// Validate a URL slug: lowercase letters and digits separated by single dashes
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Failed to compile slug regex")
    });

    if slug.is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("Slug is required".into());
        return Err(error);
    }

    if !regex.is_match(slug) {
        let mut error = ValidationError::new("slug");
        error.message =
            Some("Slug may only contain lowercase letters, numbers, and dashes".into());
        return Err(error);
    }

    Ok(())
}

/// Derive a slug from a display name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

pub(crate) fn default_true() -> bool {
    true
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// First message reported for `field`
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errors) in errors.field_errors() {
            for error in errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.add(field.to_string(), message);
            }
        }
        fields
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Run the derived validation and flatten the result
pub fn check<T: Validate>(value: &T) -> Result<(), FieldErrors> {
    value.validate().map_err(FieldErrors::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCategory;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("weddings").is_ok());
        assert!(validate_slug("pre-wedding-2024").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Weddings").is_err());
        assert!(validate_slug("double--dash").is_err());
        assert!(validate_slug("-leading").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Pre Wedding & Engagement "), "pre-wedding-engagement");
        assert_eq!(slugify("Portraits"), "portraits");
    }

    #[test]
    fn test_check_flattens_messages() {
        let category = NewCategory {
            name: String::new(),
            slug: "Bad Slug".to_string(),
            description: None,
            is_active: true,
            sort_order: -1,
        };

        let errors = check(&category).unwrap_err();
        assert_eq!(errors.first("name"), Some("Name is required"));
        assert!(errors.contains("slug"));
        assert!(errors.contains("sort_order"));
        assert!(errors.to_string().contains("name: Name is required"));
    }
}
