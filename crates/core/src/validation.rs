//! Form field errors.
//!
//! Errors come from two places: local checks before a mutation is sent, and
//! the backend's validation extension, keyed by input path such as
//! `input.exchangeRate`. Both end up in [`FieldErrors`] keyed by form field
//! name so they can be shown inline next to the field.

use std::collections::BTreeMap;

use serde::Serialize;

/// Bucket for messages that do not belong to any known form field.
pub const GENERAL: &str = "_general";

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the backend's validation extension onto form fields.
    ///
    /// Keys are stripped of their `input.` prefix and converted from
    /// `camelCase` to `snake_case`. Keys that match no entry of `fields` are
    /// reported under [`GENERAL`].
    #[must_use]
    pub fn from_backend<I, M>(validation: I, fields: &[&str]) -> Self
    where
        I: IntoIterator<Item = (String, M)>,
        M: IntoIterator<Item = String>,
    {
        let mut errors = Self::new();
        for (key, messages) in validation {
            let field = backend_field_name(&key);
            let target = if fields.contains(&field.as_str()) {
                field
            } else {
                GENERAL.to_string()
            };
            for message in messages {
                errors.add(&target, message);
            }
        }
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Messages for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// First message for `field`.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// Messages not tied to a known field.
    #[must_use]
    pub fn general(&self) -> &[String] {
        self.get(GENERAL)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when empty, the errors otherwise.
    ///
    /// # Errors
    ///
    /// Returns `self` when any message was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    // =========================================================================
    // Local checks
    // =========================================================================

    /// Record an error when `value` is blank.
    pub fn required(&mut self, field: &str, label: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.add(field, format!("The {label} field is required."));
        }
        self
    }

    /// Record an error when `value` is longer than `max` characters.
    pub fn max_length(&mut self, field: &str, label: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.add(
                field,
                format!("The {label} may not be greater than {max} characters."),
            );
        }
        self
    }

    /// Record an error when a non-blank `value` is not exactly `len` characters.
    pub fn exact_length(&mut self, field: &str, label: &str, value: &str, len: usize) -> &mut Self {
        let value = value.trim();
        if !value.is_empty() && value.chars().count() != len {
            self.add(field, format!("The {label} must be {len} characters."));
        }
        self
    }

    /// Record an error when a non-blank `value` is not among `allowed`.
    pub fn one_of(&mut self, field: &str, label: &str, value: &str, allowed: &[&str]) -> &mut Self {
        if !value.is_empty() && !allowed.contains(&value) {
            self.add(field, format!("The selected {label} is invalid."));
        }
        self
    }
}

/// Form field name for a backend input path.
///
/// `input.exchangeRate` becomes `exchange_rate`; nested paths keep their
/// dots (`input.address.postCode` becomes `address.post_code`).
#[must_use]
pub fn backend_field_name(key: &str) -> String {
    let path = key.strip_prefix("input.").unwrap_or(key);
    path.split('.')
        .map(camel_to_snake)
        .collect::<Vec<_>>()
        .join(".")
}

fn camel_to_snake(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    for (i, c) in segment.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_field_name() {
        assert_eq!(backend_field_name("input.name"), "name");
        assert_eq!(backend_field_name("input.exchangeRate"), "exchange_rate");
        assert_eq!(backend_field_name("code"), "code");
        assert_eq!(backend_field_name("input.address.postCode"), "address.post_code");
    }

    #[test]
    fn test_from_backend_maps_known_fields_and_collects_the_rest() {
        let errors = FieldErrors::from_backend(
            vec![
                (
                    "input.code".to_string(),
                    vec!["The code has already been taken.".to_string()],
                ),
                (
                    "input.exchangeRate".to_string(),
                    vec!["The exchange rate must be a number.".to_string()],
                ),
                ("input.tenant".to_string(), vec!["Tenant mismatch.".to_string()]),
            ],
            &["code", "exchange_rate", "name"],
        );

        assert_eq!(errors.first("code"), Some("The code has already been taken."));
        assert_eq!(errors.get("exchange_rate").len(), 1);
        assert_eq!(errors.general(), &["Tenant mismatch.".to_string()]);
        assert!(errors.get("name").is_empty());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_local_checks() {
        let mut errors = FieldErrors::new();
        errors
            .required("name", "name", "  ")
            .max_length("code", "code", "ABCDEFGHIJK", 10)
            .exact_length("currency", "currency", "EU", 3)
            .one_of("status", "status", "gone", &["active", "inactive"]);

        assert_eq!(errors.first("name"), Some("The name field is required."));
        assert!(errors.first("code").is_some());
        assert!(errors.first("currency").is_some());
        assert!(errors.first("status").is_some());
        assert!(errors.clone().into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_merge_appends_messages() {
        let mut a = FieldErrors::new();
        a.add("name", "one");
        let mut b = FieldErrors::new();
        b.add("name", "two");
        b.add("code", "three");
        a.merge(b);
        assert_eq!(a.get("name"), &["one".to_string(), "two".to_string()]);
        assert_eq!(a.len(), 3);
    }
}
