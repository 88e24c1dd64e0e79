use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Field-level validation messages, keyed by the JSON field they refer to.
/// Problems that span several fields go under `non_field_errors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Trims a required text field and checks its length, recording any problem
/// against `field`. Returns the trimmed value when it is usable.
pub(crate) fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Option<String> {
    let Some(value) = value else {
        errors.add(field, "This field is required.");
        return None;
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field may not be blank.");
        return None;
    }
    if trimmed.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {max_len} characters."),
        );
        return None;
    }

    Some(trimmed.to_string())
}

pub(crate) fn missing(errors: &mut FieldErrors, field: &str) {
    errors.add(field, "This field is required.");
}
