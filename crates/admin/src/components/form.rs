//! Mutation form component.
//!
//! Forms post `application/x-www-form-urlencoded` bodies that arrive as a
//! [`FormValues`] map. Validation failures re-render the same dialog with the
//! submitted values and inline [`FieldErrors`].

use std::collections::BTreeMap;

use freightdesk_core::FieldErrors;
use freightdesk_core::validation::GENERAL;
use serde::Serialize;

/// Submitted form values keyed by field name.
pub type FormValues = BTreeMap<String, String>;

/// Input control for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    /// Never prefilled.
    Password,
    Number,
    TextArea,
    /// Dropdown over `(value, label)` pairs.
    Select(&'static [(&'static str, &'static str)]),
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: &'static str,
}

impl FormField {
    #[must_use]
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: false,
            placeholder: "",
        }
    }

    #[must_use]
    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

/// One `<option>` of a select field.
#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Field with its current value and errors.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    /// `text`, `email`, `number`, `textarea` or `select`.
    pub input: &'static str,
    pub required: bool,
    pub placeholder: &'static str,
    pub value: String,
    pub options: Vec<OptionView>,
    pub errors: Vec<String>,
}

/// Render model of a create or update form.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub action: String,
    pub submit_label: String,
    pub fields: Vec<FieldView>,
    /// Errors not tied to a field.
    pub general_errors: Vec<String>,
}

impl FormView {
    #[must_use]
    pub fn build(
        fields: &[FormField],
        action: impl Into<String>,
        submit_label: impl Into<String>,
        values: &FormValues,
        errors: &FieldErrors,
    ) -> Self {
        let fields = fields
            .iter()
            .map(|field| {
                let value = match field.kind {
                    FieldKind::Password => String::new(),
                    _ => values.get(field.name).cloned().unwrap_or_default(),
                };
                let (input, options) = match field.kind {
                    FieldKind::Text => ("text", Vec::new()),
                    FieldKind::Email => ("email", Vec::new()),
                    FieldKind::Password => ("password", Vec::new()),
                    FieldKind::Number => ("number", Vec::new()),
                    FieldKind::TextArea => ("textarea", Vec::new()),
                    FieldKind::Select(choices) => (
                        "select",
                        choices
                            .iter()
                            .map(|&(v, label)| OptionView {
                                value: v,
                                label,
                                selected: v == value,
                            })
                            .collect(),
                    ),
                };
                FieldView {
                    name: field.name,
                    label: field.label,
                    input,
                    required: field.required,
                    placeholder: field.placeholder,
                    errors: errors.get(field.name).to_vec(),
                    value,
                    options,
                }
            })
            .collect();

        Self {
            action: action.into(),
            submit_label: submit_label.into(),
            fields,
            general_errors: errors.get(GENERAL).to_vec(),
        }
    }
}

/// Trimmed value of `field`, empty when absent.
#[must_use]
pub fn value<'a>(values: &'a FormValues, field: &str) -> &'a str {
    values.get(field).map_or("", |v| v.trim())
}
