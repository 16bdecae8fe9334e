//! Generic form state for entity editors.
//!
//! A [`FormState`] holds text fields and ordered string lists described by a
//! [`FormSchema`]. Every edit revalidates the touched field (and the fields
//! linked to it); [`FormState::validate_all`] runs the full pass before a
//! submission. Validation is a pure function of the current values, so
//! validating unchanged input always yields the same errors.

mod event_form;
mod rules;
mod user_form;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use event_form::{EventForm, EventSchema};
pub use rules::{Rule, TIME_RANGE_MESSAGE};
pub use user_form::{LoginForm, LoginSchema, UserForm, UserFormMode, UserSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire/field name, also the key of validation errors.
    pub name: &'static str,
    /// Portuguese label used in messages.
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str, rules: &'static [Rule]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            rules,
        }
    }

    pub const fn list(name: &'static str, label: &'static str, rules: &'static [Rule]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::List,
            rules,
        }
    }
}

pub trait FormSchema {
    fn fields(&self) -> &'static [FieldSpec];

    /// Errors that depend on more than one field, keyed by field name.
    fn cross_field_errors(&self, _values: &FormValues) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Fields whose validity changes when `field` changes.
    fn linked_fields(&self, _field: &str) -> &'static [&'static str] {
        &[]
    }

    fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }
}

/// Field-name → message map. Ordered, so equal inputs compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),
    #[error("Field '{0}' is a list; use the item operations")]
    NotText(String),
    #[error("Field '{0}' is not a list")]
    NotAList(String),
    #[error("Index {index} out of range for '{field}' ({len} items)")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },
    #[error("Form has invalid fields: {0}")]
    Invalid(ValidationErrors),
}

/// Raw values of a form: text fields and string lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    text: BTreeMap<&'static str, String>,
    lists: BTreeMap<&'static str, Vec<String>>,
}

impl FormValues {
    /// Trimmed text of a field; empty when unset or unknown.
    pub fn text(&self, name: &str) -> &str {
        self.text.get(name).map_or("", |value| value.trim())
    }

    pub fn list(&self, name: &str) -> &[String] {
        self.lists.get(name).map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug, Clone)]
pub struct FormState<S: FormSchema> {
    schema: S,
    values: FormValues,
    errors: ValidationErrors,
}

impl<S: FormSchema> FormState<S> {
    pub fn new(schema: S) -> Self {
        let mut values = FormValues::default();
        for spec in schema.fields() {
            match spec.kind {
                FieldKind::Text => {
                    values.text.insert(spec.name, String::new());
                }
                FieldKind::List => {
                    values.lists.insert(spec.name, Vec::new());
                }
            }
        }
        Self {
            schema,
            values,
            errors: ValidationErrors::new(),
        }
    }

    pub const fn schema(&self) -> &S {
        &self.schema
    }

    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.text.get(name).map(String::as_str)
    }

    pub fn items(&self, name: &str) -> Option<&[String]> {
        self.values.lists.get(name).map(Vec::as_slice)
    }

    /// Set a text field and revalidate it.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let spec = self.spec(name, FieldKind::Text)?;
        self.values.text.insert(spec.name, value.into());
        self.revalidate(spec.name);
        Ok(())
    }

    /// Replace a whole list, e.g. when pre-filling an edit form.
    pub fn set_items(&mut self, name: &str, items: Vec<String>) -> Result<(), FormError> {
        let spec = self.spec(name, FieldKind::List)?;
        self.values.lists.insert(spec.name, items);
        self.revalidate(spec.name);
        Ok(())
    }

    /// Append an item; returns its index. Duplicates are allowed.
    pub fn push_item(&mut self, name: &str, value: impl Into<String>) -> Result<usize, FormError> {
        let spec = self.spec(name, FieldKind::List)?;
        let list = self.values.lists.entry(spec.name).or_default();
        list.push(value.into());
        let index = list.len() - 1;
        self.revalidate(spec.name);
        Ok(index)
    }

    pub fn update_item(
        &mut self,
        name: &str,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let spec = self.spec(name, FieldKind::List)?;
        let list = self.values.lists.entry(spec.name).or_default();
        let len = list.len();
        let slot = list.get_mut(index).ok_or_else(|| FormError::IndexOutOfRange {
            field: spec.name.to_string(),
            index,
            len,
        })?;
        *slot = value.into();
        self.revalidate(spec.name);
        Ok(())
    }

    /// Remove the item at `index`; later items shift down by one.
    pub fn remove_item(&mut self, name: &str, index: usize) -> Result<String, FormError> {
        let spec = self.spec(name, FieldKind::List)?;
        let list = self.values.lists.entry(spec.name).or_default();
        if index >= list.len() {
            return Err(FormError::IndexOutOfRange {
                field: spec.name.to_string(),
                index,
                len: list.len(),
            });
        }
        let removed = list.remove(index);
        self.revalidate(spec.name);
        Ok(removed)
    }

    /// Current error for one field, computed from the values alone.
    pub fn validate_field(&self, name: &str) -> Option<String> {
        let spec = self.schema.field(name)?;
        let own = match spec.kind {
            FieldKind::Text => {
                let value = self.values.text(spec.name);
                spec.rules
                    .iter()
                    .find_map(|rule| rule.check_text(spec.label, value))
            }
            FieldKind::List => {
                let items = self.values.list(spec.name);
                spec.rules
                    .iter()
                    .find_map(|rule| rule.check_list(spec.label, items))
            }
        };
        own.or_else(|| {
            self.schema
                .cross_field_errors(&self.values)
                .into_iter()
                .find(|(field, _)| *field == spec.name)
                .map(|(_, message)| message)
        })
    }

    /// Full validation pass before submission.
    pub fn validate_all(&mut self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for spec in self.schema.fields() {
            if let Some(message) = self.validate_field(spec.name) {
                errors.insert(spec.name, message);
            }
        }
        self.errors = errors;
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.clone())
        }
    }

    pub fn is_valid(&self) -> bool {
        self.schema
            .fields()
            .iter()
            .all(|spec| self.validate_field(spec.name).is_none())
    }

    fn revalidate(&mut self, name: &'static str) {
        let linked = self.schema.linked_fields(name);
        for field in std::iter::once(name).chain(linked.iter().copied()) {
            match self.validate_field(field) {
                Some(message) => self.errors.insert(field, message),
                None => self.errors.remove(field),
            }
        }
    }

    fn spec(&self, name: &str, expected: FieldKind) -> Result<&'static FieldSpec, FormError> {
        let spec = self
            .schema
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if spec.kind == expected {
            Ok(spec)
        } else if expected == FieldKind::List {
            Err(FormError::NotAList(name.to_string()))
        } else {
            Err(FormError::NotText(name.to_string()))
        }
    }
}
