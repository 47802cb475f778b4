//! Create/edit modal shared by every entity screen.
//!
//! The modal goes `closed -> open -> closed`. While open it holds one string
//! per form field exactly as typed; coercion to JSON types happens only when
//! a submission is built, after validation has passed.

use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::dates::{parse_calendar_date, parse_record_date};
use crate::error::FormError;
use crate::operator::Operator;
use crate::record::{Record, RecordId};
use crate::resource::{ChoiceSource, EntityProfile, FieldKind, FieldSpec};

/// Whether the modal creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

impl FormMode {
    pub fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "created",
            FormMode::Edit(_) => "updated",
        }
    }
}

/// Leave type name to its day allowance, from the leave-type reference list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedLookup {
    days_by_type: HashMap<String, String>,
}

impl DerivedLookup {
    pub fn from_leave_types(leave_types: &[Record]) -> Self {
        let days_by_type = leave_types
            .iter()
            .filter_map(|lt| Some((lt.text("leave_type")?, lt.text("days")?)))
            .collect();
        Self { days_by_type }
    }

    pub fn resolve(&self, leave_type: &str) -> Option<&str> {
        self.days_by_type.get(leave_type.trim()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.days_by_type.is_empty()
    }
}

/// A validated submission ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub mode: FormMode,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
struct OpenForm {
    mode: FormMode,
    values: Vec<String>,
    focus: usize,
    original: Option<Record>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormModal {
    profile: &'static EntityProfile,
    lookup: DerivedLookup,
    open: Option<OpenForm>,
}

impl FormModal {
    pub fn new(profile: &'static EntityProfile) -> Self {
        Self {
            profile,
            lookup: DerivedLookup::default(),
            open: None,
        }
    }

    pub fn profile(&self) -> &'static EntityProfile {
        self.profile
    }

    pub fn set_lookup(&mut self, lookup: DerivedLookup) {
        self.lookup = lookup;
        if let Some(open) = self.open.as_mut() {
            derive_fields(self.profile, &self.lookup, &mut open.values);
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn mode(&self) -> Option<&FormMode> {
        self.open.as_ref().map(|o| &o.mode)
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.profile.form
    }

    /// Open with the empty template.
    pub fn open_create(&mut self) {
        self.open = Some(OpenForm {
            mode: FormMode::Create,
            values: vec![String::new(); self.profile.form.len()],
            focus: first_editable(self.profile),
            original: None,
        });
    }

    /// Open prefilled from an existing record.
    pub fn open_edit(&mut self, record: &Record) {
        let mut values: Vec<String> = self
            .profile
            .form
            .iter()
            .map(|field| prefill(field, record))
            .collect();
        derive_fields(self.profile, &self.lookup, &mut values);
        self.open = Some(OpenForm {
            mode: FormMode::Edit(record.id().clone()),
            values,
            focus: first_editable(self.profile),
            original: Some(record.clone()),
        });
    }

    /// Close and drop everything typed so far.
    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        let open = self.open.as_ref()?;
        let index = self.index_of(name)?;
        open.values.get(index).map(String::as_str)
    }

    /// Set a field. Read-only and unknown fields are left untouched.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        let Some(index) = self.index_of(name) else {
            return false;
        };
        if self.profile.form[index].is_read_only() {
            return false;
        }
        let Some(open) = self.open.as_mut() else {
            return false;
        };
        open.values[index] = value.into();
        derive_fields(self.profile, &self.lookup, &mut open.values);
        true
    }

    pub fn focused(&self) -> Option<&'static FieldSpec> {
        let open = self.open.as_ref()?;
        self.profile.form.get(open.focus)
    }

    pub fn focused_value(&self) -> Option<&str> {
        let open = self.open.as_ref()?;
        open.values.get(open.focus).map(String::as_str)
    }

    pub fn focus_next(&mut self) {
        let len = self.profile.form.len();
        if let Some(open) = self.open.as_mut() {
            if len > 0 {
                open.focus = (open.focus + 1) % len;
            }
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.profile.form.len();
        if let Some(open) = self.open.as_mut() {
            if len > 0 {
                open.focus = if open.focus == 0 { len - 1 } else { open.focus - 1 };
            }
        }
    }

    /// Append a typed character to the focused free-text field.
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.focused() {
            if matches!(field.kind, FieldKind::Text | FieldKind::Number | FieldKind::Date) {
                let mut value = self.focused_value().unwrap_or_default().to_string();
                value.push(c);
                self.set_value(field.name, value);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.focused() {
            if matches!(field.kind, FieldKind::Text | FieldKind::Number | FieldKind::Date) {
                let mut value = self.focused_value().unwrap_or_default().to_string();
                value.pop();
                self.set_value(field.name, value);
            }
        }
    }

    /// Step the focused choice field through `options` (stored values).
    pub fn cycle_choice(&mut self, options: &[String], forward: bool) {
        let Some(field) = self.focused() else {
            return;
        };
        if !matches!(field.kind, FieldKind::Choice(_)) || options.is_empty() {
            return;
        }
        let current = self.focused_value().unwrap_or_default();
        let next = match options.iter().position(|o| o == current) {
            Some(i) if forward => (i + 1) % options.len(),
            Some(0) => options.len() - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.set_value(field.name, options[next].clone());
    }

    /// Check required, numeric and date fields. The first failure wins.
    pub fn validate(&self) -> Result<(), FormError> {
        let open = self.open.as_ref().ok_or(FormError::NotOpen)?;
        for (field, raw) in self.profile.form.iter().zip(&open.values) {
            let value = raw.trim();
            if value.is_empty() {
                if field.required {
                    return Err(FormError::RequiredFieldMissing {
                        field: field.name.to_string(),
                        label: field.label.to_string(),
                    });
                }
                continue;
            }
            match field.kind {
                FieldKind::Number | FieldKind::Derived { .. } if parse_number(value).is_none() => {
                    return Err(FormError::NotANumber {
                        field: field.name.to_string(),
                        label: field.label.to_string(),
                    });
                }
                FieldKind::Date if parse_calendar_date(value).is_none() => {
                    return Err(FormError::NotADate {
                        field: field.name.to_string(),
                        label: field.label.to_string(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate and build the request body.
    ///
    /// Fields the form does not expose (line items, reference codes) are
    /// carried over from the record being edited. Empty optional fields are
    /// omitted on create and cleared to `null` on edit.
    pub fn submission(&self, operator: &Operator) -> Result<Submission, FormError> {
        self.validate()?;
        let open = self.open.as_ref().ok_or(FormError::NotOpen)?;

        let mut body: Map<String, Value> = open
            .original
            .as_ref()
            .map(|r| r.fields().clone())
            .unwrap_or_default();

        for (field, raw) in self.profile.form.iter().zip(&open.values) {
            let value = raw.trim();
            if value.is_empty() {
                match open.mode {
                    FormMode::Create => {
                        body.remove(field.name);
                    }
                    FormMode::Edit(_) => {
                        body.insert(field.name.to_string(), Value::Null);
                    }
                }
                continue;
            }
            body.insert(field.name.to_string(), coerce(field, value));
        }

        if open.mode == FormMode::Create {
            body.remove(self.profile.id_field);
            if self.profile.stamps_operator && !body.contains_key("user_id") {
                body.insert("user_id".to_string(), operator.id.to_value());
            }
        }

        Ok(Submission {
            mode: open.mode.clone(),
            body: Value::Object(body),
        })
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.profile.form.iter().position(|f| f.name == name)
    }
}

fn first_editable(profile: &EntityProfile) -> usize {
    profile
        .form
        .iter()
        .position(|f| !f.is_read_only())
        .unwrap_or(0)
}

fn derive_fields(profile: &EntityProfile, lookup: &DerivedLookup, values: &mut [String]) {
    for (index, field) in profile.form.iter().enumerate() {
        let FieldKind::Derived { from } = field.kind else {
            continue;
        };
        let Some(source) = profile.form.iter().position(|f| f.name == from) else {
            continue;
        };
        let key = values[source].clone();
        if key.trim().is_empty() {
            values[index].clear();
        } else if let Some(days) = lookup.resolve(&key) {
            values[index] = days.to_string();
        } else if !lookup.is_empty() {
            values[index].clear();
        }
    }
}

/// Stored timestamps are shown as the calendar day the form accepts.
fn prefill(field: &FieldSpec, record: &Record) -> String {
    let raw = record.text(field.name).unwrap_or_default();
    match field.kind {
        FieldKind::Date => parse_record_date(&raw)
            .map(|dt| dt.date().format("%Y-%m-%d").to_string())
            .unwrap_or(raw),
        _ => raw,
    }
}

fn parse_number(value: &str) -> Option<Number> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(Number::from(n));
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

fn coerce(field: &FieldSpec, value: &str) -> Value {
    match field.kind {
        FieldKind::Number | FieldKind::Derived { .. } => parse_number(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string())),
        FieldKind::Date => parse_calendar_date(value)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or_else(|| Value::String(value.to_string())),
        FieldKind::Choice(ChoiceSource::Users) => value
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(value.to_string())),
        FieldKind::Text | FieldKind::Choice(_) => Value::String(value.to_string()),
    }
}
