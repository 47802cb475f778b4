//! Generic entity records as delivered by the forms backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::RecordError;

/// Identifier of a record. The backend emits integers for most tables but a
/// few aggregates key their rows by string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) if !s.trim().is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

/// A single entity row: an identifier plus its raw fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "Value")]
pub struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    /// Build a record from a JSON object, reading the identifier from `id_field`.
    pub fn from_value(value: Value, id_field: &str) -> Result<Self, RecordError> {
        let Value::Object(fields) = value else {
            return Err(RecordError::NotAnObject);
        };
        let id = fields
            .get(id_field)
            .and_then(RecordId::from_value)
            .ok_or_else(|| RecordError::MissingId {
                field: id_field.to_string(),
            })?;
        Ok(Self { id, fields })
    }

    /// Decode a JSON array into records, failing on the first bad element.
    pub fn many_from_value(value: Value, id_field: &str) -> Result<Vec<Self>, RecordError> {
        let Value::Array(items) = value else {
            return Err(RecordError::NotAnArray);
        };
        items
            .into_iter()
            .map(|item| Record::from_value(item, id_field))
            .collect()
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// String form of a primitive field. Arrays, objects and nulls have none.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Number of line items held in an array field.
    pub fn line_items(&self, field: &str) -> usize {
        match self.fields.get(field) {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}
