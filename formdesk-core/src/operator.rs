//! The operator on whose behalf mutations are made.

use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// Session identity supplied at start-up and passed explicitly to whoever
/// needs to attribute a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: RecordId,
    pub name: String,
}

impl Operator {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
