//! Delete confirmation: a staged target awaiting the user's decision.

use crate::record::{Record, RecordId};
use crate::resource::EntityProfile;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteConfirm {
    target: Option<Record>,
}

impl DeleteConfirm {
    /// Stage a record and open the dialog. Nothing is sent yet.
    pub fn stage(&mut self, record: Record) {
        self.target = Some(record);
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&Record> {
        self.target.as_ref()
    }

    /// Human label for the dialog: the reference code when the entity has
    /// one, otherwise the id.
    pub fn label(&self, profile: &EntityProfile) -> Option<String> {
        let record = self.target.as_ref()?;
        let label = profile
            .reference_field
            .and_then(|field| record.text(field))
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| format!("#{}", record.id()));
        Some(label)
    }

    /// Drop the staged target without sending anything.
    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Take the staged id for the DELETE call. The dialog closes whatever the
    /// call's outcome turns out to be.
    pub fn confirm(&mut self) -> Option<RecordId> {
        self.target.take().map(|record| record.id().clone())
    }
}
