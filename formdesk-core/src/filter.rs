//! Client-side filter engine: text search, date range and status scope.
//!
//! Filtering never touches the source collection; it derives an ordered view
//! of references into it.

use crate::dates::DateRange;
use crate::record::Record;
use crate::resource::{EntityProfile, StatusScope};

/// Resolves the display text of a record field.
///
/// The plain implementation reads the record itself; front ends supply one
/// that also resolves denormalised lookups such as `user_id` to a name.
pub trait FieldDisplay {
    fn display(&self, record: &Record, field: &str) -> Option<String>;
}

/// Reads fields straight off the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFields;

impl FieldDisplay for RawFields {
    fn display(&self, record: &Record, field: &str) -> Option<String> {
        record.text(field)
    }
}

/// Active filter inputs for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: String,
    pub dates: DateRange,
    pub scope: Option<StatusScope>,
}

impl ListFilter {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.dates.is_active() || self.scope.is_some()
    }

    /// Normalised search term: trimmed and lower-cased.
    pub fn term(&self) -> String {
        self.search.trim().to_lowercase()
    }

    pub fn matches(
        &self,
        profile: &EntityProfile,
        record: &Record,
        display: &dyn FieldDisplay,
    ) -> bool {
        self.admits(profile, record, &self.term(), display)
    }

    /// Derive the filtered view, preserving input order unless the profile
    /// asks for a sort override.
    pub fn apply<'a>(
        &self,
        profile: &EntityProfile,
        records: &'a [Record],
        display: &dyn FieldDisplay,
    ) -> Vec<&'a Record> {
        let term = self.term();
        let mut view: Vec<&Record> = records
            .iter()
            .filter(|record| self.admits(profile, record, &term, display))
            .collect();

        if let Some(key) = profile.sort_by {
            view.sort_by_cached_key(|record| {
                display
                    .display(record, key)
                    .unwrap_or_default()
                    .to_lowercase()
            });
        }
        view
    }

    /// `term` is the normalised search term, computed once per pass.
    fn admits(
        &self,
        profile: &EntityProfile,
        record: &Record,
        term: &str,
        display: &dyn FieldDisplay,
    ) -> bool {
        matches_term(profile, record, term, display)
            && matches_dates(profile, record, &self.dates, display)
            && matches_scope(record, self.scope.as_ref(), display)
    }
}

/// `term` must already be trimmed and lower-cased.
fn matches_term(
    profile: &EntityProfile,
    record: &Record,
    term: &str,
    display: &dyn FieldDisplay,
) -> bool {
    if term.is_empty() {
        return true;
    }
    profile.search_fields.iter().any(|field| {
        display
            .display(record, field)
            .map(|value| value.to_lowercase().contains(term))
            .unwrap_or(false)
    })
}

fn matches_dates(
    profile: &EntityProfile,
    record: &Record,
    dates: &DateRange,
    display: &dyn FieldDisplay,
) -> bool {
    if !dates.is_active() {
        return true;
    }
    // Profiles without a date column cannot be narrowed by date.
    let Some(field) = profile.date_field else {
        return true;
    };
    dates.contains(display.display(record, field).as_deref())
}

fn matches_scope(record: &Record, scope: Option<&StatusScope>, display: &dyn FieldDisplay) -> bool {
    match scope {
        None => true,
        Some(scope) => display
            .display(record, scope.field)
            .map(|value| value.trim().eq_ignore_ascii_case(scope.value))
            .unwrap_or(false),
    }
}
