//! The generic list controller.
//!
//! One `ListingState` backs every entity screen. It owns the fetched
//! collection and derives the visible page from it through the filter and
//! pagination stages; the collection itself only changes when a fetch lands
//! or a mutation response is patched in by id.

use chrono::NaiveDate;

use crate::confirm::DeleteConfirm;
use crate::filter::{FieldDisplay, ListFilter};
use crate::form::FormModal;
use crate::paginate::{Pagination, RowsPerPage};
use crate::record::{Record, RecordId};
use crate::resource::{EntityProfile, Resource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Identifies one fetch. Only the most recently issued ticket may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// Superseded or cancelled; the result was dropped.
    Stale,
}

/// What the table body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableBody {
    Loading,
    Empty,
    Rows,
}

/// A derived, read-only page of the listing.
#[derive(Debug, Clone)]
pub struct ListView<'a> {
    pub rows: Vec<&'a Record>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub body: TableBody,
}

#[derive(Debug, Clone)]
pub struct ListingState {
    resource: Resource,
    records: Vec<Record>,
    filter: ListFilter,
    pagination: Pagination,
    rows_per_page: RowsPerPage,
    load: LoadState,
    generation: u64,
    in_flight: Option<u64>,
    selected: Option<usize>,
    pub form: FormModal,
    pub confirm: DeleteConfirm,
}

impl ListingState {
    pub fn new(resource: Resource, rows_per_page: RowsPerPage) -> Self {
        Self {
            resource,
            records: Vec::new(),
            filter: ListFilter::default(),
            pagination: Pagination::from(rows_per_page),
            rows_per_page,
            load: LoadState::Idle,
            generation: 0,
            in_flight: None,
            selected: None,
            form: FormModal::new(resource.profile()),
            confirm: DeleteConfirm::default(),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn profile(&self) -> &'static EntityProfile {
        self.resource.profile()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn rows_per_page(&self) -> RowsPerPage {
        self.rows_per_page
    }

    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    // ------------------------------------------------------------------------
    // Fetch cycle
    // ------------------------------------------------------------------------

    /// Mark the listing as loading and issue a ticket for the fetch.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.load = LoadState::Loading;
        FetchTicket(self.generation)
    }

    /// Land a fetch result. A success replaces the whole collection; a
    /// failure keeps whatever was shown before.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Record>, String>,
    ) -> FetchOutcome {
        if self.in_flight != Some(ticket.0) {
            return FetchOutcome::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(records) => {
                self.records = records;
                self.load = LoadState::Loaded;
                FetchOutcome::Applied
            }
            Err(message) => {
                self.load = LoadState::Failed(message);
                FetchOutcome::Failed
            }
        }
    }

    /// Invalidate any outstanding fetch; its result will be dropped.
    pub fn cancel_pending(&mut self) {
        if self.in_flight.take().is_some() && self.load == LoadState::Loading {
            self.load = LoadState::Idle;
        }
    }

    // ------------------------------------------------------------------------
    // Filters (every change returns to page 1)
    // ------------------------------------------------------------------------

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.reset_page();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.filter.search.push(c);
        self.reset_page();
    }

    pub fn pop_search_char(&mut self) {
        self.filter.search.pop();
        self.reset_page();
    }

    pub fn set_start_date(&mut self, start: Option<NaiveDate>) {
        self.filter.dates.start = start;
        self.reset_page();
    }

    pub fn set_end_date(&mut self, end: Option<NaiveDate>) {
        self.filter.dates.end = end;
        self.reset_page();
    }

    /// Toggle the profile's status scope. No-op for profiles without one.
    pub fn toggle_scope(&mut self) -> bool {
        let Some(scope) = self.profile().status_scope else {
            return false;
        };
        self.filter.scope = match self.filter.scope {
            Some(_) => None,
            None => Some(scope),
        };
        self.reset_page();
        true
    }

    pub fn clear_filters(&mut self) {
        self.filter = ListFilter::default();
        self.reset_page();
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: RowsPerPage) {
        self.rows_per_page = rows_per_page;
        self.pagination.set_size(rows_per_page.get());
        self.selected = None;
    }

    pub fn cycle_rows_per_page(&mut self) {
        self.set_rows_per_page(self.rows_per_page.next());
    }

    fn reset_page(&mut self) {
        self.pagination.reset();
        self.selected = None;
    }

    // ------------------------------------------------------------------------
    // Paging and selection
    // ------------------------------------------------------------------------

    pub fn filtered<'a>(&'a self, display: &dyn FieldDisplay) -> Vec<&'a Record> {
        self.filter.apply(self.profile(), &self.records, display)
    }

    pub fn next_page(&mut self, display: &dyn FieldDisplay) {
        let len = self.filtered(display).len();
        self.pagination.clamp(len);
        self.pagination.next(len);
        self.selected = None;
    }

    pub fn prev_page(&mut self, display: &dyn FieldDisplay) {
        let len = self.filtered(display).len();
        self.pagination.clamp(len);
        self.pagination.prev();
        self.selected = None;
    }

    /// Derive the visible page. The page is clamped into range first.
    pub fn view<'a>(&'a self, display: &dyn FieldDisplay) -> ListView<'a> {
        let filtered = self.filtered(display);
        let mut pagination = self.pagination;
        pagination.clamp(filtered.len());
        let rows = pagination.slice(&filtered).to_vec();
        let body = if self.is_loading() {
            TableBody::Loading
        } else if rows.is_empty() {
            TableBody::Empty
        } else {
            TableBody::Rows
        };
        ListView {
            page: pagination.page(),
            total_pages: pagination.total_pages(filtered.len()),
            filtered: filtered.len(),
            total: self.records.len(),
            has_prev: pagination.has_prev(),
            has_next: pagination.has_next(filtered.len()),
            body,
            rows,
        }
    }

    /// Persist the clamp that `view` applies, after the collection shrank.
    pub fn clamp_page(&mut self, display: &dyn FieldDisplay) {
        let len = self.filtered(display).len();
        self.pagination.clamp(len);
        let visible = self.pagination.bounds(len).len();
        self.selected = match self.selected {
            Some(_) if visible == 0 => None,
            Some(i) => Some(i.min(visible - 1)),
            None => None,
        };
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn select_next(&mut self, display: &dyn FieldDisplay) {
        let visible = self.view(display).rows.len();
        self.selected = match (visible, self.selected) {
            (0, _) => None,
            (n, Some(i)) => Some((i + 1) % n),
            (_, None) => Some(0),
        };
    }

    pub fn select_prev(&mut self, display: &dyn FieldDisplay) {
        let visible = self.view(display).rows.len();
        self.selected = match (visible, self.selected) {
            (0, _) => None,
            (n, Some(0)) | (n, None) => Some(n - 1),
            (_, Some(i)) => Some(i - 1),
        };
    }

    pub fn selected_record<'a>(&'a self, display: &dyn FieldDisplay) -> Option<&'a Record> {
        let index = self.selected?;
        self.view(display).rows.get(index).copied()
    }

    // ------------------------------------------------------------------------
    // Mutation patches
    // ------------------------------------------------------------------------

    /// Append the server's canonical record for a create.
    pub fn apply_created(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Replace the record with the same id. When it is no longer present the
    /// response is appended: the last response to land wins.
    pub fn apply_updated(&mut self, record: Record) {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Remove exactly the record with `id`. Returns whether one was removed.
    pub fn apply_deleted(&mut self, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        before != self.records.len()
    }

    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::RawFields;
    use serde_json::json;

    fn rec(id: i64, name: &str) -> Record {
        Record::from_value(
            json!({"id": id, "name": name, "email": format!("{}@corp.test", name.to_lowercase()), "role": "employee"}),
            "id",
        )
        .unwrap()
    }

    fn loaded(records: Vec<Record>) -> ListingState {
        let mut listing = ListingState::new(Resource::Users, RowsPerPage::Five);
        let ticket = listing.begin_fetch();
        assert_eq!(listing.finish_fetch(ticket, Ok(records)), FetchOutcome::Applied);
        listing
    }

    fn names(view: &ListView<'_>) -> Vec<String> {
        view.rows.iter().filter_map(|r| r.text("name")).collect()
    }

    #[test]
    fn test_body_gates_loading_empty_rows() {
        let mut listing = ListingState::new(Resource::Users, RowsPerPage::Five);
        let ticket = listing.begin_fetch();
        assert_eq!(listing.view(&RawFields).body, TableBody::Loading);
        listing.finish_fetch(ticket, Ok(vec![]));
        assert_eq!(listing.view(&RawFields).body, TableBody::Empty);
        listing.apply_created(rec(1, "Ana"));
        assert_eq!(listing.view(&RawFields).body, TableBody::Rows);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_collection() {
        let mut listing = loaded(vec![rec(1, "Ana"), rec(2, "Ben")]);
        let ticket = listing.begin_fetch();
        let outcome = listing.finish_fetch(ticket, Err("HTTP 500".to_string()));
        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(listing.records().len(), 2);
        assert_eq!(listing.load_state(), &LoadState::Failed("HTTP 500".to_string()));
    }

    #[test]
    fn test_superseded_fetch_is_stale() {
        let mut listing = ListingState::new(Resource::Users, RowsPerPage::Five);
        let first = listing.begin_fetch();
        let second = listing.begin_fetch();
        assert_eq!(listing.finish_fetch(first, Ok(vec![rec(1, "Old")])), FetchOutcome::Stale);
        assert!(listing.records().is_empty());
        assert_eq!(listing.finish_fetch(second, Ok(vec![rec(2, "New")])), FetchOutcome::Applied);
        assert_eq!(listing.records()[0].id(), &RecordId::Int(2));
    }

    #[test]
    fn test_cancelled_fetch_is_dropped() {
        let mut listing = ListingState::new(Resource::Users, RowsPerPage::Five);
        let ticket = listing.begin_fetch();
        listing.cancel_pending();
        assert_eq!(listing.load_state(), &LoadState::Idle);
        assert_eq!(listing.finish_fetch(ticket, Ok(vec![rec(1, "Late")])), FetchOutcome::Stale);
        assert!(listing.records().is_empty());
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let records: Vec<Record> = (1..=12).map(|i| rec(i, &format!("User{}", i))).collect();
        let mut listing = loaded(records);
        listing.next_page(&RawFields);
        listing.next_page(&RawFields);
        assert_eq!(listing.page(), 3);

        listing.set_search("user");
        assert_eq!(listing.page(), 1);

        listing.next_page(&RawFields);
        listing.set_start_date(NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(listing.page(), 1);

        listing.next_page(&RawFields);
        listing.set_end_date(None);
        assert_eq!(listing.page(), 1);

        listing.next_page(&RawFields);
        listing.cycle_rows_per_page();
        assert_eq!(listing.page(), 1);
        assert_eq!(listing.rows_per_page(), RowsPerPage::Ten);
    }

    #[test]
    fn test_view_clamps_page_after_shrink() {
        let records: Vec<Record> = (1..=6).map(|i| rec(i, &format!("User{}", i))).collect();
        let mut listing = loaded(records);
        listing.next_page(&RawFields);
        assert_eq!(listing.view(&RawFields).page, 2);
        listing.apply_deleted(&RecordId::Int(6));
        let view = listing.view(&RawFields);
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 1);
        assert!(!view.has_next);
        assert!(!view.has_prev);
    }

    #[test]
    fn test_navigation_stops_at_edges() {
        let records: Vec<Record> = (1..=7).map(|i| rec(i, &format!("User{}", i))).collect();
        let mut listing = loaded(records);
        listing.prev_page(&RawFields);
        assert_eq!(listing.page(), 1);
        listing.next_page(&RawFields);
        listing.next_page(&RawFields);
        assert_eq!(listing.page(), 2);
        assert_eq!(names(&listing.view(&RawFields)), vec!["User6", "User7"]);
    }

    #[test]
    fn test_create_appends_exactly_one() {
        let mut listing = loaded(vec![rec(1, "Ana")]);
        listing.apply_created(rec(77, "Zoe"));
        assert_eq!(listing.records().len(), 2);
        assert_eq!(listing.records()[1].id(), &RecordId::Int(77));
    }

    #[test]
    fn test_update_replaces_matching_id_in_place() {
        let mut listing = loaded(vec![rec(1, "Ana"), rec(2, "Ben")]);
        listing.apply_updated(rec(1, "Anabel"));
        assert_eq!(listing.records().len(), 2);
        assert_eq!(listing.records()[0].text("name").as_deref(), Some("Anabel"));
    }

    #[test]
    fn test_update_for_missing_id_appends() {
        let mut listing = loaded(vec![rec(1, "Ana")]);
        listing.apply_updated(rec(5, "Eve"));
        assert_eq!(listing.records().len(), 2);
    }

    #[test]
    fn test_delete_removes_only_target() {
        let mut listing = loaded(vec![rec(1, "Ana"), rec(2, "Ben"), rec(3, "Cy")]);
        assert!(listing.apply_deleted(&RecordId::Int(2)));
        let ids: Vec<&RecordId> = listing.records().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![&RecordId::Int(1), &RecordId::Int(3)]);
        assert!(!listing.apply_deleted(&RecordId::Int(2)));
    }

    #[test]
    fn test_selection_wraps_within_page() {
        let mut listing = loaded(vec![rec(1, "Ana"), rec(2, "Ben")]);
        listing.select_next(&RawFields);
        assert_eq!(listing.selected_index(), Some(0));
        listing.select_next(&RawFields);
        listing.select_next(&RawFields);
        assert_eq!(listing.selected_index(), Some(0));
        listing.select_prev(&RawFields);
        assert_eq!(
            listing.selected_record(&RawFields).and_then(|r| r.text("name")).as_deref(),
            Some("Ben")
        );
    }

    #[test]
    fn test_toggle_scope_only_where_profile_has_one() {
        let mut users = ListingState::new(Resource::Users, RowsPerPage::Ten);
        assert!(!users.toggle_scope());
        let mut prs = ListingState::new(Resource::PurchaseRequest, RowsPerPage::Ten);
        assert!(prs.toggle_scope());
        assert!(prs.filter().scope.is_some());
        assert!(prs.toggle_scope());
        assert!(prs.filter().scope.is_none());
    }
}
