//! Application state and screen state definitions.
//!
//! `App` is plain data plus transitions. It never touches the network: every
//! transition that needs I/O returns `Command`s for the task runner, and the
//! results come back through `App::apply`.

use crate::config::TuiConfig;
use crate::keys::{Action, KeyContext};
use crate::nav::ScreenNav;
use crate::persistence::PersistedState;
use crate::tasks::{Command, ResolvedProfile, TaskResult};
use crate::theme::LedgerTheme;
use chrono::{DateTime, Utc};
use formdesk_core::{
    parse_calendar_date, BannerSlot, ChoiceSource, DerivedLookup, EntityProfile, FetchOutcome,
    FieldDisplay, FieldKind, FormMode, ListingState, LoadState, Operator, Record, RecordId,
    Resource, Submission,
};
use serde_json::Value;
use std::collections::HashMap;

/// Field holding the requester on workflow records.
pub const REQUESTER_FIELD: &str = "user_id";
/// Field holding the approver, when the backend has recorded one.
pub const APPROVER_FIELD: &str = "approved_by";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    StartDate(String),
    EndDate(String),
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub listing: ListingState,
    pub input: InputMode,
}

impl Screen {
    pub fn new(listing: ListingState) -> Self {
        Self {
            listing,
            input: InputMode::Normal,
        }
    }
}

/// Lookup data shared by every screen: user names and leave types.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    names: HashMap<String, String>,
    users: Vec<(String, String)>,
    leave_types: Vec<Record>,
}

impl Directory {
    pub fn set_users(&mut self, users: &[Record]) {
        self.users = users
            .iter()
            .map(|user| (user.id().to_string(), user.text("name").unwrap_or_default()))
            .collect();
        self.users
            .sort_by_cached_key(|(_, name)| name.to_lowercase());
        self.names = self.users.iter().cloned().collect();
    }

    pub fn upsert_user(&mut self, user: &Record) {
        let id = user.id().to_string();
        let name = user.text("name").unwrap_or_default();
        match self.users.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = name.clone(),
            None => self.users.push((id.clone(), name.clone())),
        }
        self.users
            .sort_by_cached_key(|(_, name)| name.to_lowercase());
        self.names.insert(id, name);
    }

    pub fn remove_user(&mut self, id: &RecordId) {
        let id = id.to_string();
        self.users.retain(|(existing, _)| *existing != id);
        self.names.remove(&id);
    }

    pub fn user_name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// User ids in name order, as stored by choice fields.
    pub fn user_options(&self) -> Vec<String> {
        self.users.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn set_leave_types(&mut self, leave_types: Vec<Record>) {
        self.leave_types = leave_types;
    }

    pub fn upsert_leave_type(&mut self, record: Record) {
        match self.leave_types.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.leave_types.push(record),
        }
    }

    pub fn remove_leave_type(&mut self, id: &RecordId) {
        self.leave_types.retain(|r| r.id() != id);
    }

    pub fn leave_type_options(&self) -> Vec<String> {
        self.leave_types
            .iter()
            .filter_map(|r| r.text("leave_type"))
            .collect()
    }

    pub fn lookup(&self) -> DerivedLookup {
        DerivedLookup::from_leave_types(&self.leave_types)
    }

    fn requester_name(&self, record: &Record) -> Option<String> {
        let id = record.text(REQUESTER_FIELD)?;
        self.user_name(&id).map(str::to_string)
    }
}

impl FieldDisplay for Directory {
    fn display(&self, record: &Record, field: &str) -> Option<String> {
        match field {
            REQUESTER_FIELD => self
                .requester_name(record)
                .or_else(|| record.text(field)),
            "name" => record
                .text(field)
                .filter(|name| !name.trim().is_empty())
                .or_else(|| self.requester_name(record)),
            _ => match record.get(field) {
                Some(Value::Array(_)) => Some(record.line_items(field).to_string()),
                _ => record.text(field),
            },
        }
    }
}

/// A requester or approver stamp on the detail pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub user_id: RecordId,
    pub profile: Option<ResolvedProfile>,
}

#[derive(Debug, Clone)]
pub struct DetailPane {
    pub resource: Resource,
    pub record: Record,
    pub requested_by: Option<Stamp>,
    pub approved_by: Option<Stamp>,
}

impl DetailPane {
    fn stamps_mut(&mut self) -> impl Iterator<Item = &mut Stamp> {
        self.requested_by
            .iter_mut()
            .chain(self.approved_by.iter_mut())
    }
}

pub struct App {
    pub config: TuiConfig,
    pub theme: LedgerTheme,
    pub operator: Operator,
    pub active: Resource,
    pub directory: Directory,
    pub banner: BannerSlot,
    pub detail: Option<DetailPane>,
    pub should_quit: bool,
    screens: Vec<Screen>,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        let rows_per_page = config.rows_per_page();
        let screens = Resource::all()
            .iter()
            .map(|&resource| Screen::new(ListingState::new(resource, rows_per_page)))
            .collect();
        Self {
            theme: LedgerTheme::ledger(),
            operator: config.operator.clone(),
            banner: BannerSlot::new(config.banner_ttl()),
            active: Resource::all()[0],
            directory: Directory::default(),
            detail: None,
            should_quit: false,
            screens,
            config,
        }
    }

    pub fn screen(&self, resource: Resource) -> &Screen {
        &self.screens[resource.index()]
    }

    pub fn screen_mut(&mut self, resource: Resource) -> &mut Screen {
        &mut self.screens[resource.index()]
    }

    pub fn active_screen(&self) -> &Screen {
        self.screen(self.active)
    }

    pub fn active_profile(&self) -> &'static EntityProfile {
        self.active.profile()
    }

    pub fn restore(&mut self, state: &PersistedState) {
        self.active = state.active_screen;
        for screen in &mut self.screens {
            if let Some(rows) = state.rows_for(screen.listing.resource()) {
                screen.listing.set_rows_per_page(rows);
            }
        }
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            active_screen: self.active,
            rows_per_page: self
                .screens
                .iter()
                .map(|s| (s.listing.resource().path().to_string(), s.listing.rows_per_page()))
                .collect(),
        }
    }

    /// Commands to issue once the event loop is running.
    pub fn start(&mut self) -> Vec<Command> {
        vec![
            Command::FetchReference(Resource::Users),
            Command::FetchReference(Resource::LeaveTypes),
            self.fetch(self.active),
        ]
    }

    pub fn key_context(&self) -> KeyContext {
        let screen = self.active_screen();
        if screen.listing.confirm.is_open() {
            KeyContext::ConfirmDialog
        } else if screen.listing.form.is_open() {
            KeyContext::Form
        } else if screen.input != InputMode::Normal {
            KeyContext::TextInput
        } else {
            KeyContext::Table
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.banner.expire(now);
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    pub fn handle_action(&mut self, action: Action) -> Vec<Command> {
        if action == Action::Quit {
            self.should_quit = true;
            return Vec::new();
        }
        if action == Action::Refresh {
            return vec![self.fetch(self.active)];
        }
        match self.key_context() {
            KeyContext::ConfirmDialog => self.handle_confirm_action(action),
            KeyContext::Form => self.handle_form_action(action),
            KeyContext::TextInput => self.handle_text_action(action),
            KeyContext::Table => self.handle_table_action(action),
        }
    }

    fn handle_table_action(&mut self, action: Action) -> Vec<Command> {
        let resource = self.active;
        let index = resource.index();
        match action {
            Action::NextView => return self.switch_to(resource.next()),
            Action::PrevView => return self.switch_to(resource.previous()),
            Action::SwitchView(i) => {
                if let Some(target) = Resource::from_index(i) {
                    return self.switch_to(target);
                }
            }
            Action::MoveDown => self.screens[index].listing.select_next(&self.directory),
            Action::MoveUp => self.screens[index].listing.select_prev(&self.directory),
            Action::NextPage => self.screens[index].listing.next_page(&self.directory),
            Action::PrevPage => self.screens[index].listing.prev_page(&self.directory),
            Action::CycleRowsPerPage => self.screens[index].listing.cycle_rows_per_page(),
            Action::EditSearch => self.screens[index].input = InputMode::Search,
            Action::EditStartDate => {
                let current = self.screens[index].listing.filter().dates.start;
                self.screens[index].input = InputMode::StartDate(format_date(current));
            }
            Action::EditEndDate => {
                let current = self.screens[index].listing.filter().dates.end;
                self.screens[index].input = InputMode::EndDate(format_date(current));
            }
            Action::ClearFilters => {
                let had_dates = self.screens[index].listing.filter().dates.is_active();
                self.screens[index].listing.clear_filters();
                if had_dates && resource.profile().server_date_range {
                    return vec![self.fetch(resource)];
                }
            }
            Action::ToggleScope => {
                if !self.screens[index].listing.toggle_scope() {
                    self.banner.info("No status scope on this screen");
                }
            }
            Action::NewItem => {
                if self.guard_read_only() {
                    self.screens[index].listing.form.open_create();
                }
            }
            Action::EditItem => {
                if self.guard_read_only() {
                    match self.selected_record() {
                        Some(record) => self.screens[index].listing.form.open_edit(&record),
                        None => self.banner.info("Select a record to edit"),
                    }
                }
            }
            Action::DeleteItem => {
                if self.guard_read_only() {
                    match self.selected_record() {
                        Some(record) => self.screens[index].listing.confirm.stage(record),
                        None => self.banner.info("Select a record to delete"),
                    }
                }
            }
            Action::Confirm => return self.open_detail(),
            Action::Cancel => self.detail = None,
            _ => {}
        }
        Vec::new()
    }

    fn handle_text_action(&mut self, action: Action) -> Vec<Command> {
        let resource = self.active;
        let screen = &mut self.screens[resource.index()];
        if screen.input == InputMode::Search {
            match action {
                Action::Input(c) => screen.listing.push_search_char(c),
                Action::Backspace => screen.listing.pop_search_char(),
                Action::Confirm => screen.input = InputMode::Normal,
                Action::Cancel => {
                    screen.listing.set_search("");
                    screen.input = InputMode::Normal;
                }
                _ => {}
            }
            return Vec::new();
        }
        match action {
            Action::Input(c) => {
                if let InputMode::StartDate(buffer) | InputMode::EndDate(buffer) = &mut screen.input {
                    buffer.push(c);
                }
            }
            Action::Backspace => {
                if let InputMode::StartDate(buffer) | InputMode::EndDate(buffer) = &mut screen.input {
                    buffer.pop();
                }
            }
            Action::Cancel => screen.input = InputMode::Normal,
            Action::Confirm => return self.commit_date_input(),
            _ => {}
        }
        Vec::new()
    }

    fn commit_date_input(&mut self) -> Vec<Command> {
        let resource = self.active;
        let screen = &mut self.screens[resource.index()];
        let (raw, is_start) = match &screen.input {
            InputMode::StartDate(raw) => (raw.trim().to_string(), true),
            InputMode::EndDate(raw) => (raw.trim().to_string(), false),
            _ => return Vec::new(),
        };
        let date = if raw.is_empty() {
            None
        } else {
            match parse_calendar_date(&raw) {
                Some(date) => Some(date),
                None => {
                    self.banner
                        .error(format!("Invalid date '{}': use YYYY-MM-DD or MM/DD/YYYY", raw));
                    return Vec::new();
                }
            }
        };
        screen.input = InputMode::Normal;
        if is_start {
            screen.listing.set_start_date(date);
        } else {
            screen.listing.set_end_date(date);
        }
        if resource.profile().server_date_range {
            return vec![self.fetch(resource)];
        }
        Vec::new()
    }

    fn handle_form_action(&mut self, action: Action) -> Vec<Command> {
        let resource = self.active;
        match action {
            Action::Confirm => return self.submit(),
            Action::Cancel => self.screen_mut(resource).listing.form.close(),
            Action::NextField => self.screen_mut(resource).listing.form.focus_next(),
            Action::PrevField => self.screen_mut(resource).listing.form.focus_prev(),
            Action::Input(c) => self.screen_mut(resource).listing.form.push_char(c),
            Action::Backspace => self.screen_mut(resource).listing.form.pop_char(),
            Action::ChoiceNext | Action::ChoicePrev => {
                let focused = self.screen(resource).listing.form.focused();
                if let Some(FieldKind::Choice(source)) = focused.map(|f| f.kind) {
                    let options = self.choice_options(source);
                    self.screen_mut(resource)
                        .listing
                        .form
                        .cycle_choice(&options, action == Action::ChoiceNext);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_confirm_action(&mut self, action: Action) -> Vec<Command> {
        let resource = self.active;
        let confirm = &mut self.screen_mut(resource).listing.confirm;
        match action {
            Action::Confirm => match confirm.confirm() {
                Some(id) => vec![Command::Delete { resource, id }],
                None => Vec::new(),
            },
            Action::Cancel => {
                confirm.cancel();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Flows
    // ------------------------------------------------------------------------

    /// Start a fetch for `resource`, superseding any fetch already running.
    pub fn fetch(&mut self, resource: Resource) -> Command {
        let listing = &mut self.screen_mut(resource).listing;
        let ticket = listing.begin_fetch();
        let range = (resource.profile().server_date_range && listing.filter().dates.is_active())
            .then_some(listing.filter().dates);
        Command::Fetch {
            resource,
            ticket,
            range,
        }
    }

    pub fn switch_to(&mut self, target: Resource) -> Vec<Command> {
        if target == self.active {
            return Vec::new();
        }
        let previous = self.active;
        let screen = self.screen_mut(previous);
        screen.listing.cancel_pending();
        screen.input = InputMode::Normal;
        self.detail = None;
        self.active = target;
        vec![Command::CancelFetch(previous), self.fetch(target)]
    }

    fn submit(&mut self) -> Vec<Command> {
        let resource = self.active;
        match self.screen(resource).listing.form.submission(&self.operator) {
            Ok(Submission { mode, body }) => vec![Command::Save {
                resource,
                mode,
                body,
            }],
            Err(err) => {
                tracing::debug!(resource = resource.path(), error = %err, "Form rejected");
                self.banner.error(err.to_string());
                Vec::new()
            }
        }
    }

    fn open_detail(&mut self) -> Vec<Command> {
        let Some(record) = self.selected_record() else {
            return Vec::new();
        };
        let stamp = |field: &str| {
            record
                .get(field)
                .and_then(RecordId::from_value)
                .map(|user_id| Stamp {
                    user_id,
                    profile: None,
                })
        };
        let requested_by = stamp(REQUESTER_FIELD);
        let approved_by = stamp(APPROVER_FIELD);
        let mut commands: Vec<Command> = Vec::new();
        for user_id in requested_by.iter().chain(approved_by.iter()).map(|s| &s.user_id) {
            let command = Command::LoadProfile(user_id.clone());
            if !commands.contains(&command) {
                commands.push(command);
            }
        }
        self.detail = Some(DetailPane {
            resource: self.active,
            record,
            requested_by,
            approved_by,
        });
        commands
    }

    fn guard_read_only(&mut self) -> bool {
        let profile = self.active_profile();
        if profile.read_only {
            self.banner.info(format!("{} is read-only", profile.title));
            return false;
        }
        true
    }

    fn selected_record(&self) -> Option<Record> {
        self.active_screen()
            .listing
            .selected_record(&self.directory)
            .cloned()
    }

    pub fn choice_options(&self, source: ChoiceSource) -> Vec<String> {
        match source {
            ChoiceSource::Users => self.directory.user_options(),
            ChoiceSource::LeaveTypes => self.directory.leave_type_options(),
            ChoiceSource::Fixed(values) => values.iter().map(|v| v.to_string()).collect(),
        }
    }

    // ------------------------------------------------------------------------
    // Task results
    // ------------------------------------------------------------------------

    pub fn apply(&mut self, result: TaskResult) {
        match result {
            TaskResult::Fetched {
                resource,
                ticket,
                result,
            } => self.apply_fetch(resource, ticket, result),
            TaskResult::Reference { resource, result } => match result {
                Ok(records) => self.apply_reference(resource, records),
                Err(message) => self
                    .banner
                    .error(format!("Failed to load {}: {}", resource.title(), message)),
            },
            TaskResult::Saved {
                resource,
                mode,
                result,
            } => self.apply_saved(resource, mode, result),
            TaskResult::Deleted {
                resource,
                id,
                result,
            } => self.apply_deleted(resource, id, result),
            TaskResult::Profile { user_id, result } => match result {
                Ok(profile) => {
                    if let Some(detail) = self.detail.as_mut() {
                        for stamp in detail.stamps_mut().filter(|s| s.user_id == user_id) {
                            stamp.profile = Some(profile.clone());
                        }
                    }
                }
                Err(message) => self
                    .banner
                    .error(format!("Failed to load user {}: {}", user_id, message)),
            },
        }
    }

    fn apply_fetch(
        &mut self,
        resource: Resource,
        ticket: formdesk_core::FetchTicket,
        result: Result<Vec<Record>, String>,
    ) {
        let index = resource.index();
        let reference = result.as_ref().ok().filter(|_| is_reference(resource)).cloned();
        let outcome = self.screens[index].listing.finish_fetch(ticket, result);
        match outcome {
            FetchOutcome::Applied => {
                self.banner.clear_errors();
                self.screens[index].listing.clamp_page(&self.directory);
                if let Some(records) = reference {
                    self.apply_reference(resource, records);
                }
            }
            FetchOutcome::Failed => {
                if let LoadState::Failed(message) = self.screens[index].listing.load_state() {
                    let message = format!("Failed to load {}: {}", resource.title(), message);
                    self.banner.error(message);
                }
            }
            FetchOutcome::Stale => {
                tracing::debug!(
                    resource = resource.path(),
                    generation = ticket.generation(),
                    "Discarding stale fetch result"
                );
            }
        }
    }

    fn apply_reference(&mut self, resource: Resource, records: Vec<Record>) {
        match resource {
            Resource::Users => self.directory.set_users(&records),
            Resource::LeaveTypes => {
                self.directory.set_leave_types(records);
                self.refresh_lookup();
            }
            _ => {}
        }
    }

    fn refresh_lookup(&mut self) {
        let lookup = self.directory.lookup();
        self.screen_mut(Resource::UserLeaves)
            .listing
            .form
            .set_lookup(lookup);
    }

    fn apply_saved(&mut self, resource: Resource, mode: FormMode, result: Result<Record, String>) {
        let record = match result {
            Ok(record) => record,
            Err(message) => {
                let message = if message.trim().is_empty() {
                    "Failed to save record".to_string()
                } else {
                    message
                };
                self.banner.error(message);
                return;
            }
        };

        let subject = subject(resource.profile(), &record);
        match resource {
            Resource::Users => self.directory.upsert_user(&record),
            Resource::LeaveTypes => {
                self.directory.upsert_leave_type(record.clone());
                self.refresh_lookup();
            }
            _ => {}
        }
        let listing = &mut self.screen_mut(resource).listing;
        match mode {
            FormMode::Create => listing.apply_created(record),
            FormMode::Edit(_) => listing.apply_updated(record),
        }
        if listing.form.mode() == Some(&mode) {
            listing.form.close();
        }
        self.banner
            .success(format!("{} {} successfully", subject, mode.verb()));
    }

    fn apply_deleted(&mut self, resource: Resource, id: RecordId, result: Result<(), String>) {
        if let Err(message) = result {
            let message = if message.trim().is_empty() {
                "Failed to delete record".to_string()
            } else {
                message
            };
            self.banner.error(message);
            return;
        }

        let index = resource.index();
        let subject = self.screens[index]
            .listing
            .find(&id)
            .map(|record| subject(resource.profile(), record))
            .unwrap_or_else(|| format!("#{}", id));
        self.screens[index].listing.apply_deleted(&id);
        self.screens[index].listing.clamp_page(&self.directory);
        match resource {
            Resource::Users => self.directory.remove_user(&id),
            Resource::LeaveTypes => {
                self.directory.remove_leave_type(&id);
                self.refresh_lookup();
            }
            _ => {}
        }
        if self
            .detail
            .as_ref()
            .is_some_and(|d| d.resource == resource && d.record.id() == &id)
        {
            self.detail = None;
        }
        self.banner.success(format!("{} deleted successfully", subject));
    }
}

fn is_reference(resource: Resource) -> bool {
    matches!(resource, Resource::Users | Resource::LeaveTypes)
}

/// How a record is named in banners: its reference code, else `#id`.
fn subject(profile: &EntityProfile, record: &Record) -> String {
    profile
        .reference_field
        .and_then(|field| record.text(field))
        .filter(|code| !code.trim().is_empty())
        .unwrap_or_else(|| format!("#{}", record.id()))
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
