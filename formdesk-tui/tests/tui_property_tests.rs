use chrono::{Duration, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use formdesk_core::{BannerLevel, FormMode, Operator, Record, RecordId, Resource, RowsPerPage};
use formdesk_tui::config::{AuthConfig, ThemeConfig, TuiConfig};
use formdesk_tui::keys::{map_key, Action, KeyContext};
use formdesk_tui::nav::ScreenNav;
use formdesk_tui::persistence::{self, PersistedState};
use formdesk_tui::state::{App, InputMode};
use formdesk_tui::tasks::{Command, ResolvedProfile, TaskResult};
use formdesk_tui::theme::{banner_color, status_color, LedgerTheme};
use proptest::prelude::*;
use serde_json::json;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:5000".to_string(),
        request_timeout_ms: 5_000,
        tick_rate_ms: 250,
        banner_ttl_ms: 4_000,
        default_rows_per_page: 10,
        persistence_path: "tmp/formdesk-tui.json".into(),
        log_path: "tmp/formdesk-tui.log".into(),
        operator: Operator::new(42i64, "Admin"),
        auth: AuthConfig {
            api_key: Some("test-key".to_string()),
            bearer_token: None,
        },
        theme: ThemeConfig {
            name: "ledger".to_string(),
        },
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn pr(id: i64, code: &str, status: &str) -> Record {
    Record::from_value(
        json!({
            "id": id,
            "pr_code": code,
            "user_id": 42,
            "branch": "Main",
            "department": "Ops",
            "purpose": "Supplies",
            "date": "2024-03-01T00:00:00",
            "status": status,
        }),
        "id",
    )
    .unwrap()
}

/// An app with the purchase-request screen loaded with `records`.
fn loaded_app(records: Vec<Record>) -> App {
    let mut app = App::new(base_config());
    let commands = app.start();
    let ticket = commands
        .iter()
        .find_map(|c| match c {
            Command::Fetch { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .unwrap();
    app.apply(TaskResult::Fetched {
        resource: Resource::PurchaseRequest,
        ticket,
        result: Ok(records),
    });
    app
}

fn refresh_ticket(app: &mut App) -> formdesk_core::FetchTicket {
    match app.handle_action(Action::Refresh).as_slice() {
        [Command::Fetch { ticket, .. }] => *ticket,
        other => panic!("expected a single fetch, got {:?}", other),
    }
}

fn user(id: i64, name: &str) -> Record {
    Record::from_value(json!({"id": id, "name": name}), "id").unwrap()
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_action(Action::Input(c));
    }
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn config_base_is_valid() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn config_requires_base_url() {
    let mut config = base_config();
    config.api_base_url = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_auth_is_optional() {
    let mut config = base_config();
    config.auth = AuthConfig::default();
    assert!(config.validate().is_ok());
}

// ============================================================================
// Submit flow
// ============================================================================

#[test]
fn create_with_missing_required_field_spawns_nothing() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.handle_action(Action::NewItem);
    assert_eq!(app.key_context(), KeyContext::Form);

    let commands = app.handle_action(Action::Confirm);
    assert!(commands.is_empty());
    let banner = app.banner.current().unwrap();
    assert_eq!(banner.level, BannerLevel::Error);
    assert_eq!(banner.message, "Branch is required");
    assert!(app.active_screen().listing.form.is_open());
    assert_eq!(app.active_screen().listing.records().len(), 1);
}

#[test]
fn create_with_valid_data_appends_server_record() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.handle_action(Action::NewItem);
    type_text(&mut app, "Main");
    app.handle_action(Action::NextField);
    type_text(&mut app, "Ops");
    app.handle_action(Action::NextField);
    type_text(&mut app, "Supplies");
    app.handle_action(Action::NextField);
    type_text(&mut app, "2024-03-02");

    let commands = app.handle_action(Action::Confirm);
    let body = match commands.as_slice() {
        [Command::Save {
            resource: Resource::PurchaseRequest,
            mode: FormMode::Create,
            body,
        }] => body.clone(),
        other => panic!("unexpected commands: {:?}", other),
    };
    assert_eq!(body["branch"], "Main");
    assert_eq!(body["user_id"], 42);
    assert!(body.get("id").is_none());

    app.apply(TaskResult::Saved {
        resource: Resource::PurchaseRequest,
        mode: FormMode::Create,
        result: Ok(pr(99, "PR-099", "Pending")),
    });
    let listing = &app.active_screen().listing;
    assert_eq!(listing.records().len(), 2);
    assert_eq!(listing.records()[1].id(), &RecordId::Int(99));
    assert!(!listing.form.is_open());
    let banner = app.banner.current().unwrap();
    assert_eq!(banner.level, BannerLevel::Success);
    assert_eq!(banner.message, "PR-099 created successfully");
}

#[test]
fn failed_save_keeps_modal_open_with_server_message() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.handle_action(Action::MoveDown);
    app.handle_action(Action::EditItem);
    assert!(app.active_screen().listing.form.is_open());

    app.apply(TaskResult::Saved {
        resource: Resource::PurchaseRequest,
        mode: FormMode::Edit(RecordId::Int(1)),
        result: Err("PR code already exists".to_string()),
    });
    assert!(app.active_screen().listing.form.is_open());
    let banner = app.banner.current().unwrap();
    assert_eq!(banner.level, BannerLevel::Error);
    assert_eq!(banner.message, "PR code already exists");
}

#[test]
fn failed_save_without_message_uses_fallback() {
    let mut app = loaded_app(vec![]);
    app.apply(TaskResult::Saved {
        resource: Resource::PurchaseRequest,
        mode: FormMode::Create,
        result: Err(String::new()),
    });
    assert_eq!(app.banner.current().unwrap().message, "Failed to save record");
}

#[test]
fn update_replaces_record_in_place() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending"), pr(2, "PR-002", "Pending")]);
    app.apply(TaskResult::Saved {
        resource: Resource::PurchaseRequest,
        mode: FormMode::Edit(RecordId::Int(2)),
        result: Ok(pr(2, "PR-002", "Approved")),
    });
    let records = app.active_screen().listing.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].text("status").as_deref(), Some("Approved"));
}

#[test]
fn edit_flow_submits_unchanged_record() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.handle_action(Action::MoveDown);
    app.handle_action(Action::EditItem);
    assert_eq!(app.key_context(), KeyContext::Form);
    assert_eq!(
        app.active_screen().listing.form.value("date"),
        Some("2024-03-01")
    );

    let commands = app.handle_action(Action::Confirm);
    assert!(app.banner.current().is_none());
    let (mode, body) = match commands.as_slice() {
        [Command::Save {
            resource: Resource::PurchaseRequest,
            mode,
            body,
        }] => (mode.clone(), body.clone()),
        other => panic!("expected a single save, got {:?}", other),
    };
    assert_eq!(mode, FormMode::Edit(RecordId::Int(1)));
    assert_eq!(body["date"], json!("2024-03-01"));
    assert_eq!(body["purpose"], json!("Supplies"));
    assert_eq!(body["pr_code"], json!("PR-001"));
    assert_eq!(body["user_id"], json!(42));

    app.apply(TaskResult::Saved {
        resource: Resource::PurchaseRequest,
        mode,
        result: Ok(pr(1, "PR-001", "Approved")),
    });
    assert!(!app.active_screen().listing.form.is_open());
    let records = app.active_screen().listing.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text("status").as_deref(), Some("Approved"));
}

// ============================================================================
// Delete flow
// ============================================================================

#[test]
fn delete_confirm_removes_only_target() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending"), pr(2, "PR-002", "Pending")]);
    app.handle_action(Action::MoveDown);
    app.handle_action(Action::DeleteItem);
    assert_eq!(app.key_context(), KeyContext::ConfirmDialog);

    let commands = app.handle_action(Action::Confirm);
    assert_eq!(
        commands,
        vec![Command::Delete {
            resource: Resource::PurchaseRequest,
            id: RecordId::Int(1),
        }]
    );
    assert_eq!(app.key_context(), KeyContext::Table);

    app.apply(TaskResult::Deleted {
        resource: Resource::PurchaseRequest,
        id: RecordId::Int(1),
        result: Ok(()),
    });
    let records = app.active_screen().listing.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), &RecordId::Int(2));
    assert_eq!(
        app.banner.current().unwrap().message,
        "PR-001 deleted successfully"
    );
}

#[test]
fn delete_cancel_leaves_collection() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.handle_action(Action::MoveDown);
    app.handle_action(Action::DeleteItem);
    let commands = app.handle_action(Action::Cancel);
    assert!(commands.is_empty());
    assert!(!app.active_screen().listing.confirm.is_open());
    assert_eq!(app.active_screen().listing.records().len(), 1);
}

#[test]
fn failed_delete_raises_error_and_keeps_record() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.apply(TaskResult::Deleted {
        resource: Resource::PurchaseRequest,
        id: RecordId::Int(1),
        result: Err("HTTP 500: boom".to_string()),
    });
    assert_eq!(app.active_screen().listing.records().len(), 1);
    assert_eq!(app.banner.current().unwrap().level, BannerLevel::Error);
}

#[test]
fn read_only_screen_refuses_mutations() {
    let mut app = App::new(base_config());
    app.switch_to(Resource::ReportsAudit);
    app.handle_action(Action::NewItem);
    assert!(!app.active_screen().listing.form.is_open());
    assert_eq!(app.banner.current().unwrap().level, BannerLevel::Info);
}

// ============================================================================
// Fetch lifecycle
// ============================================================================

#[test]
fn failed_fetch_keeps_previous_rows() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    let commands = app.handle_action(Action::Refresh);
    let ticket = match commands.as_slice() {
        [Command::Fetch { ticket, .. }] => *ticket,
        other => panic!("unexpected commands: {:?}", other),
    };
    app.apply(TaskResult::Fetched {
        resource: Resource::PurchaseRequest,
        ticket,
        result: Err("connection refused".to_string()),
    });
    assert_eq!(app.active_screen().listing.records().len(), 1);
    let banner = app.banner.current().unwrap();
    assert_eq!(banner.level, BannerLevel::Error);
    assert!(banner.message.contains("connection refused"));
}

#[test]
fn leaving_a_screen_cancels_its_fetch() {
    let mut app = App::new(base_config());
    let start = app.start();
    let ticket = start
        .iter()
        .find_map(|c| match c {
            Command::Fetch { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .unwrap();

    let commands = app.handle_action(Action::NextView);
    assert_eq!(commands[0], Command::CancelFetch(Resource::PurchaseRequest));
    assert!(matches!(
        commands[1],
        Command::Fetch {
            resource: Resource::Reimbursement,
            ..
        }
    ));

    app.apply(TaskResult::Fetched {
        resource: Resource::PurchaseRequest,
        ticket,
        result: Ok(vec![pr(1, "PR-001", "Pending")]),
    });
    assert!(app.screen(Resource::PurchaseRequest).listing.records().is_empty());
}

#[test]
fn successful_refetch_clears_error_banner() {
    let mut app = loaded_app(vec![]);
    let ticket = refresh_ticket(&mut app);
    app.apply(TaskResult::Fetched {
        resource: Resource::PurchaseRequest,
        ticket,
        result: Err("connection refused".to_string()),
    });
    let banner = app.banner.current().unwrap();
    assert_eq!(banner.level, BannerLevel::Error);
    assert_eq!(
        banner.message,
        "Failed to load Purchase Requests: connection refused"
    );

    let ticket = refresh_ticket(&mut app);
    app.apply(TaskResult::Fetched {
        resource: Resource::PurchaseRequest,
        ticket,
        result: Ok(vec![pr(1, "PR-001", "Pending")]),
    });
    assert!(app.banner.current().is_none());
    assert_eq!(app.active_screen().listing.records().len(), 1);
}

#[test]
fn successful_refetch_keeps_success_banner() {
    let mut app = loaded_app(vec![]);
    app.banner.success("PR-001 deleted successfully");
    let ticket = refresh_ticket(&mut app);
    app.apply(TaskResult::Fetched {
        resource: Resource::PurchaseRequest,
        ticket,
        result: Ok(vec![]),
    });
    assert_eq!(
        app.banner.current().unwrap().level,
        BannerLevel::Success
    );
}

#[test]
fn created_user_is_listed_in_name_order() {
    let mut app = loaded_app(vec![]);
    app.apply(TaskResult::Reference {
        resource: Resource::Users,
        result: Ok(vec![user(1, "Zed Ong"), user(2, "bea Santos")]),
    });
    app.apply(TaskResult::Saved {
        resource: Resource::Users,
        mode: FormMode::Create,
        result: Ok(user(3, "Amy Tan")),
    });
    assert_eq!(app.directory.user_options(), vec!["3", "2", "1"]);
    assert_eq!(app.directory.user_name("3"), Some("Amy Tan"));
}

#[test]
fn reference_users_feed_display_names() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.apply(TaskResult::Reference {
        resource: Resource::Users,
        result: Ok(vec![Record::from_value(json!({"id": 42, "name": "Dana Cruz"}), "id").unwrap()]),
    });
    app.handle_action(Action::EditSearch);
    type_text(&mut app, "dana");
    let view = app.active_screen().listing.view(&app.directory);
    assert_eq!(view.rows.len(), 1);
}

#[test]
fn reference_leave_types_feed_derived_days() {
    let mut app = App::new(base_config());
    app.apply(TaskResult::Reference {
        resource: Resource::LeaveTypes,
        result: Ok(vec![Record::from_value(
            json!({"id": 1, "leave_type": "Vacation", "days": 15}),
            "id",
        )
        .unwrap()]),
    });
    app.switch_to(Resource::UserLeaves);
    app.handle_action(Action::NewItem);
    app.handle_action(Action::NextField);
    app.handle_action(Action::ChoiceNext);
    let form = &app.active_screen().listing.form;
    assert_eq!(form.value("leave_type"), Some("Vacation"));
    assert_eq!(form.value("leave_days"), Some("15"));
}

// ============================================================================
// Filters and detail
// ============================================================================

#[test]
fn scope_toggle_limits_to_pending() {
    let mut app = loaded_app(vec![
        pr(1, "PR-001", "Pending"),
        pr(2, "PR-002", "Approved"),
    ]);
    assert_eq!(app.active_screen().listing.view(&app.directory).rows.len(), 2);
    app.handle_action(Action::ToggleScope);
    let view = app.active_screen().listing.view(&app.directory);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id(), &RecordId::Int(1));
}

#[test]
fn invalid_date_input_is_rejected() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.handle_action(Action::EditStartDate);
    type_text(&mut app, "March");
    app.handle_action(Action::Confirm);
    assert!(matches!(app.active_screen().input, InputMode::StartDate(_)));
    assert_eq!(app.banner.current().unwrap().level, BannerLevel::Error);
    assert!(app.active_screen().listing.filter().dates.start.is_none());
}

#[test]
fn date_input_filters_rows() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.handle_action(Action::EditStartDate);
    type_text(&mut app, "03/02/2024");
    app.handle_action(Action::Confirm);
    assert_eq!(app.active_screen().input, InputMode::Normal);
    assert!(app.active_screen().listing.view(&app.directory).rows.is_empty());

    app.handle_action(Action::ClearFilters);
    assert_eq!(app.active_screen().listing.view(&app.directory).rows.len(), 1);
}

#[test]
fn audit_date_range_is_sent_to_server() {
    let mut app = App::new(base_config());
    app.switch_to(Resource::ReportsAudit);
    app.handle_action(Action::EditEndDate);
    type_text(&mut app, "2024-01-31");
    let commands = app.handle_action(Action::Confirm);
    match commands.as_slice() {
        [Command::Fetch {
            resource: Resource::ReportsAudit,
            range: Some(range),
            ..
        }] => assert_eq!(range.query_params()[0].0, "endDate"),
        other => panic!("unexpected commands: {:?}", other),
    }
}

#[test]
fn detail_loads_requester_stamp() {
    let mut app = loaded_app(vec![pr(1, "PR-001", "Pending")]);
    app.handle_action(Action::MoveDown);
    let commands = app.handle_action(Action::Confirm);
    assert_eq!(commands, vec![Command::LoadProfile(RecordId::Int(42))]);

    app.apply(TaskResult::Profile {
        user_id: RecordId::Int(42),
        result: Ok(ResolvedProfile {
            name: "Dana Cruz".to_string(),
            signature_url: Some("http://localhost:5000/uploads/signatures/dana.png".to_string()),
        }),
    });
    let stamp = app.detail.as_ref().and_then(|d| d.requested_by.as_ref()).unwrap();
    assert_eq!(stamp.profile.as_ref().unwrap().name, "Dana Cruz");

    app.handle_action(Action::Cancel);
    assert!(app.detail.is_none());
}

#[test]
fn banner_expires_on_tick() {
    let mut app = App::new(base_config());
    app.banner.info("hello");
    app.tick(Utc::now() + Duration::seconds(5));
    assert!(app.banner.current().is_none());
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn persisted_state_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let mut app = App::new(base_config());
    app.switch_to(Resource::Users);
    app.handle_action(Action::CycleRowsPerPage);
    persistence::save(&path, &app.persisted_state()).unwrap();

    let loaded: PersistedState = persistence::load(&path).unwrap().unwrap();
    let mut restored = App::new(base_config());
    restored.restore(&loaded);
    assert_eq!(restored.active, Resource::Users);
    assert_eq!(
        restored.active_screen().listing.rows_per_page(),
        RowsPerPage::Twenty
    );
    assert_eq!(
        restored.screen(Resource::PurchaseRequest).listing.rows_per_page(),
        RowsPerPage::Ten
    );
}

#[test]
fn missing_state_file_loads_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(persistence::load(&dir.path().join("absent.json")).unwrap().is_none());
}

// ============================================================================
// Keys, navigation and theme
// ============================================================================

proptest! {
    #[test]
    fn keybinding_digit_switches_view(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let event = KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        };
        let action = map_key(event, KeyContext::Table);
        let expected_index = if ch == '0' { 9 } else { (digit - 1) as usize };
        prop_assert!(matches!(action, Some(Action::SwitchView(i)) if i == expected_index));
        prop_assert!(Resource::from_index(expected_index).is_some());
    }

    #[test]
    fn text_contexts_capture_characters(c in "[a-z0-9/ -]") {
        let c = c.chars().next().unwrap();
        for context in [KeyContext::TextInput, KeyContext::Form] {
            let action = map_key(key(KeyCode::Char(c)), context);
            prop_assert_eq!(action, Some(Action::Input(c)));
        }
    }

    #[test]
    fn navigation_keys_consistent(use_vim in prop::bool::ANY) {
        let event = if use_vim { key(KeyCode::Char('j')) } else { key(KeyCode::Down) };
        prop_assert_eq!(map_key(event, KeyContext::Table), Some(Action::MoveDown));
    }

    #[test]
    fn all_action_keys_mapped(key_char in "[qnedprsuc/\\[\\]]") {
        let c = key_char.chars().next().unwrap();
        let action = map_key(key(KeyCode::Char(c)), KeyContext::Table);
        prop_assert!(action.is_some(), "Key '{}' should map to an action", c);
    }

    #[test]
    fn tab_cycles_through_every_screen(steps in 0usize..30) {
        let mut resource = Resource::all()[0];
        for _ in 0..steps {
            resource = resource.next();
        }
        prop_assert_eq!(resource.index(), steps % Resource::all().len());
    }

    #[test]
    fn status_colors_correct(status in prop::sample::select(vec!["Pending", "approved", "REJECTED", "Draft"])) {
        let theme = LedgerTheme::ledger();
        let expected = match status.to_ascii_lowercase().as_str() {
            "pending" => theme.warning,
            "approved" => theme.success,
            "rejected" => theme.error,
            _ => theme.text,
        };
        prop_assert_eq!(status_color(status, &theme), expected);
    }

    /// Changing search or page size always lands back on page 1.
    #[test]
    fn filter_changes_reset_page(n in 0usize..60, pages in 0usize..8, term in "[a-z0-9]{1,3}") {
        let records = (0..n)
            .map(|i| pr(i as i64, &format!("PR-{:03}", i), "Pending"))
            .collect();
        let mut app = loaded_app(records);
        for _ in 0..pages {
            app.handle_action(Action::NextPage);
        }
        app.handle_action(Action::EditSearch);
        type_text(&mut app, &term);
        prop_assert_eq!(app.active_screen().listing.page(), 1);
        app.handle_action(Action::Confirm);
        for _ in 0..pages {
            app.handle_action(Action::NextPage);
        }
        app.handle_action(Action::CycleRowsPerPage);
        prop_assert_eq!(app.active_screen().listing.page(), 1);
    }
}

#[test]
fn confirm_dialog_keys() {
    assert_eq!(
        map_key(key(KeyCode::Char('y')), KeyContext::ConfirmDialog),
        Some(Action::Confirm)
    );
    assert_eq!(
        map_key(key(KeyCode::Esc), KeyContext::ConfirmDialog),
        Some(Action::Cancel)
    );
    assert_eq!(map_key(key(KeyCode::Char('q')), KeyContext::ConfirmDialog), None);
}

#[test]
fn ctrl_r_refreshes_everywhere() {
    let event = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
    for context in [
        KeyContext::Table,
        KeyContext::TextInput,
        KeyContext::Form,
        KeyContext::ConfirmDialog,
    ] {
        assert_eq!(map_key(event, context), Some(Action::Refresh));
    }
}

#[test]
fn banner_colors_follow_level() {
    let theme = LedgerTheme::ledger();
    assert_eq!(banner_color(BannerLevel::Success, &theme), theme.success);
    assert_eq!(banner_color(BannerLevel::Error, &theme), theme.error);
    assert_eq!(banner_color(BannerLevel::Info, &theme), theme.info);
}
