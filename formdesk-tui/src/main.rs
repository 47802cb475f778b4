//! Formdesk TUI entry point.

use chrono::Utc;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use formdesk_tui::api_client::RestClient;
use formdesk_tui::config::TuiConfig;
use formdesk_tui::error::TuiError;
use formdesk_tui::events::TuiEvent;
use formdesk_tui::keys::map_key;
use formdesk_tui::logging;
use formdesk_tui::persistence;
use formdesk_tui::state::App;
use formdesk_tui::tasks::TaskRunner;
use formdesk_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init(&config.log_path)?;
    tracing::info!(
        api_base_url = %config.api_base_url,
        operator = %config.operator.name,
        "Configuration loaded"
    );

    let client = RestClient::new(&config)?;
    let mut app = App::new(config);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(&state),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable UI state"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard {};

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    let mut runner = TaskRunner::new(client, event_tx.clone());

    spawn_input_reader(event_tx.clone());
    let commands = app.start();
    runner.run_all(commands);

    let tick_rate = Duration::from_millis(app.config.tick_rate_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.tick(Utc::now());
            }
            Some(event) = event_rx.recv() => {
                let commands = handle_event(&mut app, event);
                runner.run_all(commands);
            }
        }

        if app.should_quit {
            break;
        }
    }

    if let Err(err) = persistence::save(&app.config.persistence_path, &app.persisted_state()) {
        tracing::warn!(error = %err, "Failed to save UI state");
    }
    tracing::info!("Shutting down");

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

fn handle_event(app: &mut App, event: TuiEvent) -> Vec<formdesk_tui::tasks::Command> {
    match event {
        TuiEvent::Input(key) => match map_key(key, app.key_context()) {
            Some(action) => app.handle_action(action),
            None => Vec::new(),
        },
        TuiEvent::Task(result) => {
            app.apply(*result);
            Vec::new()
        }
        TuiEvent::Resize { .. } => Vec::new(),
    }
}
