//! Schedule browser TUI main loop.

use std::io;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clarotv_api::epg::LocalEpgApi;
use clarotv_catalog::LocationCatalog;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{BrowserAction, BrowserState, Focus, InputMode};
use super::{ScreenGuard, ui};
use crate::controller::{local_now, run_fetch};

/// Runs the schedule browser until the user quits.
///
/// `status` is shown on the status line at start (e.g. a catalog load
/// failure).
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::future_not_send)]
pub async fn run_browser(
    catalog: LocationCatalog,
    tz: Tz,
    image_base_url: &str,
    api: &impl LocalEpgApi,
    status: Option<String>,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let screen = ScreenGuard::acquire();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = BrowserState::new(catalog, tz, image_base_url, local_now(tz), status);

    let result = run_event_loop(&mut terminal, &mut state, api).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    drop(screen);

    result
}

/// Main event loop.
#[allow(clippy::future_not_send)]
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    api: &impl LocalEpgApi,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let action = match state.input_mode {
                InputMode::Filter => {
                    handle_filter_input(state, key.code);
                    None
                }
                InputMode::Edit => {
                    handle_edit_input(state, key.code);
                    None
                }
                InputMode::Normal => handle_normal_input(state, key.code, key.modifiers),
            };

            match action {
                Some(BrowserAction::Quit) => return Ok(()),
                Some(BrowserAction::Fetch(query)) => {
                    state.begin_fetch();
                    terminal
                        .draw(|frame| ui::draw(frame, state))
                        .context("failed to draw TUI")?;

                    let phase = run_fetch(api, &query, state.image_base_url()).await;
                    state.finish_fetch(phase);
                }
                None => {}
            }
        }
    }
}

/// Handles key input in filter mode.
fn handle_filter_input(state: &mut BrowserState, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            state.clear_filter();
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            state.filter_pop();
        }
        KeyCode::Char(c) => {
            state.filter_push(c);
        }
        _ => {}
    }
}

/// Handles key input while editing a date/time field.
fn handle_edit_input(state: &mut BrowserState, key: KeyCode) {
    match key {
        KeyCode::Esc => state.cancel_edit(),
        KeyCode::Enter => state.commit_edit(),
        KeyCode::Backspace => {
            state.edit_buffer.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || c == '/' || c == ':' => {
            state.edit_buffer.push(c);
        }
        _ => {}
    }
}

/// Handles key input in normal mode. Returns `Some` for actions the loop
/// must carry out.
fn handle_normal_input(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> Option<BrowserAction> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(BrowserAction::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(BrowserAction::Quit);
        }
        KeyCode::Tab => state.focus_next(),
        KeyCode::BackTab => state.focus_prev(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::PageUp => state.page(true),
        KeyCode::PageDown => state.page(false),
        KeyCode::Char('/') if state.focus == Focus::States => {
            state.input_mode = InputMode::Filter;
        }
        KeyCode::Char('e') if state.focus.is_datetime_field() => state.begin_edit(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            return state.activate().map(BrowserAction::Fetch);
        }
        _ => {}
    }
    None
}
