use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::tracker::ExpenseTracker;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(tracker: &mut ExpenseTracker) -> Result<()> {
    let mut app = App::new(super::default_export_dir());
    if !tracker.is_persistent() {
        app.set_status("Storage unavailable: changes will not be saved");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("tui started with {} expenses", tracker.expenses().len());
    let result = run_app(&mut terminal, &mut app, tracker);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("tui exited with error: {e:#}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tracker: &mut ExpenseTracker,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab, filter, status and command bars plus table borders and header
            let content_height = f.area().height.saturating_sub(7) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app, tracker);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, tracker)?,
                InputMode::Command => handle_command_input(key, app, tracker)?,
                InputMode::Search => handle_search_input(key, app, tracker),
                InputMode::Editing => handle_editing_input(key, app, tracker),
                InputMode::Confirm => handle_confirm_input(key, app, tracker),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(
    key: event::KeyEvent,
    app: &mut App,
    tracker: &mut ExpenseTracker,
) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.screen = Screen::Expenses;
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app, tracker),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, tracker, Screen::Dashboard),
        KeyCode::Char('2') => switch_screen(app, tracker, Screen::Expenses),
        KeyCode::Tab | KeyCode::BackTab => {
            // Two screens, so forward and back are the same move
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, tracker, screens[next]);
        }
        KeyCode::Esc => {
            app.status_message.clear();
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app, tracker),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app, tracker);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('e') | KeyCode::Enter if app.screen == Screen::Expenses => {
            commands::handle_command("edit", app, tracker)?;
        }
        KeyCode::Char('D') if app.screen == Screen::Expenses => {
            commands::handle_command("delete", app, tracker)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(
    key: event::KeyEvent,
    app: &mut App,
    tracker: &mut ExpenseTracker,
) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, tracker)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App, tracker: &mut ExpenseTracker) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.apply_search(tracker);
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.apply_search(tracker);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.apply_search(tracker);
        }
        _ => {}
    }
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, tracker: &mut ExpenseTracker) {
    match key.code {
        KeyCode::Enter => {
            let line = app.command_input.clone();
            if commands::submit_edit(&line, app, tracker) {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Esc => {
            tracker.cancel_editing();
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, tracker: &mut ExpenseTracker) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::DeleteExpense { id, label } => {
                        if tracker.delete(&id) {
                            app.clamp_cursor(tracker);
                            app.set_status(commands::deleted_message(&id, &label));
                        } else {
                            app.set_status("Expense no longer exists");
                        }
                    }
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, tracker: &ExpenseTracker, screen: Screen) {
    app.screen = screen;
    if screen == Screen::Expenses {
        app.clamp_cursor(tracker);
    }
}

fn handle_move_down(app: &mut App, tracker: &ExpenseTracker) {
    if app.screen == Screen::Expenses {
        let len = tracker.filtered_expenses().len();
        let page = app.visible_rows.max(1);
        scroll_down(&mut app.expense_index, &mut app.expense_scroll, len, page);
    }
}

fn handle_move_up(app: &mut App) {
    if app.screen == Screen::Expenses {
        scroll_up(&mut app.expense_index, &mut app.expense_scroll);
    }
}

fn handle_goto_top(app: &mut App) {
    if app.screen == Screen::Expenses {
        scroll_to_top(&mut app.expense_index, &mut app.expense_scroll);
    }
}

fn handle_goto_bottom(app: &mut App, tracker: &ExpenseTracker) {
    if app.screen == Screen::Expenses {
        let len = tracker.filtered_expenses().len();
        let page = app.visible_rows.max(1);
        scroll_to_bottom(&mut app.expense_index, &mut app.expense_scroll, len, page);
    }
}
