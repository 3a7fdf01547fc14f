use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;
use super::util::format_amount;
use crate::tracker::ExpenseTracker;

pub(crate) fn render(f: &mut Frame, app: &App, tracker: &ExpenseTracker) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Filter bar
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app, tracker);
    render_filter_bar(f, chunks[2], tracker);
    render_status_bar(f, chunks[3], app, tracker);
    render_command_bar(f, chunks[4], app, tracker);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let [brand_area, tabs_area] =
        Layout::horizontal([Constraint::Length(11), Constraint::Min(0)]).areas(area);

    let brand = Paragraph::new(Span::styled(
        " SpendTUI ",
        Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    ));
    f.render_widget(brand, brand_area);

    let screens = Screen::all();
    let titles: Vec<String> = screens
        .iter()
        .enumerate()
        .map(|(i, screen)| format!("[{}] {screen}", i + 1))
        .collect();
    let selected = screens.iter().position(|s| *s == app.screen).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme::TEXT_DIM).bg(theme::HEADER_BG))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" ");
    f.render_widget(tabs, tabs_area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App, tracker: &ExpenseTracker) {
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, area, tracker),
        Screen::Expenses => super::screens::expenses::render(f, area, app, tracker),
    }
}

fn render_filter_bar(f: &mut Frame, area: Rect, tracker: &ExpenseTracker) {
    let summary = tracker.filter().describe();
    let line = if summary.is_empty() {
        Line::from(Span::styled(" Filter: none", theme::dim_style()))
    } else {
        Line::from(vec![
            Span::styled(" Filter: ", theme::dim_style()),
            Span::styled(summary, Style::default().fg(theme::YELLOW)),
            Span::styled("  (:cf to clear)", theme::dim_style()),
        ])
    };
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme::HEADER_BG)),
        area,
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, tracker: &ExpenseTracker) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
        InputMode::Command | InputMode::Editing => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::GREEN)
            .add_modifier(Modifier::BOLD),
        InputMode::Search => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
        InputMode::Confirm => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::RED)
            .add_modifier(Modifier::BOLD),
    };

    let persistence = if tracker.is_persistent() {
        ""
    } else {
        " | not saved"
    };
    let info = format!(
        " {} | {} expenses | balance {}{persistence}",
        app.screen,
        tracker.expenses().len(),
        format_amount(tracker.remaining_balance()),
    );

    let right = match app.screen {
        Screen::Dashboard => " :add | :total | ? help ",
        Screen::Expenses => " e edit | D delete | /search | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App, tracker: &ExpenseTracker) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Search => {
            let match_info = if !app.search_input.is_empty() {
                format!("  ({} matches)", tracker.filtered_expenses().len())
            } else {
                String::new()
            };
            (
                Line::from(vec![
                    Span::styled("/", Style::default().fg(theme::YELLOW)),
                    Span::styled(&app.search_input, theme::command_bar_style()),
                    Span::styled(match_info, theme::dim_style()),
                ]),
                Some(1 + app.search_input.chars().count() as u16),
            )
        }
        InputMode::Editing => (
            Line::from(vec![
                Span::styled("edit> ", Style::default().fg(theme::GREEN)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(6 + app.command_input.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, / to search, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

/// Key bindings shown in the help overlay, grouped by where they apply.
const KEY_HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Anywhere",
        &[
            ("1  2  Tab", "switch between Dashboard and Expenses"),
            ("j k  Up Down", "move the row cursor"),
            ("g  G", "jump to the first or last row"),
            ("Ctrl-d  Ctrl-u", "move half a page"),
            (":", "open the command line"),
            ("/", "search descriptions and categories as you type"),
            ("Esc", "clear the message line"),
            ("?", "show this overlay"),
            ("Ctrl-q  Ctrl-c", "leave SpendTUI"),
        ],
    ),
    (
        "On the Expenses tab",
        &[
            ("e  Enter", "edit the expense under the cursor"),
            ("D", "delete it, after a y/N prompt"),
        ],
    ),
    (
        "In the edit line",
        &[
            ("Enter", "save the changes"),
            ("Esc", "drop the changes"),
            ("Ctrl-u", "clear the line"),
        ],
    ),
];

/// One line per registered command, its aliases joined, shortest name last.
fn command_help_lines() -> Vec<(String, &'static str)> {
    let mut by_description: Vec<(&'static str, Vec<&'static str>)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        match by_description
            .iter_mut()
            .find(|(desc, _)| *desc == cmd.description)
        {
            Some((_, names)) => names.push(name),
            None => by_description.push((cmd.description, vec![name])),
        }
    }

    let mut lines: Vec<(String, &'static str)> = by_description
        .into_iter()
        .map(|(desc, mut names)| {
            names.sort_by_key(|n| std::cmp::Reverse(n.len()));
            let joined: Vec<String> = names.iter().map(|n| format!(":{n}")).collect();
            (joined.join(" "), desc)
        })
        .collect();
    lines.sort();
    lines
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let heading = Style::default()
        .fg(theme::YELLOW)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(theme::ACCENT);

    let mut lines: Vec<Line> = Vec::new();
    for (group, keys) in KEY_HELP {
        lines.push(Line::from(Span::styled(format!(" {group}"), heading)));
        for (key, what) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("   {key:<16}"), key_style),
                Span::styled(*what, theme::normal_style()),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(" Commands", heading)));
    for (names, desc) in command_help_lines() {
        lines.push(Line::from(vec![
            Span::styled(format!("   {names:<24}"), key_style),
            Span::styled(desc, theme::normal_style()),
        ]));
    }

    let height = (lines.len() as u16 + 2).min(area.height);
    let width = 96.min(area.width);
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, popup, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(row);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(Span::styled(" Keys and commands ", theme::title_style()))
        .title_bottom(
            Line::from(Span::styled(" any key closes ", theme::dim_style())).right_aligned(),
        )
        .style(Style::default().bg(theme::HEADER_BG));

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
