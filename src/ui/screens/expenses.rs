use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::tracker::ExpenseTracker;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, tracker: &ExpenseTracker) {
    let expenses = tracker.filtered_expenses();

    if expenses.is_empty() {
        let msg = if tracker.expenses().is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled("No expenses yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Add one with :add <amount> <category> [date] [description]",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No expenses match the current filter",
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc in search or run :cf to clear it",
                    theme::dim_style(),
                )),
            ]
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Expenses (0) ", theme::title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Date", "Category", "Amount", "Description"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let editing_id = tracker.editing_id();

    let rows: Vec<Row> = expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            let is_editing = editing_id == Some(expense.id.as_str());
            let style = if is_editing {
                theme::editing_style()
            } else if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let marker = if is_editing { "\u{270e} " } else { "  " };

            Row::new(vec![
                Cell::from(format!("{marker}{}", expense.date)),
                Cell::from(expense.category.as_str()),
                Cell::from(Span::styled(
                    format_amount(expense.amount),
                    theme::expense_style(),
                )),
                Cell::from(truncate(expense.description_or_empty(), 48)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(15),
        Constraint::Length(14),
        Constraint::Min(20),
    ];

    let search = tracker.filter().search_term().unwrap_or_default();
    let title = if search.is_empty() {
        format!(" Expenses ({}) ", expenses.len())
    } else {
        format!(" Expenses ({}) search: '{search}' ", expenses.len())
    };

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}
