use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::models::ExpenseCategory;
use crate::tracker::ExpenseTracker;
use crate::ui::theme;
use crate::ui::util::{chart_value, format_amount};

pub(crate) fn render(f: &mut Frame, area: Rect, tracker: &ExpenseTracker) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Min(8),    // Spending chart
            Constraint::Length(3), // Total spending footer
        ])
        .split(area);

    render_summary_cards(f, chunks[0], tracker);

    let breakdown = tracker.spending_by_category();
    render_spending_chart(f, chunks[1], &breakdown);
    render_spending_total(f, chunks[2], &breakdown, tracker);
}

fn render_summary_cards(f: &mut Frame, area: Rect, tracker: &ExpenseTracker) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let balance = tracker.remaining_balance();

    render_card(
        f,
        cards[0],
        "Total Money",
        tracker.total_money(),
        theme::ACCENT,
        "set with :total",
    );
    render_card(
        f,
        cards[1],
        "Total Expenses",
        tracker.total_expenses(),
        theme::RED,
        &format!("{} expenses", tracker.expenses().len()),
    );
    render_card(
        f,
        cards[2],
        "Remaining Balance",
        balance,
        if balance < Decimal::ZERO {
            theme::RED
        } else {
            theme::GREEN
        },
        if balance < Decimal::ZERO {
            "over budget"
        } else {
            ""
        },
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: ratatui::style::Color,
    subtitle: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.to_string(), theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn chart_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Spending by Category ", theme::title_style()))
}

fn render_spending_chart(f: &mut Frame, area: Rect, breakdown: &[(ExpenseCategory, Decimal)]) {
    if breakdown.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No spending data to show", theme::dim_style())),
            Line::from(Span::styled(
                "Add an expense with :add <amount> <category>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(chart_block());
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = breakdown
        .iter()
        .map(|(category, amount)| {
            let color = category_color(*category);
            Bar::default()
                .value(chart_value(*amount))
                .text_value(format_amount(*amount))
                .label(Line::from(category.as_str()))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block())
        .data(BarGroup::default().bars(&bars))
        .bar_width(13)
        .bar_gap(2);

    f.render_widget(chart, area);
}

fn render_spending_total(
    f: &mut Frame,
    area: Rect,
    breakdown: &[(ExpenseCategory, Decimal)],
    tracker: &ExpenseTracker,
) {
    let total = breakdown
        .iter()
        .fold(Decimal::ZERO, |acc, (_, amount)| acc.saturating_add(*amount));
    let scope = if tracker.filter().is_empty() {
        "all expenses"
    } else {
        "filtered"
    };

    let line = Line::from(vec![
        Span::styled("Total Spending: ", theme::title_style()),
        Span::styled(
            format_amount(total),
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  ({scope})"), theme::dim_style()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY));
    f.render_widget(Paragraph::new(line).centered().block(block), area);
}

fn category_color(category: ExpenseCategory) -> ratatui::style::Color {
    let index = ExpenseCategory::all()
        .iter()
        .position(|c| *c == category)
        .unwrap_or(0);
    theme::CHART_COLORS[index % theme::CHART_COLORS.len()]
}
