use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use super::util::{format_amount, short_id};
use crate::input;
use crate::models::FilterCriteria;
use crate::tracker::{today, ExpenseTracker};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut ExpenseTracker) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit SpendTUI", cmd_quit, r);
    register_command!("quit", "Quit SpendTUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 12.50 Food 2024-01-15 Lunch)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add expense (e.g. :add 12.50 Food 2024-01-15 Lunch)",
        cmd_add,
        r
    );
    register_command!(
        "edit",
        "Edit selected expense (e.g. :edit 15 Food Dinner)",
        cmd_edit,
        r
    );
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!(
        "total",
        "Set total money (e.g. :total 2500)",
        cmd_total,
        r
    );
    register_command!("t", "Set total money (e.g. :total 2500)", cmd_total, r);
    register_command!(
        "filter",
        "Set filter (e.g. :filter category=Food from=2024-01-01 coffee)",
        cmd_filter,
        r
    );
    register_command!(
        "f",
        "Set filter (e.g. :filter category=Food from=2024-01-01 coffee)",
        cmd_filter,
        r
    );
    register_command!(
        "category",
        "Filter by category (empty clears, e.g. :category Health)",
        cmd_category,
        r
    );
    register_command!(
        "from",
        "Filter from date (empty clears, e.g. :from 2024-01-01)",
        cmd_from,
        r
    );
    register_command!(
        "to",
        "Filter up to date (empty clears, e.g. :to 2024-01-31)",
        cmd_to,
        r
    );
    register_command!(
        "search",
        "Search expenses (e.g. :search coffee)",
        cmd_search,
        r
    );
    register_command!("s", "Search expenses (e.g. :search coffee)", cmd_search, r);
    register_command!("clear-filter", "Clear all filters", cmd_clear_filter, r);
    register_command!("cf", "Clear all filters", cmd_clear_filter, r);
    register_command!(
        "export",
        "Export filtered expenses to CSV",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    tracker: &mut ExpenseTracker,
) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, tracker)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.clamp_cursor(tracker);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :add <amount> <category> [YYYY-MM-DD] [description]");
        return Ok(());
    }

    match input::parse_expense(args, today()) {
        Ok(draft) => {
            let added = tracker.add(draft);
            app.clamp_cursor(tracker);
            app.set_status(format!(
                "Expense added: {} {}",
                added.category,
                format_amount(added.amount)
            ));
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    let Some(id) = app.selected_id(tracker) else {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    };

    tracker.start_editing(&id);
    if args.is_empty() {
        // Inline edit, prefilled with the current values
        if let Some(expense) = tracker.editing_expense() {
            app.command_input = input::format_expense(expense);
            app.input_mode = InputMode::Editing;
            app.set_status("Edit the expense, Enter to save, Esc to cancel");
        }
        return Ok(());
    }

    submit_edit(args, app, tracker);
    Ok(())
}

/// Apply an edit line to the expense being edited. Invalid input keeps the
/// edit session open.
pub(crate) fn submit_edit(line: &str, app: &mut App, tracker: &mut ExpenseTracker) -> bool {
    let Some(current) = tracker.editing_expense().cloned() else {
        tracker.cancel_editing();
        app.set_status("Nothing to edit");
        return false;
    };

    match input::parse_expense(line, today()) {
        Ok(draft) => {
            let updated = current.with_draft(draft, current.date);
            tracker.update(updated);
            app.clamp_cursor(tracker);
            app.set_status("Expense updated");
            true
        }
        Err(e) => {
            app.set_status(e.to_string());
            false
        }
    }
}

fn cmd_delete(_args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }

    let filtered = tracker.filtered_expenses();
    if let Some(expense) = filtered.get(app.expense_index) {
        let label = format!(
            "{} {} on {}",
            expense.category,
            format_amount(expense.amount),
            expense.date
        );
        app.confirm_message = format!("Delete {label}?");
        app.pending_action = Some(PendingAction::DeleteExpense {
            id: expense.id.clone(),
            label,
        });
        app.input_mode = InputMode::Confirm;
    } else {
        app.set_status("No expense selected");
    }

    Ok(())
}

fn cmd_total(args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!(
            "Total money: {}. Usage: :total <amount>",
            format_amount(tracker.total_money())
        ));
        return Ok(());
    }

    tracker.set_total_money_input(args);
    app.set_status(format!(
        "Total money set to {}",
        format_amount(tracker.total_money())
    ));
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    match input::parse_filter(args, today()) {
        Ok(filter) => {
            app.search_input = filter.search_term.clone().unwrap_or_default();
            apply_filter(filter, app, tracker);
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    let mut filter = tracker.filter().clone();
    if args.is_empty() {
        filter.category = None;
    } else {
        match input::parse_category(args) {
            Ok(c) => filter.category = Some(c),
            Err(e) => {
                app.set_status(e.to_string());
                return Ok(());
            }
        }
    }
    apply_filter(filter, app, tracker);
    Ok(())
}

fn cmd_from(args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    set_date_bound(args, app, tracker, |f, d| f.start_date = d)
}

fn cmd_to(args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    set_date_bound(args, app, tracker, |f, d| f.end_date = d)
}

fn set_date_bound(
    args: &str,
    app: &mut App,
    tracker: &mut ExpenseTracker,
    set: fn(&mut FilterCriteria, Option<chrono::NaiveDate>),
) -> anyhow::Result<()> {
    let date = if args.is_empty() {
        None
    } else {
        match input::parse_date(args, today()) {
            Ok(d) => Some(d),
            Err(e) => {
                app.set_status(e.to_string());
                return Ok(());
            }
        }
    };
    let mut filter = tracker.filter().clone();
    set(&mut filter, date);
    apply_filter(filter, app, tracker);
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Expenses;
    app.apply_search(tracker);

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}

fn cmd_clear_filter(_args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    app.search_input.clear();
    tracker.clear_filter();
    app.clamp_cursor(tracker);
    app.set_status("Filters cleared");
    Ok(())
}

fn cmd_export(_args: &str, app: &mut App, tracker: &mut ExpenseTracker) -> anyhow::Result<()> {
    if tracker.filtered_expenses().is_empty() {
        app.set_status("No expenses to export");
        return Ok(());
    }

    match tracker.export_expenses(app.export_dir.as_deref(), today()) {
        Ok(Some(path)) => app.set_status(format!("Export successful: {}", path.display())),
        Ok(None) => app.set_status("Export unavailable: no export directory"),
        Err(e) => {
            tracing::error!("export failed: {e:#}");
            app.set_status(format!("Export failed: {e}"));
        }
    }
    Ok(())
}

fn apply_filter(filter: FilterCriteria, app: &mut App, tracker: &mut ExpenseTracker) {
    let summary = filter.describe();
    tracker.set_filter(filter);
    app.expense_index = 0;
    app.expense_scroll = 0;
    let count = tracker.filtered_expenses().len();
    if summary.is_empty() {
        app.set_status(format!("Filters cleared ({count} expenses)"));
    } else {
        app.set_status(format!("Filter: {summary} ({count} matching)"));
    }
}

/// Id shown in the status line after a delete.
pub(crate) fn deleted_message(id: &str, label: &str) -> String {
    format!("Expense deleted: {label} [{}]", short_id(id))
}
