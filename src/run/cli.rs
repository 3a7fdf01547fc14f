use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::input;
use crate::models::FilterCriteria;
use crate::tracker::{today, ExpenseTracker};
use crate::ui::util::{format_amount, short_id, truncate};

pub(crate) fn as_cli(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], tracker),
        "list" | "ls" => cli_list(&args[2..], tracker),
        "summary" | "s" => cli_summary(&args[2..], tracker),
        "total" | "t" => cli_total(&args[2..], tracker),
        "delete" | "rm" => cli_delete(&args[2..], tracker),
        "edit" => cli_edit(&args[2..], tracker),
        "export" => cli_export(&args[2..], tracker),
        "reset" => {
            tracker.reset();
            println!("All expenses and the total money were removed");
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendtui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SpendTUI: local expense tracker");
    println!();
    println!("Usage: spendtui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  add <amount> <category> [date] [description]");
    println!("                                      Record an expense");
    println!("  list [filters]                      List expenses, newest first");
    println!("  summary [filters]                   Totals and spending by category");
    println!("  total <amount>                      Set the total money available");
    println!("  delete <id>                         Delete an expense (id prefix is enough)");
    println!("  edit <id> <amount> <category> [date] [description]");
    println!("                                      Replace an expense's fields");
    println!("  export [dir] [filters]              Write expenses_YYYYMMDD.csv");
    println!("  reset                               Remove all stored data");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("Filters: category=<name> from=<YYYY-MM-DD> to=<YYYY-MM-DD> [search words]");
    println!("Categories: Food Transport Utilities Entertainment Shopping Health Housing Other");
}

fn cli_add(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: spendtui add <amount> <category> [YYYY-MM-DD] [description]");
    }

    let draft = input::parse_expense(&args.join(" "), today())?;
    let expense = tracker.add(draft);
    println!(
        "Expense added: {} {} on {} [{}]",
        expense.category,
        format_amount(expense.amount),
        expense.date,
        short_id(&expense.id)
    );
    warn_if_not_saved(tracker);
    Ok(())
}

fn cli_list(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    apply_filter_args(args, tracker)?;
    let expenses = tracker.filtered_expenses();
    if expenses.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    println!(
        "{:<10} {:<12} {:<14} {:>12}  Description",
        "ID", "Date", "Category", "Amount"
    );
    println!("{}", "─".repeat(72));
    for e in &expenses {
        println!(
            "{:<10} {:<12} {:<14} {:>12}  {}",
            short_id(&e.id),
            e.date,
            e.category,
            format_amount(e.amount),
            truncate(e.description_or_empty(), 40)
        );
    }
    println!("{}", "─".repeat(72));
    println!("{} expense(s)", expenses.len());
    Ok(())
}

fn cli_summary(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    apply_filter_args(args, tracker)?;
    let breakdown = tracker.spending_by_category();

    println!("SpendTUI summary");
    println!("{}", "─".repeat(40));
    println!("  Total Money:        {}", format_amount(tracker.total_money()));
    println!("  Total Expenses:     {}", format_amount(tracker.total_expenses()));
    println!(
        "  Remaining Balance:  {}",
        format_amount(tracker.remaining_balance())
    );
    println!("  Expenses:           {}", tracker.expenses().len());

    let filter = tracker.filter().describe();
    println!();
    if filter.is_empty() {
        println!("Spending by Category:");
    } else {
        println!("Spending by Category ({filter}):");
    }
    if breakdown.is_empty() {
        println!("  No spending data");
        return Ok(());
    }
    for (category, amount) in &breakdown {
        println!("  {:<16} {:>12}", category.as_str(), format_amount(*amount));
    }
    let total = breakdown
        .iter()
        .fold(rust_decimal::Decimal::ZERO, |acc, (_, a)| acc.saturating_add(*a));
    println!("  {:<16} {:>12}", "Total Spending", format_amount(total));
    Ok(())
}

fn cli_total(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    let Some(value) = args.first() else {
        println!("Total money: {}", format_amount(tracker.total_money()));
        return Ok(());
    };

    tracker.set_total_money_input(value);
    println!("Total money set to {}", format_amount(tracker.total_money()));
    println!(
        "Remaining balance: {}",
        format_amount(tracker.remaining_balance())
    );
    warn_if_not_saved(tracker);
    Ok(())
}

fn cli_delete(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    let prefix = args
        .first()
        .context("Usage: spendtui delete <id>")?;
    let expense = tracker
        .find(prefix)
        .cloned()
        .with_context(|| format!("No expense matches id '{prefix}' (or the prefix is ambiguous)"))?;

    tracker.delete(&expense.id);
    println!(
        "Expense deleted: {} {} on {}",
        expense.category,
        format_amount(expense.amount),
        expense.date
    );
    warn_if_not_saved(tracker);
    Ok(())
}

fn cli_edit(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: spendtui edit <id> <amount> <category> [YYYY-MM-DD] [description]");
    }

    let prefix = &args[0];
    let current = tracker
        .find(prefix)
        .cloned()
        .with_context(|| format!("No expense matches id '{prefix}' (or the prefix is ambiguous)"))?;

    let draft = input::parse_expense(&args[1..].join(" "), today())?;
    tracker.start_editing(&current.id);
    let updated = current.with_draft(draft, current.date);
    tracker.update(updated.clone());
    println!(
        "Expense updated: {} {} on {}",
        updated.category,
        format_amount(updated.amount),
        updated.date
    );
    warn_if_not_saved(tracker);
    Ok(())
}

fn cli_export(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    // A leading argument naming an existing directory is the target
    let (dir, filter_args) = match args.split_first() {
        Some((first, rest)) if !first.contains('=') && is_dir(first) => {
            (Some(PathBuf::from(super::shellexpand(first))), rest)
        }
        _ => (super::default_export_dir(), args),
    };

    apply_filter_args(filter_args, tracker)?;
    if tracker.filtered_expenses().is_empty() {
        println!("No expenses to export");
        return Ok(());
    }

    match tracker.export_expenses(dir.as_deref(), today())? {
        Some(path) => println!(
            "Exported {} expense(s) to {}",
            tracker.filtered_expenses().len(),
            path.display()
        ),
        None => println!("Export skipped: no download or home directory found"),
    }
    Ok(())
}

fn is_dir(arg: &str) -> bool {
    std::path::Path::new(&super::shellexpand(arg)).is_dir()
}

fn apply_filter_args(args: &[String], tracker: &mut ExpenseTracker) -> Result<()> {
    let filter: FilterCriteria = input::parse_filter(&args.join(" "), today())?;
    tracker.set_filter(filter);
    Ok(())
}

fn warn_if_not_saved(tracker: &ExpenseTracker) {
    if !tracker.is_persistent() {
        eprintln!("Warning: storage unavailable, this change was not saved");
    }
}
