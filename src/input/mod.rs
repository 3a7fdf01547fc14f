//! Parsing and validation of user-entered text.
//!
//! Everything typed on the command line or in the TUI goes through here
//! before it reaches the tracker, so the tracker can trust its inputs.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{
    max_amount, Expense, ExpenseCategory, FilterCriteria, NewExpense, MAX_AMOUNT_DIGITS,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    #[error("Amount is required.")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must be positive.")]
    NonPositiveAmount,
    #[error("Amount is too large.")]
    AmountTooLarge,
    #[error("Amount has too many digits.")]
    AmountTooPrecise,
    #[error("Category is required.")]
    MissingCategory,
    #[error("Unknown category '{0}'. Valid: {1}")]
    UnknownCategory(String, String),
    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),
}

/// Parse an expense amount. Accepts a leading `$` and thousands separators.
/// Rejects anything above [`max_amount`] or with more significant digits
/// than can be stored exactly.
pub(crate) fn parse_amount(text: &str) -> Result<Decimal, InputError> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(InputError::MissingAmount);
    }
    let amount =
        Decimal::from_str(&cleaned).map_err(|_| InputError::InvalidAmount(text.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(InputError::NonPositiveAmount);
    }
    if amount > max_amount() {
        return Err(InputError::AmountTooLarge);
    }
    if amount.normalize().mantissa() >= 10_i128.pow(MAX_AMOUNT_DIGITS) {
        return Err(InputError::AmountTooPrecise);
    }
    Ok(amount)
}

pub(crate) fn parse_category(text: &str) -> Result<ExpenseCategory, InputError> {
    if text.trim().is_empty() {
        return Err(InputError::MissingCategory);
    }
    ExpenseCategory::parse(text).ok_or_else(|| {
        let valid: Vec<&str> = ExpenseCategory::all().iter().map(|c| c.as_str()).collect();
        InputError::UnknownCategory(text.to_string(), valid.join(", "))
    })
}

/// `YYYY-MM-DD`, or the words `today` / `yesterday` relative to `today`.
pub(crate) fn parse_date(text: &str, today: NaiveDate) -> Result<NaiveDate, InputError> {
    match text.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        s => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| InputError::InvalidDate(text.to_string())),
    }
}

/// `<amount> <category> [date] [description...]`
///
/// The third token is read as a date only when it parses as one, including
/// the words `today` and `yesterday`; otherwise it starts the description.
/// A description that itself begins with one of those words needs an
/// explicit date in front of it.
pub(crate) fn parse_expense(args: &str, today: NaiveDate) -> Result<NewExpense, InputError> {
    let mut tokens = args.split_whitespace();
    let amount = parse_amount(tokens.next().unwrap_or(""))?;
    let category = parse_category(tokens.next().unwrap_or(""))?;

    let rest: Vec<&str> = tokens.collect();
    let (date, description_tokens) = match rest.split_first() {
        Some((first, tail)) => match parse_date(first, today) {
            Ok(d) => (Some(d), tail),
            Err(_) => (None, rest.as_slice()),
        },
        None => (None, rest.as_slice()),
    };

    let draft = NewExpense::new(amount, category).described(description_tokens.join(" "));
    Ok(match date {
        Some(d) => draft.on(d),
        None => draft,
    })
}

/// Inverse of [`parse_expense`], used to prefill an edit line.
pub(crate) fn format_expense(expense: &Expense) -> String {
    let mut line = format!(
        "{} {} {}",
        expense.amount_text(),
        expense.category,
        expense.date.format("%Y-%m-%d")
    );
    if let Some(d) = expense.description.as_deref().filter(|d| !d.is_empty()) {
        line.push(' ');
        line.push_str(d);
    }
    line
}

/// Space separated clauses: `category=<c>`, `from=<date>`, `to=<date>`.
/// Any other words form the search term.
pub(crate) fn parse_filter(args: &str, today: NaiveDate) -> Result<FilterCriteria, InputError> {
    let mut filter = FilterCriteria::default();
    let mut search: Vec<&str> = Vec::new();

    for token in args.split_whitespace() {
        match token.split_once('=') {
            Some(("category" | "cat" | "c", value)) => {
                filter.category = Some(parse_category(value)?);
            }
            Some(("from" | "start", value)) => {
                filter.start_date = Some(parse_date(value, today)?);
            }
            Some(("to" | "end", value)) => {
                filter.end_date = Some(parse_date(value, today)?);
            }
            _ => search.push(token),
        }
    }

    if !search.is_empty() {
        filter.search_term = Some(search.join(" "));
    }
    Ok(filter)
}
