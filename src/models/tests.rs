#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn make_expense(amount: Decimal, category: ExpenseCategory, day: &str) -> Expense {
    Expense {
        id: "id-1".into(),
        amount,
        category,
        description: Some("Lunch with \"Sam\"".into()),
        date: date(day),
    }
}

// ── ExpenseCategory ───────────────────────────────────────────

#[test]
fn test_category_parse() {
    assert_eq!(ExpenseCategory::parse("food"), Some(ExpenseCategory::Food));
    assert_eq!(ExpenseCategory::parse("FOOD"), Some(ExpenseCategory::Food));
    assert_eq!(
        ExpenseCategory::parse(" Transport "),
        Some(ExpenseCategory::Transport)
    );
    assert_eq!(
        ExpenseCategory::parse("entertainment"),
        Some(ExpenseCategory::Entertainment)
    );
    assert_eq!(ExpenseCategory::parse("groceries"), None);
    assert_eq!(ExpenseCategory::parse(""), None);
}

#[test]
fn test_category_all_order() {
    let labels: Vec<&str> = ExpenseCategory::all().iter().map(|c| c.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Food",
            "Transport",
            "Utilities",
            "Entertainment",
            "Shopping",
            "Health",
            "Housing",
            "Other"
        ]
    );
}

#[test]
fn test_category_roundtrip() {
    for c in ExpenseCategory::all() {
        assert_eq!(ExpenseCategory::parse(c.as_str()), Some(*c));
        assert_eq!(format!("{c}"), c.as_str());
    }
}

#[test]
fn test_category_json_uses_label() {
    let json = serde_json::to_string(&ExpenseCategory::Housing).unwrap();
    assert_eq!(json, "\"Housing\"");
    assert!(serde_json::from_str::<ExpenseCategory>("\"Pets\"").is_err());
}

// ── Expense ───────────────────────────────────────────────────

#[test]
fn test_amount_text_is_normalized() {
    let e = make_expense(dec!(12.50), ExpenseCategory::Food, "2024-01-10");
    assert_eq!(e.amount_text(), "12.5");
    let e = make_expense(dec!(50.00), ExpenseCategory::Food, "2024-01-10");
    assert_eq!(e.amount_text(), "50");
}

#[test]
fn test_expense_json_shape() {
    let mut e = make_expense(dec!(30), ExpenseCategory::Transport, "2024-01-15");
    e.description = None;
    let value = serde_json::to_value(&e).unwrap();
    assert_eq!(value["id"], "id-1");
    assert_eq!(value["amount"].as_f64(), Some(30.0));
    assert_eq!(value["category"], "Transport");
    assert_eq!(value["date"], "2024-01-15");
    assert!(value.get("description").is_none());
}

#[test]
fn test_expense_json_accepts_integer_amount_and_missing_description() {
    let json = r#"{"id":"x","amount":50,"category":"Food","date":"2024-01-10"}"#;
    let e: Expense = serde_json::from_str(json).unwrap();
    assert_eq!(e.amount, dec!(50));
    assert!(e.description.is_none());
    assert_eq!(e.date, date("2024-01-10"));
}

#[test]
fn test_with_draft_keeps_id() {
    let e = make_expense(dec!(10), ExpenseCategory::Food, "2024-01-10");
    let draft = NewExpense::new(dec!(20), ExpenseCategory::Health).described("Pharmacy");
    let updated = e.with_draft(draft, date("2024-03-01"));
    assert_eq!(updated.id, "id-1");
    assert_eq!(updated.amount, dec!(20));
    assert_eq!(updated.category, ExpenseCategory::Health);
    assert_eq!(updated.description.as_deref(), Some("Pharmacy"));
    assert_eq!(updated.date, date("2024-03-01"));
}

#[test]
fn test_new_expense_empty_description_is_none() {
    let draft = NewExpense::new(dec!(1), ExpenseCategory::Other).described("");
    assert!(draft.description.is_none());
}

// ── FilterCriteria ────────────────────────────────────────────

#[test]
fn test_empty_filter_matches_everything() {
    let filter = FilterCriteria::default();
    assert!(filter.is_empty());
    assert!(filter.matches(&make_expense(dec!(1), ExpenseCategory::Other, "1999-12-31")));
}

#[test]
fn test_empty_search_term_is_absent() {
    let filter = FilterCriteria {
        search_term: Some(String::new()),
        ..Default::default()
    };
    assert!(filter.is_empty());
    assert!(filter.matches(&make_expense(dec!(1), ExpenseCategory::Food, "2024-01-01")));
}

#[test]
fn test_category_filter() {
    let filter = FilterCriteria {
        category: Some(ExpenseCategory::Food),
        ..Default::default()
    };
    assert!(filter.matches(&make_expense(dec!(5), ExpenseCategory::Food, "2024-01-01")));
    assert!(!filter.matches(&make_expense(dec!(5), ExpenseCategory::Health, "2024-01-01")));
}

#[test]
fn test_date_range_is_inclusive() {
    let filter = FilterCriteria {
        start_date: Some(date("2024-01-10")),
        end_date: Some(date("2024-01-15")),
        ..Default::default()
    };
    let on = |d| make_expense(dec!(5), ExpenseCategory::Food, d);
    assert!(!filter.matches(&on("2024-01-09")));
    assert!(filter.matches(&on("2024-01-10")));
    assert!(filter.matches(&on("2024-01-15")));
    assert!(!filter.matches(&on("2024-01-16")));
}

#[test]
fn test_search_matches_description_case_insensitive() {
    let filter = FilterCriteria {
        search_term: Some("SAM".into()),
        ..Default::default()
    };
    assert!(filter.matches(&make_expense(dec!(5), ExpenseCategory::Food, "2024-01-01")));
}

#[test]
fn test_search_matches_category_label() {
    let filter = FilterCriteria {
        search_term: Some("transp".into()),
        ..Default::default()
    };
    let mut e = make_expense(dec!(5), ExpenseCategory::Transport, "2024-01-01");
    e.description = None;
    assert!(filter.matches(&e));
}

#[test]
fn test_search_matches_amount_text() {
    let filter = FilterCriteria {
        search_term: Some("12.5".into()),
        ..Default::default()
    };
    let mut e = make_expense(dec!(112.50), ExpenseCategory::Other, "2024-01-01");
    e.description = None;
    assert!(filter.matches(&e));

    let filter = FilterCriteria {
        search_term: Some("12.50".into()),
        ..Default::default()
    };
    assert!(!filter.matches(&e));
}

#[test]
fn test_criteria_are_conjunctive() {
    let filter = FilterCriteria {
        category: Some(ExpenseCategory::Food),
        search_term: Some("nothing-like-this".into()),
        ..Default::default()
    };
    assert!(!filter.matches(&make_expense(dec!(5), ExpenseCategory::Food, "2024-01-01")));
}

#[test]
fn test_describe() {
    let filter = FilterCriteria {
        category: Some(ExpenseCategory::Food),
        start_date: Some(date("2024-01-01")),
        end_date: None,
        search_term: Some("pizza".into()),
    };
    assert_eq!(filter.describe(), "category=Food from=2024-01-01 search='pizza'");
    assert_eq!(FilterCriteria::default().describe(), "");
}
