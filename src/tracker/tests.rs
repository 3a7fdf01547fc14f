#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;

use super::export::export_filename;
use super::*;
use crate::models::{ExpenseCategory, FilterCriteria, NewExpense};
use crate::store::Store;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tracker() -> ExpenseTracker {
    ExpenseTracker::load(Store::open_in_memory())
}

fn draft(amount: Decimal, category: ExpenseCategory, day: &str) -> NewExpense {
    NewExpense::new(amount, category).on(date(day))
}

/// Food/50 on 2024-01-10, then Transport/30 on 2024-01-15.
fn two_expense_tracker() -> ExpenseTracker {
    let mut t = tracker();
    t.add(draft(dec!(50), ExpenseCategory::Food, "2024-01-10"));
    t.add(draft(dec!(30), ExpenseCategory::Transport, "2024-01-15"));
    t
}

fn is_sorted_desc(t: &ExpenseTracker) -> bool {
    t.expenses().windows(2).all(|w| w[0].date >= w[1].date)
}

// ── Load ──────────────────────────────────────────────────────

#[test]
fn test_fresh_tracker_is_empty() {
    let t = tracker();
    assert!(t.expenses().is_empty());
    assert_eq!(t.total_money(), Decimal::ZERO);
    assert_eq!(t.total_expenses(), Decimal::ZERO);
    assert!(t.filter().is_empty());
    assert!(t.editing_id().is_none());
    assert!(t.spending_by_category().is_empty());
}

#[test]
fn test_reload_restores_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendtui.db");
    {
        let mut t = ExpenseTracker::load(Store::open(&path));
        t.set_total_money(dec!(1000));
        t.add(draft(dec!(50), ExpenseCategory::Food, "2024-01-10").described("Groceries"));
        t.add(draft(dec!(30), ExpenseCategory::Transport, "2024-01-15"));
    }
    let t = ExpenseTracker::load(Store::open(&path));
    assert!(t.is_persistent());
    assert_eq!(t.total_money(), dec!(1000));
    assert_eq!(t.expenses().len(), 2);
    assert_eq!(t.expenses()[0].category, ExpenseCategory::Transport);
    assert_eq!(t.expenses()[1].description.as_deref(), Some("Groceries"));
}

#[test]
fn test_load_ignores_corrupt_expenses() {
    let store = Store::open_in_memory();
    store.put_raw(EXPENSES_KEY, r#"[{"id":"a","amount":5,"category":"Pets","date":"2024-01-01"}]"#);
    store.put_raw(TOTAL_MONEY_KEY, "500");
    let t = ExpenseTracker::load(store);
    assert!(t.expenses().is_empty());
    assert_eq!(t.total_money(), dec!(500));
}

#[test]
fn test_detached_tracker_still_works_in_memory() {
    let mut t = ExpenseTracker::load(Store::detached());
    assert!(!t.is_persistent());
    t.add(draft(dec!(5), ExpenseCategory::Other, "2024-01-01"));
    assert_eq!(t.expenses().len(), 1);
}

// ── Add ───────────────────────────────────────────────────────

#[test]
fn test_add_grows_list_with_unique_ids() {
    let mut t = tracker();
    let mut seen = HashSet::new();
    for i in 0..25 {
        let before = t.expenses().len();
        let added = t.add(draft(dec!(1) + Decimal::from(i), ExpenseCategory::Other, "2024-02-01"));
        assert_eq!(t.expenses().len(), before + 1);
        assert!(seen.insert(added.id.clone()), "duplicate id {}", added.id);
    }
}

#[test]
fn test_add_defaults_date_to_today() {
    let mut t = tracker();
    let added = t.add(NewExpense::new(dec!(3), ExpenseCategory::Food));
    assert_eq!(added.date, today());
}

#[test]
fn test_add_sorts_newest_first() {
    let t = two_expense_tracker();
    assert!(is_sorted_desc(&t));
    assert_eq!(t.expenses()[0].date, date("2024-01-15"));
    assert_eq!(t.expenses()[1].date, date("2024-01-10"));
}

#[test]
fn test_same_day_keeps_insertion_order() {
    let mut t = tracker();
    let a = t.add(draft(dec!(1), ExpenseCategory::Food, "2024-03-01"));
    t.add(draft(dec!(9), ExpenseCategory::Food, "2024-03-05"));
    let b = t.add(draft(dec!(2), ExpenseCategory::Food, "2024-03-01"));
    let c = t.add(draft(dec!(3), ExpenseCategory::Food, "2024-03-01"));

    let ids: Vec<&str> = t.expenses()[1..].iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, [a.id.as_str(), b.id.as_str(), c.id.as_str()]);
}

#[test]
fn test_add_persists_immediately() {
    let mut t = tracker();
    t.add(draft(dec!(12.50), ExpenseCategory::Food, "2024-01-10"));
    let raw = t.store.raw(EXPENSES_KEY).unwrap();
    let stored: Vec<Expense> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, t.expenses());
}

// ── Update ────────────────────────────────────────────────────

#[test]
fn test_update_replaces_in_place_and_resorts() {
    let mut t = two_expense_tracker();
    let mut food = t.expenses()[1].clone();
    food.date = date("2024-02-01");
    food.amount = dec!(55);
    t.start_editing(&food.id);

    assert!(t.update(food.clone()));
    assert_eq!(t.expenses().len(), 2);
    assert_eq!(t.expenses()[0], food);
    assert!(is_sorted_desc(&t));
    assert!(t.editing_id().is_none());
}

#[test]
fn test_update_unknown_id_is_noop_but_ends_editing() {
    let mut t = two_expense_tracker();
    let before = t.expenses().to_vec();
    let mut ghost = before[0].clone();
    ghost.id = "ghost".into();
    t.start_editing(&before[0].id);

    assert!(!t.update(ghost));
    assert_eq!(t.expenses(), before.as_slice());
    assert!(t.editing_id().is_none());
}

#[test]
fn test_update_unknown_id_does_not_write_store() {
    let mut t = tracker();
    t.set_total_money(dec!(100));
    assert!(t.store.raw(EXPENSES_KEY).is_none());

    let ghost = Expense {
        id: "ghost".into(),
        amount: dec!(5),
        category: ExpenseCategory::Other,
        description: None,
        date: date("2024-01-01"),
    };
    assert!(!t.update(ghost));
    assert!(t.store.raw(EXPENSES_KEY).is_none());
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete_removes_record() {
    let mut t = two_expense_tracker();
    let id = t.expenses()[0].id.clone();
    assert!(t.delete(&id));
    assert_eq!(t.expenses().len(), 1);
    assert!(t.expenses().iter().all(|e| e.id != id));
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let mut t = two_expense_tracker();
    let before = t.expenses().to_vec();
    assert!(!t.delete("does-not-exist"));
    assert_eq!(t.expenses(), before.as_slice());
}

#[test]
fn test_delete_clears_editing_pointer() {
    let mut t = two_expense_tracker();
    let id = t.expenses()[1].id.clone();
    t.start_editing(&id);
    assert!(t.editing_expense().is_some());

    t.delete(&id);
    assert!(t.editing_id().is_none());
    assert!(t.editing_expense().is_none());
}

#[test]
fn test_delete_other_id_keeps_editing_pointer() {
    let mut t = two_expense_tracker();
    let editing = t.expenses()[0].id.clone();
    let other = t.expenses()[1].id.clone();
    t.start_editing(&editing);
    t.delete(&other);
    assert_eq!(t.editing_id(), Some(editing.as_str()));
}

// ── Editing pointer ───────────────────────────────────────────

#[test]
fn test_dangling_editing_pointer_resolves_to_none() {
    let mut t = two_expense_tracker();
    t.start_editing("nobody");
    assert_eq!(t.editing_id(), Some("nobody"));
    assert!(t.editing_expense().is_none());
}

#[test]
fn test_cancel_editing() {
    let mut t = two_expense_tracker();
    let id = t.expenses()[0].id.clone();
    t.start_editing(&id);
    assert_eq!(t.editing_expense().map(|e| e.id.as_str()), Some(id.as_str()));
    t.cancel_editing();
    assert!(t.editing_expense().is_none());
}

// ── Total money ───────────────────────────────────────────────

#[test]
fn test_set_total_money() {
    let mut t = tracker();
    t.set_total_money(dec!(1000));
    assert_eq!(t.total_money(), dec!(1000));
    assert_eq!(t.store.load(TOTAL_MONEY_KEY, Decimal::ONE), dec!(1000));
}

#[test]
fn test_negative_total_money_becomes_zero() {
    let mut t = tracker();
    t.set_total_money(dec!(500));
    t.set_total_money(dec!(-20));
    assert_eq!(t.total_money(), Decimal::ZERO);
    assert_eq!(t.store.load(TOTAL_MONEY_KEY, Decimal::ONE), Decimal::ZERO);
}

#[test]
fn test_total_money_is_capped() {
    let mut t = tracker();
    t.set_total_money(Decimal::MAX);
    assert_eq!(t.total_money(), max_amount());
    t.set_total_money_input("99999999999999999999");
    assert_eq!(t.total_money(), max_amount());
}

#[test]
fn test_loaded_total_money_is_capped() {
    let store = Store::open_in_memory();
    store.put_raw(TOTAL_MONEY_KEY, "1e20");
    let t = ExpenseTracker::load(store);
    assert_eq!(t.total_money(), max_amount());
}

#[test]
fn test_non_numeric_total_money_becomes_zero() {
    let mut t = tracker();
    t.set_total_money_input("1500.25");
    assert_eq!(t.total_money(), dec!(1500.25));
    t.set_total_money_input("lots");
    assert_eq!(t.total_money(), Decimal::ZERO);
    t.set_total_money_input("-3");
    assert_eq!(t.total_money(), Decimal::ZERO);
}

// ── Derived values ────────────────────────────────────────────

#[test]
fn test_scenario_unfiltered_list_and_total() {
    let t = two_expense_tracker();
    let filtered = t.filtered_expenses();
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0].category, ExpenseCategory::Transport);
    assert_eq!(filtered[0].amount, dec!(30));
    assert_eq!(filtered[0].date, date("2024-01-15"));
    assert_eq!(filtered[1].category, ExpenseCategory::Food);
    assert_eq!(filtered[1].amount, dec!(50));
    assert_eq!(t.total_expenses(), dec!(80));
}

#[test]
fn test_scenario_remaining_balance() {
    let mut t = two_expense_tracker();
    t.set_total_money(dec!(1000));
    assert_eq!(t.remaining_balance(), dec!(920));
}

#[test]
fn test_remaining_balance_can_go_negative() {
    let mut t = two_expense_tracker();
    t.set_total_money(dec!(20));
    assert_eq!(t.remaining_balance(), dec!(-60));
    assert_eq!(t.remaining_balance(), t.total_money() - t.total_expenses());
}

#[test]
fn test_scenario_category_filter() {
    let mut t = two_expense_tracker();
    t.set_filter(FilterCriteria {
        category: Some(ExpenseCategory::Food),
        ..Default::default()
    });
    let filtered = t.filtered_expenses();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].amount, dec!(50));
    assert_eq!(
        t.spending_by_category(),
        vec![(ExpenseCategory::Food, dec!(50))]
    );
}

#[test]
fn test_total_expenses_ignores_filter() {
    let mut t = two_expense_tracker();
    t.set_filter(FilterCriteria {
        category: Some(ExpenseCategory::Transport),
        ..Default::default()
    });
    assert_eq!(t.filtered_expenses().len(), 1);
    assert_eq!(t.total_expenses(), dec!(80));
}

#[test]
fn test_empty_filter_is_identity() {
    let t = two_expense_tracker();
    let all: Vec<&Expense> = t.expenses().iter().collect();
    assert_eq!(t.filtered_expenses(), all);
}

#[test]
fn test_set_filter_replaces_wholesale() {
    let mut t = two_expense_tracker();
    t.set_filter(FilterCriteria {
        category: Some(ExpenseCategory::Food),
        search_term: Some("x".into()),
        ..Default::default()
    });
    t.set_filter(FilterCriteria {
        start_date: Some(date("2024-01-12")),
        ..Default::default()
    });
    assert!(t.filter().category.is_none());
    assert!(t.filter().search_term.is_none());
    assert_eq!(t.filtered_expenses().len(), 1);

    t.clear_filter();
    assert_eq!(t.filtered_expenses().len(), 2);
}

#[test]
fn test_spending_by_category_properties() {
    let mut t = tracker();
    t.add(draft(dec!(10), ExpenseCategory::Food, "2024-01-01"));
    t.add(draft(dec!(70), ExpenseCategory::Housing, "2024-01-02"));
    t.add(draft(dec!(15), ExpenseCategory::Food, "2024-01-03"));
    t.add(draft(dec!(5.5), ExpenseCategory::Health, "2024-01-04"));
    t.add(draft(dec!(40), ExpenseCategory::Shopping, "2023-12-01"));
    t.set_filter(FilterCriteria {
        start_date: Some(date("2024-01-01")),
        ..Default::default()
    });

    let breakdown = t.spending_by_category();
    assert_eq!(
        breakdown,
        vec![
            (ExpenseCategory::Housing, dec!(70)),
            (ExpenseCategory::Food, dec!(25)),
            (ExpenseCategory::Health, dec!(5.5)),
        ]
    );

    let breakdown_sum: Decimal = breakdown.iter().map(|(_, a)| *a).sum();
    let filtered_sum: Decimal = t.filtered_expenses().iter().map(|e| e.amount).sum();
    assert_eq!(breakdown_sum, filtered_sum);
    assert!(breakdown.windows(2).all(|w| w[0].1 >= w[1].1));
    assert!(breakdown.iter().all(|(_, a)| !a.is_zero()));
    assert!(!breakdown.iter().any(|(c, _)| *c == ExpenseCategory::Shopping));
}

#[test]
fn test_huge_amounts_saturate_instead_of_overflowing() {
    let mut t = tracker();
    for (id, category) in [
        ("a", ExpenseCategory::Food),
        ("b", ExpenseCategory::Food),
        ("c", ExpenseCategory::Housing),
    ] {
        t.expenses.push(Expense {
            id: id.into(),
            amount: Decimal::MAX,
            category,
            description: None,
            date: date("2024-01-01"),
        });
    }

    assert_eq!(t.total_expenses(), Decimal::MAX);
    assert_eq!(t.remaining_balance(), -Decimal::MAX);
    let breakdown = t.spending_by_category();
    assert_eq!(breakdown.len(), 2);
    assert!(breakdown.iter().all(|(_, a)| *a == Decimal::MAX));
}

#[test]
fn test_largest_accepted_amounts_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendtui.db");
    let amounts = [
        dec!(12.5),
        crate::input::parse_amount("999,999,999,999.99").unwrap(),
        crate::input::parse_amount("1000000000000").unwrap(),
        crate::input::parse_amount("0.000000000000001").unwrap(),
        crate::input::parse_amount("12345678.9012345").unwrap(),
    ];
    {
        let mut t = ExpenseTracker::load(Store::open(&path));
        for amount in amounts {
            t.add(draft(amount, ExpenseCategory::Other, "2024-01-10"));
        }
    }

    let t = ExpenseTracker::load(Store::open(&path));
    assert_eq!(t.expenses().len(), amounts.len());
    let reloaded: Vec<Decimal> = t.expenses().iter().map(|e| e.amount).collect();
    assert_eq!(reloaded, amounts);
}

#[test]
fn test_find_by_prefix() {
    let t = two_expense_tracker();
    let id = t.expenses()[0].id.clone();
    assert_eq!(t.find(&id).map(|e| e.id.as_str()), Some(id.as_str()));
    assert_eq!(t.find(&id[..8]).map(|e| e.id.as_str()), Some(id.as_str()));
    assert!(t.find("").is_none());
    assert!(t.find("zzzzzzzz").is_none());
}

#[test]
fn test_reset_clears_everything() {
    let mut t = two_expense_tracker();
    t.set_total_money(dec!(1000));
    t.reset();
    assert!(t.expenses().is_empty());
    assert_eq!(t.total_money(), Decimal::ZERO);
    assert!(t.store.raw(EXPENSES_KEY).is_none());
    assert!(t.store.raw(TOTAL_MONEY_KEY).is_none());
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_scenario_export_csv() {
    let mut t = two_expense_tracker();
    let food_id = t.expenses()[1].id.clone();
    let mut food = t.expenses()[1].clone();
    food.description = Some("Pizza \"large\", extra cheese".into());
    assert!(t.update(food));
    assert_eq!(t.expenses()[1].id, food_id);

    let csv = t.export_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,Category,Amount,Description");
    assert_eq!(lines[1], "2024-01-15,Transport,30,\"\"");
    assert_eq!(
        lines[2],
        "2024-01-10,Food,50,\"Pizza \"\"large\"\", extra cheese\""
    );
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_export_csv_follows_filter() {
    let mut t = two_expense_tracker();
    t.set_filter(FilterCriteria {
        search_term: Some("transport".into()),
        ..Default::default()
    });
    let csv = t.export_csv().unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Transport,30"));
    assert!(!csv.contains("Food"));
}

#[test]
fn test_export_csv_decimal_amounts() {
    let mut t = tracker();
    t.add(draft(dec!(12.50), ExpenseCategory::Food, "2024-01-10").described("Tea"));
    let csv = t.export_csv().unwrap();
    assert!(csv.contains("2024-01-10,Food,12.5,\"Tea\""));
}

#[test]
fn test_export_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let t = two_expense_tracker();
    let path = t
        .export_expenses(Some(dir.path()), date("2024-03-07"))
        .unwrap()
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "expenses_20240307.csv");
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, t.export_csv().unwrap());
}

#[test]
fn test_export_without_directory_is_skipped() {
    let t = two_expense_tracker();
    assert!(t.export_expenses(None, date("2024-03-07")).unwrap().is_none());
}

#[test]
fn test_export_filename() {
    assert_eq!(export_filename(date("2025-11-02")), "expenses_20251102.csv");
}
