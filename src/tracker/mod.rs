//! The expense tracking state container.
//!
//! [`ExpenseTracker`] owns the expense list, the total-money scalar, the
//! active filter and the editing pointer. Mutations go through its methods
//! and are written back to the [`Store`] immediately; everything derived
//! (filtered list, totals, category breakdown) is recomputed on read.

mod export;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::models::{max_amount, Expense, ExpenseCategory, FilterCriteria, NewExpense};
use crate::store::Store;

pub(crate) const TOTAL_MONEY_KEY: &str = "totalMoney";
pub(crate) const EXPENSES_KEY: &str = "expenses";

pub(crate) struct ExpenseTracker {
    store: Store,
    expenses: Vec<Expense>,
    total_money: Decimal,
    filter: FilterCriteria,
    editing_id: Option<String>,
}

impl ExpenseTracker {
    /// Read persisted state once. Missing or unreadable entries start empty.
    pub(crate) fn load(store: Store) -> Self {
        let total_money: Decimal = store.load(TOTAL_MONEY_KEY, Decimal::ZERO);
        let expenses: Vec<Expense> = store.load(EXPENSES_KEY, Vec::new());
        tracing::info!(
            expenses = expenses.len(),
            total_money = %total_money,
            "loaded tracker state"
        );
        Self {
            store,
            expenses,
            total_money: total_money.clamp(Decimal::ZERO, max_amount()),
            filter: FilterCriteria::default(),
            editing_id: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    /// All expenses, newest first, ignoring the active filter.
    pub(crate) fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub(crate) fn total_money(&self) -> Decimal {
        self.total_money
    }

    pub(crate) fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub(crate) fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub(crate) fn is_persistent(&self) -> bool {
        self.store.is_attached()
    }

    // ── Mutations ─────────────────────────────────────────────

    /// Add a new expense and return it with its assigned id.
    pub(crate) fn add(&mut self, draft: NewExpense) -> Expense {
        let expense = Expense {
            id: uuid::Uuid::new_v4().to_string(),
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date.unwrap_or_else(today),
        };
        tracing::debug!(id = %expense.id, date = %expense.date, "adding expense");
        self.expenses.push(expense.clone());
        self.sort_by_date();
        self.persist_expenses();
        expense
    }

    /// Replace the expense with the same id. Ends any edit session.
    /// Returns `false` if no expense had that id.
    pub(crate) fn update(&mut self, updated: Expense) -> bool {
        let replaced = match self.expenses.iter_mut().find(|e| e.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        };
        self.editing_id = None;
        if replaced {
            self.sort_by_date();
            self.persist_expenses();
        } else {
            tracing::warn!("update for unknown expense ignored");
        }
        replaced
    }

    /// Remove the expense with `id`. Unknown ids are a no-op.
    pub(crate) fn delete(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        let removed = self.expenses.len() != before;
        if self.editing_id.as_deref() == Some(id) {
            self.editing_id = None;
        }
        if removed {
            tracing::debug!(id, "deleted expense");
        }
        self.persist_expenses();
        removed
    }

    /// Clamped to `0..=max_amount()`.
    pub(crate) fn set_total_money(&mut self, value: Decimal) {
        self.total_money = value.clamp(Decimal::ZERO, max_amount());
        self.store.save(TOTAL_MONEY_KEY, &self.total_money);
    }

    /// Text that does not parse as a number sets the total to zero.
    pub(crate) fn set_total_money_input(&mut self, input: &str) {
        let value = Decimal::from_str(input.trim()).unwrap_or(Decimal::ZERO);
        self.set_total_money(value);
    }

    pub(crate) fn start_editing(&mut self, id: &str) {
        self.editing_id = Some(id.to_string());
    }

    pub(crate) fn cancel_editing(&mut self) {
        self.editing_id = None;
    }

    /// Replaces the active filter wholesale.
    pub(crate) fn set_filter(&mut self, filter: FilterCriteria) {
        self.filter = filter;
    }

    pub(crate) fn clear_filter(&mut self) {
        self.filter = FilterCriteria::default();
    }

    /// Drop all persisted state and start over.
    pub(crate) fn reset(&mut self) {
        self.store.remove(EXPENSES_KEY);
        self.store.remove(TOTAL_MONEY_KEY);
        self.expenses.clear();
        self.total_money = Decimal::ZERO;
        self.editing_id = None;
        self.filter = FilterCriteria::default();
    }

    fn sort_by_date(&mut self) {
        // Stable: same-day expenses stay in insertion order
        self.expenses.sort_by(|a, b| b.date.cmp(&a.date));
    }

    fn persist_expenses(&self) {
        self.store.save(EXPENSES_KEY, &self.expenses);
    }

    // ── Derived values ────────────────────────────────────────

    pub(crate) fn filtered_expenses(&self) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| self.filter.matches(e))
            .collect()
    }

    /// Sum over every expense; the active filter does not apply.
    pub(crate) fn total_expenses(&self) -> Decimal {
        self.expenses
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
    }

    /// May be negative.
    pub(crate) fn remaining_balance(&self) -> Decimal {
        self.total_money.saturating_sub(self.total_expenses())
    }

    /// Filtered spending per category, largest first.
    pub(crate) fn spending_by_category(&self) -> Vec<(ExpenseCategory, Decimal)> {
        let mut totals: Vec<(ExpenseCategory, Decimal)> = Vec::new();
        for expense in self.filtered_expenses() {
            match totals.iter_mut().find(|(c, _)| *c == expense.category) {
                Some((_, sum)) => *sum = sum.saturating_add(expense.amount),
                None => totals.push((expense.category, expense.amount)),
            }
        }
        totals.retain(|(_, amount)| !amount.is_zero());
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
    }

    /// `None` when nothing is being edited or the id no longer exists.
    pub(crate) fn editing_expense(&self) -> Option<&Expense> {
        let id = self.editing_id.as_deref()?;
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Find by full id or by an unambiguous id prefix.
    pub(crate) fn find(&self, id_or_prefix: &str) -> Option<&Expense> {
        if id_or_prefix.is_empty() {
            return None;
        }
        if let Some(e) = self.expenses.iter().find(|e| e.id == id_or_prefix) {
            return Some(e);
        }
        let mut matches = self
            .expenses
            .iter()
            .filter(|e| e.id.starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(e), None) => Some(e),
            _ => None,
        }
    }

    // ── Export ────────────────────────────────────────────────

    /// The filtered expenses as CSV text.
    pub(crate) fn export_csv(&self) -> Result<String> {
        export::to_csv(&self.filtered_expenses())
    }

    /// Write the filtered expenses to `dir/expenses_YYYYMMDD.csv`.
    /// Without a target directory nothing is written and `None` is returned.
    pub(crate) fn export_expenses(
        &self,
        dir: Option<&Path>,
        today: NaiveDate,
    ) -> Result<Option<PathBuf>> {
        let Some(dir) = dir else {
            tracing::warn!("no export directory available, export skipped");
            return Ok(None);
        };
        let csv = self.export_csv()?;
        let path = export::write_file(dir, &csv, today)?;
        tracing::info!(path = %path.display(), "exported expenses");
        Ok(Some(path))
    }
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests;
