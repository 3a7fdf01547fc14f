use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ExpenseCategory;

/// Amounts are persisted as JSON numbers, so they must survive an `f64`
/// round trip: at most this many significant digits.
pub const MAX_AMOUNT_DIGITS: u32 = 15;

/// Upper bound for any user-entered amount.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Serialized as "YYYY-MM-DD"
    pub date: NaiveDate,
}

impl Expense {
    /// Amount as plain decimal text without trailing zeros, e.g. `12.5`.
    pub fn amount_text(&self) -> String {
        self.amount.normalize().to_string()
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Replace every field but the id with the draft's values.
    pub fn with_draft(&self, draft: NewExpense, today: NaiveDate) -> Expense {
        Expense {
            id: self.id.clone(),
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date.unwrap_or(today),
        }
    }
}

/// An expense that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    /// `None` means "today" at the time the expense is added.
    pub date: Option<NaiveDate>,
}

impl NewExpense {
    pub fn new(amount: Decimal, category: ExpenseCategory) -> Self {
        Self {
            amount,
            category,
            description: None,
            date: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }
}
