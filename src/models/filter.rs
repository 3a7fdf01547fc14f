use chrono::NaiveDate;

use super::{Expense, ExpenseCategory};

/// Conjunctive filter over expenses. A `None` field places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: Option<ExpenseCategory>,
    /// Inclusive lower bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound
    pub end_date: Option<NaiveDate>,
    pub search_term: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.search_term().is_none()
    }

    /// The search term, with an empty string treated as absent.
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|s| !s.is_empty())
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        let match_category = self.category.map_or(true, |c| expense.category == c);
        let match_start = self.start_date.map_or(true, |d| expense.date >= d);
        let match_end = self.end_date.map_or(true, |d| expense.date <= d);
        let match_search = self.search_term().map_or(true, |term| {
            let lower = term.to_lowercase();
            expense.description_or_empty().to_lowercase().contains(&lower)
                || expense.category.as_str().to_lowercase().contains(&lower)
                || expense.amount_text().contains(term)
        });

        match_category && match_start && match_end && match_search
    }

    /// Short human-readable summary, e.g. `category=Food from=2024-01-01`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(c) = self.category {
            parts.push(format!("category={c}"));
        }
        if let Some(d) = self.start_date {
            parts.push(format!("from={d}"));
        }
        if let Some(d) = self.end_date {
            parts.push(format!("to={d}"));
        }
        if let Some(s) = self.search_term() {
            parts.push(format!("search='{s}'"));
        }
        parts.join(" ")
    }
}
