mod category;
mod expense;
mod filter;

pub use category::ExpenseCategory;
pub use expense::{max_amount, Expense, NewExpense, MAX_AMOUNT_DIGITS};
pub use filter::FilterCriteria;

#[cfg(test)]
mod tests;
