use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Category, MonthKey};

/// A stored expense record. Owned by the store; queries hand out copies.
#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    /// Fixed at insertion from `date`; never recomputed (there is no update
    /// operation anywhere in the surface).
    pub month_key: MonthKey,
    pub created_at: String,
}

/// Raw form input, exactly as the entry surface captured it.
#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    pub amount: String,
    pub description: String,
    pub category: String,
    pub date: String,
}

/// Validated insert payload. Only the store can turn this into an `Expense`
/// (it assigns `id`, `month_key` and `created_at`).
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Amount is not a number: '{0}'")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Description cannot be empty")]
    EmptyDescription,
    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),
    #[error("Date must be YYYY-MM-DD: '{0}'")]
    InvalidDate(String),
}

impl ExpenseForm {
    /// Checks every field and returns the typed payload, or the first
    /// violation found. Nothing is written anywhere on failure.
    pub fn validate(&self) -> Result<NewExpense, ValidationError> {
        let amount_text = self.amount.trim();
        let amount = Decimal::from_str(amount_text)
            .map_err(|_| ValidationError::InvalidAmount(amount_text.to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let category = Category::parse(&self.category)
            .ok_or_else(|| ValidationError::UnknownCategory(self.category.trim().to_string()))?;

        let date_text = self.date.trim();
        let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date_text.to_string()))?;

        Ok(NewExpense {
            amount,
            description: description.to_string(),
            category,
            date,
        })
    }
}
