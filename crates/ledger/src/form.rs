//! Caller-facing input validation.
//!
//! The ledger accepts any fields it is given. These drafts mirror the entry forms:
//! raw text in, checked [`NewExpense`] / [`NewExchange`] out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tripledger_core::{DomainError, DomainResult};

use crate::model::{Currency, ExpenseCategory, NewExchange, NewExpense};

/// Unvalidated expense form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub category: ExpenseCategory,
    pub amount: String,
    pub currency: Currency,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub store_name: String,
}

impl ExpenseDraft {
    pub fn new(category: ExpenseCategory, amount: impl Into<String>, currency: Currency) -> Self {
        Self {
            category,
            amount: amount.into(),
            currency,
            description: String::new(),
            store_name: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }

    /// Validate and build the expense fields, dated `date`.
    pub fn validate(&self, date: NaiveDate) -> DomainResult<NewExpense> {
        let amount = parse_positive("amount", &self.amount)?;

        let store_name = match self.category {
            ExpenseCategory::Store => non_blank(&self.store_name),
            _ => None,
        };

        let description = match non_blank(&self.description) {
            Some(d) => d,
            None => self.category.default_description(store_name.as_deref()),
        };

        Ok(NewExpense {
            category: self.category,
            amount,
            currency: self.currency,
            description,
            store_name,
            date,
        })
    }
}

/// Unvalidated exchange form input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeDraft {
    pub usd_amount: String,
    pub clp_amount: String,
}

impl ExchangeDraft {
    pub fn new(usd_amount: impl Into<String>, clp_amount: impl Into<String>) -> Self {
        Self {
            usd_amount: usd_amount.into(),
            clp_amount: clp_amount.into(),
        }
    }

    /// Rate implied by the current input, if both sides are usable.
    pub fn preview_rate(&self) -> Option<f64> {
        let usd = parse_positive("usd amount", &self.usd_amount).ok()?;
        let clp = parse_positive("clp amount", &self.clp_amount).ok()?;
        Some(clp / usd)
    }

    pub fn validate(&self, date: NaiveDate) -> DomainResult<NewExchange> {
        let usd = parse_positive("usd amount", &self.usd_amount)?;
        let clp = parse_positive("clp amount", &self.clp_amount)?;
        Ok(NewExchange::from_amounts(usd, clp, date))
    }
}

fn parse_positive(field: &str, raw: &str) -> DomainResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| DomainError::validation(format!("{field} is not a number: {trimmed}")))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::validation(format!("{field} must be positive")));
    }
    Ok(value)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
