use chrono::{DateTime, Utc};

use tripledger_core::{DomainError, DomainResult, Entity, ExchangeId, ExpenseId};

use crate::model::{
    Currency, CurrencyExchange, Expense, ExpenseCategory, NewExchange, NewExpense, now_millis,
};

/// Read side of the ledger: raw records plus derived aggregates.
///
/// Every aggregate is recomputed from the record lists on each call. Implementors
/// only provide the two slices.
pub trait LedgerQueries {
    /// Expenses in insertion order.
    fn expenses(&self) -> &[Expense];

    /// Exchanges in insertion order.
    fn exchanges(&self) -> &[CurrencyExchange];

    fn total_spent_clp(&self) -> f64 {
        sum_by_currency(self.expenses(), Currency::Clp)
    }

    fn total_spent_usd(&self) -> f64 {
        sum_by_currency(self.expenses(), Currency::Usd)
    }

    fn total_exchanged_usd(&self) -> f64 {
        self.exchanges().iter().fold(0.0, |acc, e| acc + e.usd_amount)
    }

    fn total_exchanged_clp(&self) -> f64 {
        self.exchanges().iter().fold(0.0, |acc, e| acc + e.clp_amount)
    }

    /// Volume-weighted CLP per USD across all exchanges; `0` when there are none.
    fn average_rate(&self) -> f64 {
        if self.exchanges().is_empty() {
            return 0.0;
        }
        let usd = self.total_exchanged_usd();
        if usd > 0.0 {
            self.total_exchanged_clp() / usd
        } else {
            0.0
        }
    }

    fn expenses_by_type(&self, category: ExpenseCategory) -> Vec<&Expense> {
        self.expenses()
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Converts a CLP amount at the average rate; `0` when no rate is known.
    fn clp_to_usd(&self, clp_amount: f64) -> f64 {
        let rate = self.average_rate();
        if rate > 0.0 { clp_amount / rate } else { 0.0 }
    }

    fn usd_equivalent(&self, expense: &Expense) -> f64 {
        match expense.currency {
            Currency::Usd => expense.amount,
            Currency::Clp => self.clp_to_usd(expense.amount),
        }
    }

    /// USD spending plus CLP spending converted at the average rate.
    fn total_spent_in_usd(&self) -> f64 {
        self.total_spent_usd() + self.clp_to_usd(self.total_spent_clp())
    }

    fn category_total_usd(&self, category: ExpenseCategory) -> f64 {
        let rate = self.average_rate();
        self.expenses()
            .iter()
            .filter(|e| e.category == category)
            .fold(0.0, |acc, e| match e.currency {
                Currency::Usd => acc + e.amount,
                Currency::Clp if rate > 0.0 => acc + e.amount / rate,
                Currency::Clp => acc,
            })
    }

    /// CLP acquired minus CLP spent. Negative when spending outran exchanges.
    fn clp_remaining(&self) -> f64 {
        self.total_exchanged_clp() - self.total_spent_clp()
    }

    fn average_expense_usd(&self) -> f64 {
        let count = self.expenses().len();
        if count == 0 {
            return 0.0;
        }
        self.total_spent_in_usd() / count as f64
    }

    fn expenses_newest_first(&self) -> Vec<&Expense> {
        let mut sorted: Vec<&Expense> = self.expenses().iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    fn exchanges_newest_first(&self) -> Vec<&CurrencyExchange> {
        let mut sorted: Vec<&CurrencyExchange> = self.exchanges().iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }
}

/// Write side of the ledger: append with a fresh id and timestamp, or remove by id.
///
/// There is no edit operation. Removing an unknown id is a no-op returning `None`.
pub trait LedgerCommands {
    fn add_expense(&mut self, fields: NewExpense) -> ExpenseId;

    fn remove_expense(&mut self, id: ExpenseId) -> Option<Expense>;

    fn add_exchange(&mut self, fields: NewExchange) -> ExchangeId;

    fn remove_exchange(&mut self, id: ExchangeId) -> Option<CurrencyExchange>;
}

fn sum_by_currency(expenses: &[Expense], currency: Currency) -> f64 {
    expenses
        .iter()
        .filter(|e| e.currency == currency)
        .fold(0.0, |acc, e| acc + e.amount)
}

/// In-memory ledger: two insertion-ordered record lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    expenses: Vec<Expense>,
    exchanges: Vec<CurrencyExchange>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from previously recorded lists.
    ///
    /// Records whose id already appeared earlier in the same list are dropped, so
    /// the uniqueness invariant holds even for hand-edited input.
    pub fn from_records(expenses: Vec<Expense>, exchanges: Vec<CurrencyExchange>) -> Self {
        let mut ledger = Self::new();
        for expense in expenses {
            if let Err(err) = ledger.insert_expense(expense) {
                tracing::warn!(error = %err, "dropping duplicate expense record");
            }
        }
        for exchange in exchanges {
            if let Err(err) = ledger.insert_exchange(exchange) {
                tracing::warn!(error = %err, "dropping duplicate exchange record");
            }
        }
        ledger
    }

    /// Append a fully-formed expense, rejecting an id that is already present.
    pub fn insert_expense(&mut self, expense: Expense) -> DomainResult<()> {
        if self.expense(expense.id()).is_some() {
            return Err(DomainError::invariant(format!(
                "duplicate expense id {}",
                expense.id
            )));
        }
        self.expenses.push(expense);
        Ok(())
    }

    /// Append a fully-formed exchange, rejecting an id that is already present.
    pub fn insert_exchange(&mut self, exchange: CurrencyExchange) -> DomainResult<()> {
        if self.exchange(exchange.id()).is_some() {
            return Err(DomainError::invariant(format!(
                "duplicate exchange id {}",
                exchange.id
            )));
        }
        self.exchanges.push(exchange);
        Ok(())
    }

    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == *id)
    }

    pub fn exchange(&self, id: &ExchangeId) -> Option<&CurrencyExchange> {
        self.exchanges.iter().find(|e| e.id == *id)
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.exchanges.is_empty()
    }

    pub fn clear(&mut self) {
        self.expenses.clear();
        self.exchanges.clear();
    }

    pub fn into_records(self) -> (Vec<Expense>, Vec<CurrencyExchange>) {
        (self.expenses, self.exchanges)
    }

    /// Record an expense with an explicit creation instant.
    pub fn add_expense_at(&mut self, fields: NewExpense, timestamp: DateTime<Utc>) -> ExpenseId {
        let mut id = ExpenseId::new();
        while self.expense(&id).is_some() {
            id = ExpenseId::new();
        }
        self.expenses.push(Expense::from_fields(id, timestamp, fields));
        id
    }

    /// Record an exchange with an explicit creation instant.
    pub fn add_exchange_at(&mut self, fields: NewExchange, timestamp: DateTime<Utc>) -> ExchangeId {
        let mut id = ExchangeId::new();
        while self.exchange(&id).is_some() {
            id = ExchangeId::new();
        }
        self.exchanges
            .push(CurrencyExchange::from_fields(id, timestamp, fields));
        id
    }
}

impl LedgerQueries for Ledger {
    fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    fn exchanges(&self) -> &[CurrencyExchange] {
        &self.exchanges
    }
}

impl LedgerCommands for Ledger {
    fn add_expense(&mut self, fields: NewExpense) -> ExpenseId {
        self.add_expense_at(fields, now_millis())
    }

    fn remove_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        let idx = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(idx))
    }

    fn add_exchange(&mut self, fields: NewExchange) -> ExchangeId {
        self.add_exchange_at(fields, now_millis())
    }

    fn remove_exchange(&mut self, id: ExchangeId) -> Option<CurrencyExchange> {
        let idx = self.exchanges.iter().position(|e| e.id == id)?;
        Some(self.exchanges.remove(idx))
    }
}
