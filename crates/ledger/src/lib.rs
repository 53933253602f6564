//! Trip ledger: expenses, currency exchanges and the totals derived from them.
//!
//! Pure domain logic only: no IO, no persistence concerns. Durable storage lives in
//! `tripledger-store`, which wraps a [`Ledger`] and implements the same capability
//! traits.

pub mod form;
pub mod ledger;
pub mod model;

pub use tripledger_core::{DomainError, DomainResult, ExchangeId, ExpenseId};

pub use form::{ExchangeDraft, ExpenseDraft};
pub use ledger::{Ledger, LedgerCommands, LedgerQueries};
pub use model::{
    Currency, CurrencyExchange, Expense, ExpenseCategory, NewExchange, NewExpense, now_millis,
    today,
};
