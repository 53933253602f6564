//! Shared building blocks for the trip ledger: ids, errors and the entity trait.
//!
//! This crate contains **pure domain** primitives (no storage or presentation concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ExchangeId, ExpenseId};
