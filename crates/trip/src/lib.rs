//! Read-only trip reference data and the budget views built on ledger totals.
//!
//! The ledger never depends on this crate; budget status takes any
//! [`tripledger_ledger::LedgerQueries`] implementor.

pub mod budget;
pub mod reference;

pub use budget::{BudgetStatus, CategorySummary};
pub use reference::{
    Flight, Lodging, Place, PlaceKind, TripBudget, TripInfo, places, shopping_places, trip_info,
};
