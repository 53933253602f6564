//! Persisted layout: `{ "expenses": [...], "exchanges": [...] }` under one key.
//!
//! Either array may be absent or `null`; both read back as empty.

use serde::{Deserialize, Serialize};

use tripledger_ledger::{CurrencyExchange, Expense, Ledger, LedgerQueries};

#[derive(Serialize)]
struct SnapshotRef<'a> {
    expenses: &'a [Expense],
    exchanges: &'a [CurrencyExchange],
}

#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    expenses: Option<Vec<Expense>>,
    #[serde(default)]
    exchanges: Option<Vec<CurrencyExchange>>,
}

/// Serialize both record lists, nothing else.
pub fn encode(ledger: &impl LedgerQueries) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SnapshotRef {
        expenses: ledger.expenses(),
        exchanges: ledger.exchanges(),
    })
}

pub fn decode(raw: &str) -> Result<Ledger, serde_json::Error> {
    let snapshot: Snapshot = serde_json::from_str(raw)?;
    Ok(Ledger::from_records(
        snapshot.expenses.unwrap_or_default(),
        snapshot.exchanges.unwrap_or_default(),
    ))
}
