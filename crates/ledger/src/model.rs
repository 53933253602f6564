use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use tripledger_core::{Entity, ExchangeId, ExpenseId};

/// Currency an expense was paid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "CLP")]
    Clp,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Clp => "CLP",
            Currency::Usd => "USD",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Closed set of expense kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Uber,
    Food,
    Store,
    Other,
}

impl ExpenseCategory {
    /// All categories in display order.
    pub const ALL: [ExpenseCategory; 4] = [
        ExpenseCategory::Uber,
        ExpenseCategory::Food,
        ExpenseCategory::Store,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Uber => "uber",
            ExpenseCategory::Food => "food",
            ExpenseCategory::Store => "store",
            ExpenseCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Uber => "Uber",
            ExpenseCategory::Food => "Comida",
            ExpenseCategory::Store => "Tienda",
            ExpenseCategory::Other => "Otro",
        }
    }

    /// Description used when the caller leaves it blank.
    ///
    /// Store purchases fall back to the store name when one was given.
    pub fn default_description(&self, store_name: Option<&str>) -> String {
        match self {
            ExpenseCategory::Uber => "Viaje en Uber".to_string(),
            ExpenseCategory::Food => "Comida".to_string(),
            ExpenseCategory::Store => store_name
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| "Compra en tienda".to_string()),
            ExpenseCategory::Other => "Gasto".to_string(),
        }
    }
}

/// Fields supplied by the caller when recording an expense.
///
/// The ledger does not validate these; see [`crate::form::ExpenseDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[serde(rename = "type")]
    pub category: ExpenseCategory,
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    pub date: NaiveDate,
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(rename = "type")]
    pub category: ExpenseCategory,
    #[serde(deserialize_with = "null_as_zero")]
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    pub date: NaiveDate,
    /// Creation instant, millisecond precision.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Expense {
    pub fn from_fields(id: ExpenseId, timestamp: DateTime<Utc>, fields: NewExpense) -> Self {
        Self {
            id,
            category: fields.category,
            amount: fields.amount,
            currency: fields.currency,
            description: fields.description,
            store_name: fields.store_name,
            date: fields.date,
            timestamp,
        }
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Fields supplied by the caller when recording a USD to CLP exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExchange {
    pub usd_amount: f64,
    pub clp_amount: f64,
    /// CLP per USD for this transaction.
    pub rate: f64,
    pub date: NaiveDate,
}

impl NewExchange {
    /// Build exchange fields with `rate = clp / usd`.
    pub fn from_amounts(usd_amount: f64, clp_amount: f64, date: NaiveDate) -> Self {
        Self {
            usd_amount,
            clp_amount,
            rate: clp_amount / usd_amount,
            date,
        }
    }
}

/// A recorded currency exchange. `rate` is fixed at creation and only displayed;
/// conversions use the ledger-wide average rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyExchange {
    pub id: ExchangeId,
    #[serde(deserialize_with = "null_as_zero")]
    pub usd_amount: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub clp_amount: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub rate: f64,
    pub date: NaiveDate,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl CurrencyExchange {
    pub fn from_fields(id: ExchangeId, timestamp: DateTime<Utc>, fields: NewExchange) -> Self {
        Self {
            id,
            usd_amount: fields.usd_amount,
            clp_amount: fields.clp_amount,
            rate: fields.rate,
            date: fields.date,
            timestamp,
        }
    }
}

impl Entity for CurrencyExchange {
    type Id = ExchangeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// JSON has no NaN or infinity, so non-finite numbers are written as `null`.
/// Reading them back as zero keeps the record, and the rest of the slot, loadable.
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Current instant truncated to milliseconds, so it survives serialization unchanged.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Today's calendar date (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
    }

    #[test]
    fn expense_serializes_with_persisted_field_names() {
        let expense = Expense::from_fields(
            ExpenseId::new(),
            DateTime::from_timestamp_millis(1_768_550_400_123).unwrap(),
            NewExpense {
                category: ExpenseCategory::Store,
                amount: 325_000.0,
                currency: Currency::Clp,
                description: "Guantes".to_string(),
                store_name: Some("Cleto Reyes".to_string()),
                date: date(),
            },
        );

        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(value["type"], "store");
        assert_eq!(value["currency"], "CLP");
        assert_eq!(value["storeName"], "Cleto Reyes");
        assert_eq!(value["date"], "2026-01-16");
        assert_eq!(value["timestamp"], 1_768_550_400_123i64);
    }

    #[test]
    fn store_name_is_omitted_when_absent() {
        let expense = Expense::from_fields(
            ExpenseId::new(),
            now_millis(),
            NewExpense {
                category: ExpenseCategory::Food,
                amount: 12.5,
                currency: Currency::Usd,
                description: "Comida".to_string(),
                store_name: None,
                date: date(),
            },
        );

        let value = serde_json::to_value(&expense).unwrap();
        assert!(value.get("storeName").is_none());
    }

    #[test]
    fn exchange_rate_is_clp_per_usd() {
        let fields = NewExchange::from_amounts(100.0, 95_000.0, date());
        assert_eq!(fields.rate, 950.0);
    }

    #[test]
    fn default_description_prefers_store_name() {
        assert_eq!(
            ExpenseCategory::Store.default_description(Some("Easton")),
            "Easton"
        );
        assert_eq!(
            ExpenseCategory::Store.default_description(Some("  ")),
            "Compra en tienda"
        );
        assert_eq!(ExpenseCategory::Uber.default_description(None), "Viaje en Uber");
        assert_eq!(ExpenseCategory::Other.default_description(None), "Gasto");
    }

    #[test]
    fn zero_usd_exchange_reads_back_with_zero_rate() {
        let exchange = CurrencyExchange::from_fields(
            ExchangeId::new(),
            now_millis(),
            NewExchange::from_amounts(0.0, 10_000.0, date()),
        );
        assert!(exchange.rate.is_infinite());

        let json = serde_json::to_string(&exchange).unwrap();
        assert!(json.contains(r#""rate":null"#), "{json}");

        let back: CurrencyExchange = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, exchange.id);
        assert_eq!(back.usd_amount, 0.0);
        assert_eq!(back.clp_amount, 10_000.0);
        assert_eq!(back.rate, 0.0);
    }

    #[test]
    fn null_expense_amount_reads_as_zero() {
        let raw = r#"{"id":"6f1c2b9e-6a7d-4f57-9a57-2f0c8f3f2a10","type":"food","amount":null,
            "currency":"CLP","description":"Comida","date":"2026-01-16","timestamp":1}"#;
        let expense: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.amount, 0.0);
        assert_eq!(expense.category, ExpenseCategory::Food);
    }

    #[test]
    fn now_millis_has_no_sub_millisecond_part() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
