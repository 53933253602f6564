use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;

use tripledger_ledger::{
    Currency, ExpenseCategory, LedgerCommands, LedgerQueries, NewExchange, NewExpense,
};
use tripledger_store::{
    InMemoryStorage, KeyValueStorage, LedgerStore, LoadOutcome, SqliteStorage, StorageBackend,
    StoreConfig,
};

const KEY: &str = "viaje-chile-2026-data";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()
}

fn new_expense(category: ExpenseCategory, amount: f64, currency: Currency) -> NewExpense {
    NewExpense {
        category,
        amount,
        currency,
        description: category.default_description(None),
        store_name: None,
        date: date(),
    }
}

fn temp_db_path() -> PathBuf {
    std::env::temp_dir().join(format!("tripledger-test-{}.db", uuid::Uuid::now_v7()))
}

fn remove_db(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[test]
fn records_survive_reopen() {
    let storage = Arc::new(InMemoryStorage::new());

    let (expense_id, exchange_id) = {
        let (mut store, outcome) = LedgerStore::open(storage.clone(), KEY);
        assert_eq!(outcome, LoadOutcome::Empty);
        let exchange_id = store.add_exchange(NewExchange::from_amounts(100.0, 95_000.0, date()));
        let mut fields = new_expense(ExpenseCategory::Store, 325_000.0, Currency::Clp);
        fields.store_name = Some("Cleto Reyes Chile".into());
        (store.add_expense(fields), exchange_id)
    };

    let (store, outcome) = LedgerStore::open(storage, KEY);
    assert_eq!(
        outcome,
        LoadOutcome::Restored {
            expenses: 1,
            exchanges: 1
        }
    );

    let expense = &store.expenses()[0];
    assert_eq!(expense.id, expense_id);
    assert_eq!(expense.store_name.as_deref(), Some("Cleto Reyes Chile"));
    assert_eq!(store.exchanges()[0].id, exchange_id);
    assert_eq!(store.average_rate(), 950.0);
}

#[test]
fn scenario_exchange_then_food_expense() {
    let (mut store, _) = LedgerStore::open(InMemoryStorage::new(), KEY);

    store.add_exchange(NewExchange::from_amounts(100.0, 95_000.0, date()));
    let id = store.add_expense(new_expense(ExpenseCategory::Food, 30_000.0, Currency::Clp));

    assert_eq!(store.average_rate(), 950.0);
    assert_eq!(store.total_spent_clp(), 30_000.0);
    let expense = store.expenses().iter().find(|e| e.id == id).unwrap();
    let usd = store.usd_equivalent(expense);
    assert!((usd - 31.58).abs() < 0.01, "got {usd}");
}

#[test]
fn garbage_slot_starts_empty_without_error() {
    tripledger_observability::init();

    for garbage in ["null", "{\"expenses\": 12}", "\u{0}\u{1}binary"] {
        let storage = InMemoryStorage::with_entry(KEY, garbage);
        let (store, outcome) = LedgerStore::open(storage, KEY);
        assert!(
            matches!(outcome, LoadOutcome::Discarded { .. }),
            "{garbage:?} gave {outcome:?}"
        );
        assert!(store.expenses().is_empty());
        assert!(store.exchanges().is_empty());
    }
}

#[test]
fn blank_slot_is_treated_as_missing() {
    for blank in ["", "  \n"] {
        let storage = Arc::new(InMemoryStorage::with_entry(KEY, blank));
        let (store, outcome) = LedgerStore::open(storage.clone(), KEY);
        assert_eq!(outcome, LoadOutcome::Empty, "{blank:?}");
        assert!(store.expenses().is_empty());
        assert_eq!(
            storage.get(KEY).unwrap().as_deref(),
            Some(r#"{"expenses":[],"exchanges":[]}"#)
        );
    }
}

#[test]
fn zero_usd_exchange_does_not_wipe_the_ledger_on_reopen() {
    let storage = Arc::new(InMemoryStorage::new());
    let (expense_id, exchange_id) = {
        let (mut store, _) = LedgerStore::open(storage.clone(), KEY);
        let expense_id =
            store.add_expense(new_expense(ExpenseCategory::Food, 30_000.0, Currency::Clp));
        store.add_exchange(NewExchange::from_amounts(100.0, 95_000.0, date()));
        let exchange_id = store.add_exchange(NewExchange::from_amounts(0.0, 10_000.0, date()));
        (expense_id, exchange_id)
    };
    assert!(storage.get(KEY).unwrap().unwrap().contains(r#""rate":null"#));

    let (store, outcome) = LedgerStore::open(storage.clone(), KEY);
    assert_eq!(
        outcome,
        LoadOutcome::Restored {
            expenses: 1,
            exchanges: 2
        }
    );
    assert_eq!(store.expenses()[0].id, expense_id);
    let zero = store.exchanges().iter().find(|x| x.id == exchange_id).unwrap();
    assert_eq!(zero.usd_amount, 0.0);
    assert_eq!(zero.rate, 0.0);
    assert_eq!(store.average_rate(), 1_050.0);

    // the rewrite after load keeps every record
    let (again, _) = LedgerStore::open(storage, KEY);
    assert_eq!(again.expenses().len(), 1);
    assert_eq!(again.exchanges().len(), 2);
}

#[test]
fn removing_unknown_ids_leaves_slot_content_unchanged() {
    let storage = Arc::new(InMemoryStorage::new());
    let (mut store, _) = LedgerStore::open(storage.clone(), KEY);
    store.add_expense(new_expense(ExpenseCategory::Uber, 9_000.0, Currency::Clp));
    let before = storage.get(KEY).unwrap();

    assert!(store.remove_expense(Default::default()).is_none());
    assert!(store.remove_exchange(Default::default()).is_none());

    assert_eq!(storage.get(KEY).unwrap(), before);
    assert_eq!(store.expenses().len(), 1);
}

#[test]
fn sqlite_backend_round_trip() {
    let path = temp_db_path();

    {
        let storage = SqliteStorage::open(&path).unwrap();
        let (mut store, outcome) = LedgerStore::open(storage, KEY);
        assert_eq!(outcome, LoadOutcome::Empty);
        store.add_exchange(NewExchange::from_amounts(50.0, 49_000.0, date()));
        store.add_expense(new_expense(ExpenseCategory::Uber, 12.5, Currency::Usd));
    }

    {
        let storage = SqliteStorage::open(&path).unwrap();
        let (store, outcome) = LedgerStore::open(storage, KEY);
        assert_eq!(
            outcome,
            LoadOutcome::Restored {
                expenses: 1,
                exchanges: 1
            }
        );
        assert_eq!(store.total_spent_usd(), 12.5);
        assert_eq!(store.average_rate(), 980.0);
    }

    remove_db(&path);
}

#[test]
fn sqlite_slots_are_independent_and_removable() {
    let path = temp_db_path();
    let storage = SqliteStorage::open(&path).unwrap();

    storage.set("a", "first").unwrap();
    storage.set("b", "second").unwrap();
    storage.set("a", "updated").unwrap();
    assert_eq!(storage.get("a").unwrap().as_deref(), Some("updated"));
    assert_eq!(storage.get("b").unwrap().as_deref(), Some("second"));

    storage.remove("a").unwrap();
    assert_eq!(storage.get("a").unwrap(), None);
    assert_eq!(storage.path(), path.as_path());

    drop(storage);
    remove_db(&path);
}

#[test]
fn sqlite_backend_from_config() {
    let path = temp_db_path();
    let config = StoreConfig {
        storage_key: "config-key".into(),
        backend: StorageBackend::Sqlite,
        database_path: Some(path.clone()),
    };

    {
        let (mut store, _) = LedgerStore::open_with_config(&config).unwrap();
        store.add_expense(new_expense(ExpenseCategory::Other, 3.0, Currency::Usd));
    }

    let storage = SqliteStorage::open(&path).unwrap();
    assert!(storage.get("config-key").unwrap().is_some());
    assert_eq!(storage.get(KEY).unwrap(), None);

    drop(storage);
    remove_db(&path);
}

fn category_strategy() -> impl Strategy<Value = ExpenseCategory> {
    prop_oneof![
        Just(ExpenseCategory::Uber),
        Just(ExpenseCategory::Food),
        Just(ExpenseCategory::Store),
        Just(ExpenseCategory::Other),
    ]
}

fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Clp), Just(Currency::Usd)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Property: what one store instance wrote, the next reads back element-wise equal.
    #[test]
    fn reopen_preserves_records_exactly(
        expenses in prop::collection::vec(
            (category_strategy(), 0.01f64..10_000_000.0, currency_strategy()),
            0..15,
        ),
        exchanges in prop::collection::vec((0.01f64..10_000.0, 1.0f64..10_000_000.0), 0..5),
    ) {
        let storage = Arc::new(InMemoryStorage::new());
        let (mut writer, _) = LedgerStore::open(storage.clone(), KEY);
        for (category, amount, currency) in expenses {
            writer.add_expense(new_expense(category, amount, currency));
        }
        for (usd, clp) in exchanges {
            writer.add_exchange(NewExchange::from_amounts(usd, clp, date()));
        }

        let (reader, _) = LedgerStore::open(storage, KEY);
        prop_assert_eq!(reader.expenses(), writer.expenses());
        prop_assert_eq!(reader.exchanges(), writer.exchanges());
    }
}
