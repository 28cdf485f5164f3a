mod common;

use common::{at, category, dec, once};
use recurring_budget::{
    core::BudgetService,
    errors::BudgetError,
    ledger::{Entry, RecurrenceKind},
    storage::{LedgerStore, MemoryStore},
};

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .add_category(category("Groceries", Some("100.00")))
        .unwrap();
    store.add_category(category("Gifts", None)).unwrap();
    store
}

#[test]
fn income_entries_raise_the_remaining_amount() {
    let groceries = category("Groceries", Some("100"));
    let entries = vec![
        once("-40", at(2024, 1, 2), "Groceries"),
        once("15.25", at(2024, 1, 3), "Groceries"),
    ];

    let available =
        BudgetService::available_budget(&groceries, &entries, at(2024, 1, 1), at(2024, 1, 31))
            .unwrap();
    assert_eq!(available, Some(dec("75.25")));
}

#[test]
fn overspending_goes_negative() {
    let groceries = category("Groceries", Some("10"));
    let weekly = Entry::for_category(dec("-4"), at(2024, 1, 1), &groceries)
        .with_interval(RecurrenceKind::Daily, 7, None)
        .unwrap();

    let available =
        BudgetService::available_budget(&groceries, &[weekly], at(2024, 1, 1), at(2024, 1, 31))
            .unwrap();
    // Jan 1, 8, 15, 22, 29
    assert_eq!(available, Some(dec("-10")));
}

#[test]
fn store_path_matches_direct_computation() {
    let store = seeded_store();
    let monthly = once("-20", at(2023, 12, 5), "Groceries")
        .with_interval(RecurrenceKind::Monthly, 1, None)
        .unwrap();
    store.add_entry(monthly.clone()).unwrap();
    store
        .add_entry(once("-35.50", at(2024, 2, 14), "Groceries"))
        .unwrap();

    let groceries = store.category("Groceries").unwrap().unwrap();
    let direct = BudgetService::available_budget(
        &groceries,
        &store.entries_for("Groceries").unwrap(),
        at(2024, 1, 1),
        at(2024, 3, 31),
    )
    .unwrap();
    let via_store =
        BudgetService::available_in_store(&store, "Groceries", at(2024, 1, 1), at(2024, 3, 31))
            .unwrap();

    assert_eq!(direct, via_store);
    // Jan 5, Feb 5, Mar 5 plus the one-off
    assert_eq!(via_store, Some(dec("4.50")));
    assert_eq!(
        store.entries_for("Groceries").unwrap(),
        vec![monthly, once("-35.50", at(2024, 2, 14), "Groceries")]
    );
}

#[test]
fn category_without_budget_reports_none_through_store() {
    let store = seeded_store();
    store.add_entry(once("-30", at(2024, 1, 4), "Gifts")).unwrap();

    let available =
        BudgetService::available_in_store(&store, "Gifts", at(2024, 1, 1), at(2024, 1, 31))
            .unwrap();
    assert_eq!(available, None);
}

#[test]
fn budget_edits_are_visible_to_the_next_query() {
    let store = seeded_store();
    store
        .add_entry(once("-35.50", at(2024, 1, 12), "Groceries"))
        .unwrap();
    store
        .update_budget("Groceries", Some(dec("50")), at(2024, 1, 15))
        .unwrap();

    let available =
        BudgetService::available_in_store(&store, "Groceries", at(2024, 1, 1), at(2024, 1, 31))
            .unwrap();
    assert_eq!(available, Some(dec("14.50")));
}

#[test]
fn unknown_category_is_reported() {
    let store = seeded_store();
    let err = BudgetService::available_in_store(&store, "Holidays", at(2024, 1, 1), at(2024, 1, 31))
        .unwrap_err();
    assert!(matches!(err, BudgetError::CategoryNotFound(name) if name == "Holidays"));
}
