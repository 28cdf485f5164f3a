#![allow(dead_code)]

use std::{path::PathBuf, str::FromStr, sync::Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use recurring_budget::{
    config::ConfigManager,
    ledger::{Category, Currency, Entry, RecurrenceKind, Value},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique base directory and a config manager rooted in it.
pub fn setup_test_env() -> (PathBuf, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (base, config_manager)
}

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    at_time(year, month, day, 0, 0)
}

pub fn at_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

pub fn dec(raw: &str) -> Value {
    Value::from_str(raw).expect("valid decimal")
}

pub fn category(name: &str, budget: Option<&str>) -> Category {
    let category = Category::new(name, Currency::Eur).expect("valid category");
    match budget {
        Some(raw) => category.with_budget(dec(raw)),
        None => category,
    }
}

pub fn once(value: &str, start: NaiveDateTime, category_name: &str) -> Entry {
    Entry::new(dec(value), start, category_name).expect("valid entry")
}

pub fn repeating(
    value: &str,
    start: NaiveDateTime,
    kind: RecurrenceKind,
    interval: i32,
    end: Option<NaiveDateTime>,
) -> Entry {
    once(value, start, "General")
        .with_interval(kind, interval, end)
        .expect("valid recurrence")
}

pub fn starts(entries: &[Entry]) -> Vec<NaiveDateTime> {
    entries.iter().map(Entry::start_time).collect()
}
