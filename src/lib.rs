#![doc(test(attr(deny(warnings))))]

//! Recurring Budget expands daily and monthly repeating entries into concrete
//! occurrences inside a date window and computes how much of a category's budget
//! remains over that window.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::config::{ConfigManager, EngineConfig};
pub use crate::core::{expand, BudgetService, Window};
pub use crate::errors::{BudgetError, Result};
pub use crate::ledger::{Category, Currency, Entry, RecurrenceKind, Value};
pub use crate::storage::{BudgetChangeListener, ChangeLog, LedgerStore, MemoryStore, Snapshot};

/// Initializes global tracing with the default filter and emits a startup info log.
pub fn init() {
    init_with(&EngineConfig::default());
}

/// Like [`init`], honouring `config.log_filter` when `RUST_LOG` is unset.
///
/// Only the first call in a process takes effect.
pub fn init_with(config: &EngineConfig) {
    utils::init_tracing(config.log_filter.as_deref());
}
