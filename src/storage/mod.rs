//! Storage gateway abstraction consumed by the budget calculator, plus the
//! in-memory store, change log, and JSON snapshot built on top of it.

pub mod change_log;
pub mod memory;
pub mod snapshot;

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    errors::Result,
    ledger::{Category, Entry, Value},
};

pub use change_log::{BudgetChangeListener, ChangeLog, LogItem};
pub use memory::MemoryStore;
pub use snapshot::Snapshot;

/// Abstraction over backends that persist categories and entries.
///
/// Implementations return entries exactly as stored, recurrence fields included.
pub trait LedgerStore: Send + Sync {
    fn categories(&self) -> Result<Vec<Category>>;
    fn category(&self, name: &str) -> Result<Option<Category>>;
    fn entries_for(&self, category_name: &str) -> Result<Vec<Entry>>;

    fn add_category(&self, category: Category) -> Result<()>;
    /// Removes the category together with its entries. Returns whether it existed.
    fn remove_category(&self, name: &str) -> Result<bool>;
    /// Replaces a category's budget, notifies listeners, and returns the old budget.
    fn update_budget(
        &self,
        name: &str,
        budget: Option<Value>,
        at: NaiveDateTime,
    ) -> Result<Option<Value>>;

    fn add_entry(&self, entry: Entry) -> Result<()>;
    /// Removes the first stored entry equal to `entry`. Returns whether one matched.
    fn remove_entry(&self, entry: &Entry) -> Result<bool>;
    fn update_entry(&self, old: &Entry, new: Entry) -> Result<()>;

    fn add_listener(&self, listener: Arc<dyn BudgetChangeListener>) -> Result<()>;
    /// Unregisters `listener`, matched by identity. Returns whether it was registered.
    fn remove_listener(&self, listener: &Arc<dyn BudgetChangeListener>) -> Result<bool>;
    /// Drops every category and entry. Listeners stay registered.
    fn reset(&self) -> Result<()>;

    /// Every stored entry, grouped by category in category order.
    fn all_entries(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for category in self.categories()? {
            entries.extend(self.entries_for(category.name())?);
        }
        Ok(entries)
    }
}
