//! Budget change notifications and an in-memory recorder for them.

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ledger::Value;

/// One recorded budget edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogItem {
    pub date: NaiveDateTime,
    pub category_name: String,
    #[serde(default)]
    pub old_budget: Option<Value>,
    #[serde(default)]
    pub new_budget: Option<Value>,
}

/// Receives a callback whenever a category's budget is edited through a store.
pub trait BudgetChangeListener: Send + Sync {
    fn budget_changed(
        &self,
        category_name: &str,
        at: NaiveDateTime,
        old: Option<Value>,
        new: Option<Value>,
    );

    /// Every change seen so far, or `None` when the listener does not keep history.
    fn all_changes(&self) -> Option<Vec<LogItem>> {
        None
    }
}

/// Listener that keeps every change in memory, oldest first.
#[derive(Debug, Default)]
pub struct ChangeLog {
    items: Mutex<Vec<LogItem>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the log, e.g. from an imported snapshot.
    pub fn from_items(items: Vec<LogItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn changes_for(&self, category_name: &str) -> Vec<LogItem> {
        self.lock()
            .iter()
            .filter(|item| item.category_name == category_name)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogItem>> {
        // Entries are only ever appended, so a poisoned log is still consistent.
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BudgetChangeListener for ChangeLog {
    fn budget_changed(
        &self,
        category_name: &str,
        at: NaiveDateTime,
        old: Option<Value>,
        new: Option<Value>,
    ) {
        tracing::info!(category = category_name, ?old, ?new, "budget changed");
        self.lock().push(LogItem {
            date: at,
            category_name: category_name.to_string(),
            old_budget: old,
            new_budget: new,
        });
    }

    fn all_changes(&self) -> Option<Vec<LogItem>> {
        Some(self.lock().clone())
    }
}
