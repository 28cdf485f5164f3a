//! Whole-store JSON export and import.

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{BudgetError, Result},
    ledger::{Category, Entry},
    utils::persistence::{load_json_from_path, save_json_to_path},
};

use super::{BudgetChangeListener, LedgerStore, LogItem};

/// Serializable copy of a store's categories, entries, and optional change log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_log: Option<Vec<LogItem>>,
}

impl Snapshot {
    /// Captures everything in `store`. The change log comes from `history` when it
    /// keeps one.
    pub fn from_store(
        store: &dyn LedgerStore,
        history: Option<&dyn BudgetChangeListener>,
    ) -> Result<Self> {
        let snapshot = Self {
            entries: store.all_entries()?,
            categories: store.categories()?,
            change_log: history.and_then(|listener| listener.all_changes()),
        };
        tracing::debug!(
            categories = snapshot.categories.len(),
            entries = snapshot.entries.len(),
            "captured snapshot"
        );
        Ok(snapshot)
    }

    /// Replaces the contents of `store` with this snapshot.
    ///
    /// The snapshot is validated first so a bad document leaves the store untouched.
    pub fn fill_store(&self, store: &dyn LedgerStore) -> Result<()> {
        self.validate()?;
        store.reset()?;
        for category in &self.categories {
            store.add_category(category.clone())?;
        }
        for entry in &self.entries {
            store.add_entry(entry.clone())?;
        }
        tracing::info!(
            categories = self.categories.len(),
            entries = self.entries.len(),
            "restored snapshot"
        );
        Ok(())
    }

    /// Rejects duplicate category names, entries pointing at unknown categories, and
    /// entries whose own invariants do not hold.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for category in &self.categories {
            if category.name().trim().is_empty() {
                return Err(BudgetError::invalid("snapshot contains a blank category name"));
            }
            if !names.insert(category.name()) {
                return Err(BudgetError::invalid(format!(
                    "snapshot contains duplicate category '{}'",
                    category.name()
                )));
            }
        }
        for entry in &self.entries {
            entry.validate()?;
            if !names.contains(entry.category_name()) {
                return Err(BudgetError::CategoryNotFound(
                    entry.category_name().to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        save_json_to_path(self, path)?;
        tracing::info!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let snapshot: Snapshot = load_json_from_path(path)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
