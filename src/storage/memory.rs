use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;

use crate::{
    errors::{BudgetError, Result},
    ledger::{Category, Entry, Value},
};

use super::{BudgetChangeListener, LedgerStore};

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    entries: Vec<Entry>,
}

/// Thread-safe in-process store. Categories keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    listeners: Mutex<Vec<Arc<dyn BudgetChangeListener>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| BudgetError::StorageError("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| BudgetError::StorageError("store lock poisoned".into()))
    }

    fn listeners(&self) -> Result<Vec<Arc<dyn BudgetChangeListener>>> {
        self.listeners
            .lock()
            .map(|listeners| listeners.clone())
            .map_err(|_| BudgetError::StorageError("listener lock poisoned".into()))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.lock().map(|l| l.len()).unwrap_or_default();
        f.debug_struct("MemoryStore")
            .field("state", &self.state)
            .field("listeners", &listeners)
            .finish()
    }
}

impl LedgerStore for MemoryStore {
    fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.read()?.categories.clone())
    }

    fn category(&self, name: &str) -> Result<Option<Category>> {
        Ok(self
            .read()?
            .categories
            .iter()
            .find(|category| category.name() == name)
            .cloned())
    }

    fn entries_for(&self, category_name: &str) -> Result<Vec<Entry>> {
        Ok(self
            .read()?
            .entries
            .iter()
            .filter(|entry| entry.category_name() == category_name)
            .cloned()
            .collect())
    }

    fn add_category(&self, category: Category) -> Result<()> {
        let mut state = self.write()?;
        if state.categories.iter().any(|c| c.name() == category.name()) {
            return Err(BudgetError::invalid(format!(
                "category '{}' already exists",
                category.name()
            )));
        }
        tracing::debug!(category = category.name(), "category added");
        state.categories.push(category);
        Ok(())
    }

    fn remove_category(&self, name: &str) -> Result<bool> {
        let mut state = self.write()?;
        let before = state.categories.len();
        state.categories.retain(|category| category.name() != name);
        let removed = state.categories.len() != before;
        if removed {
            state.entries.retain(|entry| entry.category_name() != name);
            tracing::debug!(category = name, "category removed");
        }
        Ok(removed)
    }

    fn update_budget(
        &self,
        name: &str,
        budget: Option<Value>,
        at: NaiveDateTime,
    ) -> Result<Option<Value>> {
        let old = {
            let mut state = self.write()?;
            let category = state
                .categories
                .iter_mut()
                .find(|category| category.name() == name)
                .ok_or_else(|| BudgetError::CategoryNotFound(name.to_string()))?;
            category.set_budget(budget)
        };
        // Listeners run without the state lock so they may read the store.
        for listener in self.listeners()? {
            listener.budget_changed(name, at, old, budget);
        }
        Ok(old)
    }

    fn add_entry(&self, entry: Entry) -> Result<()> {
        entry.validate()?;
        let mut state = self.write()?;
        if !state
            .categories
            .iter()
            .any(|category| category.name() == entry.category_name())
        {
            return Err(BudgetError::CategoryNotFound(
                entry.category_name().to_string(),
            ));
        }
        state.entries.push(entry);
        Ok(())
    }

    fn remove_entry(&self, entry: &Entry) -> Result<bool> {
        let mut state = self.write()?;
        match state.entries.iter().position(|stored| stored == entry) {
            Some(index) => {
                state.entries.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_entry(&self, old: &Entry, new: Entry) -> Result<()> {
        new.validate()?;
        let mut state = self.write()?;
        if !state
            .categories
            .iter()
            .any(|category| category.name() == new.category_name())
        {
            return Err(BudgetError::CategoryNotFound(new.category_name().to_string()));
        }
        let slot = state
            .entries
            .iter_mut()
            .find(|stored| *stored == old)
            .ok_or_else(|| BudgetError::invalid(format!("entry not stored: {old}")))?;
        *slot = new;
        Ok(())
    }

    fn add_listener(&self, listener: Arc<dyn BudgetChangeListener>) -> Result<()> {
        self.listeners
            .lock()
            .map_err(|_| BudgetError::StorageError("listener lock poisoned".into()))?
            .push(listener);
        Ok(())
    }

    fn remove_listener(&self, listener: &Arc<dyn BudgetChangeListener>) -> Result<bool> {
        let mut listeners = self
            .listeners
            .lock()
            .map_err(|_| BudgetError::StorageError("listener lock poisoned".into()))?;
        match listeners
            .iter()
            .position(|registered| Arc::ptr_eq(registered, listener))
        {
            Some(index) => {
                listeners.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn reset(&self) -> Result<()> {
        let mut state = self.write()?;
        state.categories.clear();
        state.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ledger::Currency;
    use crate::storage::ChangeLog;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .add_category(Category::new("Food", Currency::Eur).unwrap())
            .unwrap();
        store
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let store = seeded();
        let err = store
            .add_category(Category::new("Food", Currency::Usd).unwrap())
            .unwrap_err();
        assert!(matches!(err, BudgetError::InvalidArgument(_)));
    }

    #[test]
    fn entry_for_unknown_category_is_rejected() {
        let store = seeded();
        let entry = Entry::new(Value::new(-5, 0), at(1), "Travel").unwrap();
        let err = store.add_entry(entry).unwrap_err();
        assert!(matches!(err, BudgetError::CategoryNotFound(name) if name == "Travel"));
    }

    #[test]
    fn removing_category_drops_its_entries() {
        let store = seeded();
        store
            .add_entry(Entry::new(Value::new(-5, 0), at(1), "Food").unwrap())
            .unwrap();
        assert!(store.remove_category("Food").unwrap());
        assert!(store.entries_for("Food").unwrap().is_empty());
        assert!(!store.remove_category("Food").unwrap());
    }

    #[test]
    fn update_and_remove_entry_match_by_value() {
        let store = seeded();
        let original = Entry::new(Value::new(-5, 0), at(1), "Food").unwrap();
        store.add_entry(original.clone()).unwrap();

        let edited = original.with_value(Value::new(-7, 0));
        store.update_entry(&original, edited.clone()).unwrap();
        assert_eq!(store.entries_for("Food").unwrap(), vec![edited.clone()]);

        assert!(!store.remove_entry(&original).unwrap());
        assert!(store.remove_entry(&edited).unwrap());
        assert!(store.all_entries().unwrap().is_empty());
    }

    #[test]
    fn budget_update_notifies_listeners() {
        let store = seeded();
        let log = Arc::new(ChangeLog::new());
        store.add_listener(log.clone()).unwrap();

        let old = store
            .update_budget("Food", Some(Value::new(200, 0)), at(2))
            .unwrap();
        assert_eq!(old, None);
        let old = store
            .update_budget("Food", Some(Value::new(150, 0)), at(3))
            .unwrap();
        assert_eq!(old, Some(Value::new(200, 0)));

        let changes = log.changes_for("Food");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].old_budget, Some(Value::new(200, 0)));
        assert_eq!(changes[1].new_budget, Some(Value::new(150, 0)));
        assert_eq!(changes[1].date, at(3));
    }

    #[test]
    fn removed_listener_is_no_longer_notified() {
        let store = seeded();
        let log = Arc::new(ChangeLog::new());
        let listener: Arc<dyn BudgetChangeListener> = log.clone();
        store.add_listener(listener.clone()).unwrap();

        assert!(store.remove_listener(&listener).unwrap());
        store
            .update_budget("Food", Some(Value::new(80, 0)), at(4))
            .unwrap();
        assert!(log.is_empty());
        assert!(!store.remove_listener(&listener).unwrap());
    }

    #[test]
    fn budget_update_for_missing_category_fails() {
        let store = MemoryStore::new();
        let err = store.update_budget("Food", None, at(1)).unwrap_err();
        assert!(matches!(err, BudgetError::CategoryNotFound(_)));
    }
}
