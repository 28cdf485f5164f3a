//! Computes how much of a category's budget remains over a window.

use chrono::NaiveDateTime;

use crate::core::expansion::{expand_in, Window};
use crate::errors::{BudgetError, Result};
use crate::ledger::{Category, Entry, Value};
use crate::storage::LedgerStore;

/// Stateless budgeting utilities over borrowed categories and entries.
pub struct BudgetService;

impl BudgetService {
    /// Returns `budget + Σ occurrence values` for the window, or `None` when the
    /// category has no budget configured.
    ///
    /// Entry values are signed, so the result may be negative.
    pub fn available_budget(
        category: &Category,
        entries: &[Entry],
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Option<Value>> {
        let window = Window::new(from, to)?;
        let Some(budget) = category.budget() else {
            tracing::debug!(category = category.name(), "no budget configured");
            return Ok(None);
        };
        let spent = Self::spent_in(entries, window)?;
        let available = budget + spent;
        tracing::debug!(
            category = category.name(),
            %budget,
            %spent,
            %available,
            "computed available budget"
        );
        Ok(Some(available))
    }

    /// Signed sum of every occurrence inside `[from, to]`.
    pub fn spent_in_window(
        entries: &[Entry],
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Value> {
        Self::spent_in(entries, Window::new(from, to)?)
    }

    /// Fetches the category and its entries from `store` and computes the remaining
    /// budget.
    pub fn available_in_store(
        store: &dyn LedgerStore,
        category_name: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Option<Value>> {
        let category = store
            .category(category_name)?
            .ok_or_else(|| BudgetError::CategoryNotFound(category_name.to_string()))?;
        let entries = store.entries_for(category.name())?;
        Self::available_budget(&category, &entries, from, to)
    }

    fn spent_in(entries: &[Entry], window: Window) -> Result<Value> {
        Ok(expand_in(entries, window)?
            .iter()
            .map(Entry::value)
            .sum())
    }
}
