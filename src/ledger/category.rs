use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use super::value::{Currency, Value};
use crate::errors::{BudgetError, Result};

/// A named budget envelope. Identity is the name alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    name: String,
    currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget: Option<Value>,
}

impl Category {
    pub fn new(name: impl Into<String>, currency: Currency) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BudgetError::invalid("category name must not be empty"));
        }
        Ok(Self {
            name,
            currency,
            budget: None,
        })
    }

    pub fn with_budget(mut self, budget: Value) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Configured budget; `None` means no budget was set, which is not the same as zero.
    pub fn budget(&self) -> Option<Value> {
        self.budget
    }

    pub fn has_budget(&self) -> bool {
        self.budget.is_some()
    }

    /// Replaces the budget and returns the previous one.
    pub fn set_budget(&mut self, budget: Option<Value>) -> Option<Value> {
        std::mem::replace(&mut self.budget, budget)
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.budget {
            Some(budget) => write!(f, "{} [{}]", self.name, self.currency.format(budget)),
            None => write!(f, "{} [no budget, {}]", self.name, self.currency),
        }
    }
}
