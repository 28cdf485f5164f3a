//! Pure computation over entries: recurrence expansion and budget availability.

pub mod expansion;
pub mod services;

pub use expansion::{
    by_start_time, expand, expand_in, occurrences, sort_by_start_time, Occurrences, Window,
};
pub use services::BudgetService;
