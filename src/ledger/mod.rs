//! Domain value types: money, recurrence rules, entries, and categories.

pub mod category;
pub mod entry;
pub mod recurrence;
pub mod value;

pub use category::Category;
pub use entry::{Entry, LngLat};
pub use recurrence::{RecurrenceKind, RecurrenceUnit, ONCE_INTERVAL};
pub use value::{Currency, Value};
