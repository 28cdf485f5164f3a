//! Immutable financial entries and their copy-on-write mutation API.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{
    category::Category,
    recurrence::{RecurrenceKind, ONCE_INTERVAL},
    value::Value,
};
use crate::errors::{BudgetError, Result};

/// Geographic position recorded when an entry was created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl PartialEq for LngLat {
    fn eq(&self, other: &Self) -> bool {
        self.lng.to_bits() == other.lng.to_bits() && self.lat.to_bits() == other.lat.to_bits()
    }
}

impl Eq for LngLat {}

impl Hash for LngLat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lng.to_bits().hash(state);
        self.lat.to_bits().hash(state);
    }
}

/// One financial movement, optionally repeating on a daily or monthly cadence.
///
/// Entries never change after construction: every `with_*` method returns a new
/// entry with a single field replaced. Equality and hashing ignore `parent`, so
/// occurrences derived from a template compare equal to freshly built ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<LngLat>,
    start_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<NaiveDateTime>,
    #[serde(default)]
    recurrence: RecurrenceKind,
    #[serde(default = "Entry::default_interval")]
    interval: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recurrence_end: Option<NaiveDateTime>,
    category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<Box<Entry>>,
}

impl Entry {
    /// Creates a one-off entry for the named category.
    pub fn new(
        value: Value,
        start_time: NaiveDateTime,
        category_name: impl Into<String>,
    ) -> Result<Self> {
        let category_name = validated_category_name(category_name.into())?;
        Ok(Self {
            value,
            purpose: None,
            location: None,
            start_time,
            end_time: None,
            recurrence: RecurrenceKind::Once,
            interval: ONCE_INTERVAL,
            recurrence_end: None,
            category_name,
            parent: None,
        })
    }

    /// Creates a one-off entry attached to `category`.
    pub fn for_category(value: Value, start_time: NaiveDateTime, category: &Category) -> Self {
        Self {
            value,
            purpose: None,
            location: None,
            start_time,
            end_time: None,
            recurrence: RecurrenceKind::Once,
            interval: ONCE_INTERVAL,
            recurrence_end: None,
            category_name: category.name().to_string(),
            parent: None,
        }
    }

    fn default_interval() -> i32 {
        ONCE_INTERVAL
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    pub fn location(&self) -> Option<LngLat> {
        self.location
    }

    pub fn lng(&self) -> Option<f64> {
        self.location.map(|loc| loc.lng)
    }

    pub fn lat(&self) -> Option<f64> {
        self.location.map(|loc| loc.lat)
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn recurrence(&self) -> RecurrenceKind {
        self.recurrence
    }

    /// Step count between repetitions; [`ONCE_INTERVAL`] for one-off entries.
    pub fn interval(&self) -> i32 {
        self.interval
    }

    pub fn recurrence_end(&self) -> Option<NaiveDateTime> {
        self.recurrence_end
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Template this entry was expanded from, if any.
    pub fn parent(&self) -> Option<&Entry> {
        self.parent.as_deref()
    }

    pub fn is_repeating(&self) -> bool {
        self.recurrence.is_repeating()
    }

    pub fn with_value(&self, value: Value) -> Entry {
        Entry {
            value,
            ..self.clone()
        }
    }

    pub fn with_purpose(&self, purpose: Option<String>) -> Entry {
        Entry {
            purpose,
            ..self.clone()
        }
    }

    /// Replaces the location. Both coordinates must be present or both absent.
    pub fn with_lng_lat(&self, lng: Option<f64>, lat: Option<f64>) -> Result<Entry> {
        let location = match (lng, lat) {
            (Some(lng), Some(lat)) => Some(LngLat { lng, lat }),
            (None, None) => None,
            _ => {
                return Err(BudgetError::invalid(
                    "longitude and latitude must both be set or both be empty",
                ))
            }
        };
        Ok(Entry {
            location,
            ..self.clone()
        })
    }

    pub fn with_start_time(&self, start_time: NaiveDateTime) -> Entry {
        Entry {
            start_time,
            ..self.clone()
        }
    }

    pub fn with_end_time(&self, end_time: Option<NaiveDateTime>) -> Entry {
        Entry {
            end_time,
            ..self.clone()
        }
    }

    /// Replaces the recurrence rule.
    ///
    /// `interval` is ignored and stored as [`ONCE_INTERVAL`] for one-off entries; a
    /// repeating kind needs a positive interval and a `recurrence_end` no earlier
    /// than the start time.
    pub fn with_interval(
        &self,
        kind: RecurrenceKind,
        interval: i32,
        recurrence_end: Option<NaiveDateTime>,
    ) -> Result<Entry> {
        let interval = if kind.is_repeating() {
            if interval <= 0 {
                return Err(BudgetError::invalid(format!(
                    "interval must be greater than zero for {kind} entries, got {interval}"
                )));
            }
            interval
        } else {
            ONCE_INTERVAL
        };
        let entry = Entry {
            recurrence: kind,
            interval,
            recurrence_end,
            ..self.clone()
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn with_category_name(&self, category_name: impl Into<String>) -> Result<Entry> {
        let category_name = validated_category_name(category_name.into())?;
        Ok(Entry {
            category_name,
            ..self.clone()
        })
    }

    pub fn with_category(&self, category: &Category) -> Entry {
        Entry {
            category_name: category.name().to_string(),
            ..self.clone()
        }
    }

    pub fn with_parent(&self, parent: Option<Entry>) -> Entry {
        Entry {
            parent: parent.map(Box::new),
            ..self.clone()
        }
    }

    /// Checks invariants that can be broken by combining independent mutators or by
    /// deserializing untrusted data.
    pub fn validate(&self) -> Result<()> {
        if self.category_name.trim().is_empty() {
            return Err(BudgetError::invalid("category name must not be empty"));
        }
        if !self.recurrence.is_repeating() {
            return Ok(());
        }
        if self.interval <= 0 {
            return Err(BudgetError::invalid(format!(
                "interval must be greater than zero for {} entries, got {}",
                self.recurrence, self.interval
            )));
        }
        if let Some(end) = self.recurrence_end {
            if end < self.start_time {
                return Err(BudgetError::invalid(format!(
                    "recurrence end {end} precedes start time {}",
                    self.start_time
                )));
            }
        }
        Ok(())
    }

    /// Builds the one-off occurrence of this template spanning `start` to `end`, with
    /// the template kept as `parent`.
    pub(crate) fn occurrence_at(
        &self,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> Entry {
        Entry {
            value: self.value,
            purpose: self.purpose.clone(),
            location: self.location,
            start_time: start,
            end_time: end,
            recurrence: RecurrenceKind::Once,
            interval: ONCE_INTERVAL,
            recurrence_end: None,
            category_name: self.category_name.clone(),
            parent: Some(Box::new(self.clone())),
        }
    }
}

fn validated_category_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(BudgetError::invalid("category name must not be empty"));
    }
    Ok(name)
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.purpose == other.purpose
            && self.location == other.location
            && self.start_time == other.start_time
            && self.end_time == other.end_time
            && self.recurrence == other.recurrence
            && self.interval == other.interval
            && self.recurrence_end == other.recurrence_end
            && self.category_name == other.category_name
    }
}

impl Eq for Entry {}

impl Hash for Entry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.purpose.hash(state);
        self.location.hash(state);
        self.start_time.hash(state);
        self.end_time.hash(state);
        self.recurrence.hash(state);
        self.interval.hash(state);
        self.recurrence_end.hash(state);
        self.category_name.hash(state);
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.value, self.category_name)?;
        if let Some(purpose) = &self.purpose {
            write!(f, " for {purpose}")?;
        }
        write!(f, " at {}", self.start_time)?;
        if let Some(end) = self.end_time {
            write!(f, "-{end}")?;
        }
        if let Some(loc) = self.location {
            write!(f, " @lng:{} lat:{}", loc.lng, loc.lat)?;
        }
        if self.recurrence.is_repeating() {
            write!(f, ", repeating every {} {}", self.interval, self.recurrence)?;
            match self.recurrence_end {
                Some(end) => write!(f, " until {end}")?,
                None => f.write_str(" without end")?,
            }
        }
        Ok(())
    }
}
