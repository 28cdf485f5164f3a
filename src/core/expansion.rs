//! Turns stored entries, some of them repeating templates, into the concrete one-off
//! occurrences that fall inside a query window.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{BudgetError, Result};
use crate::ledger::{Entry, RecurrenceUnit};

/// Inclusive `[from, to]` range used for expansion and budget queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl Window {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self> {
        if from > to {
            return Err(BudgetError::invalid(format!(
                "window start {from} is after window end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.from
    }

    pub fn end(&self) -> NaiveDateTime {
        self.to
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.from <= instant && instant <= self.to
    }
}

/// Expands `entries` into one-off occurrences whose start lies within `[from, to]`.
///
/// One-off entries pass through unchanged when they start inside the window.
/// Repeating entries yield one occurrence per step that starts inside the window and
/// not after their recurrence end. Output keeps input order, and occurrences of the
/// same template are ascending.
pub fn expand(entries: &[Entry], from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<Entry>> {
    let window = Window::new(from, to)?;
    expand_in(entries, window)
}

/// Same as [`expand`] for an already validated window.
pub fn expand_in(entries: &[Entry], window: Window) -> Result<Vec<Entry>> {
    let mut expanded = Vec::with_capacity(entries.len());
    for entry in entries {
        let before = expanded.len();
        expanded.extend(occurrences(entry, window)?);
        if expanded.len() == before {
            tracing::trace!(entry = %entry, "entry has no occurrence in window");
        }
    }
    tracing::debug!(
        entries = entries.len(),
        occurrences = expanded.len(),
        from = %window.from,
        to = %window.to,
        "expanded entries"
    );
    Ok(expanded)
}

/// Lazily yields the occurrences of a single entry inside `window`.
///
/// Fails when a repeating entry carries an invalid rule.
pub fn occurrences(entry: &Entry, window: Window) -> Result<Occurrences<'_>> {
    entry.validate()?;
    let Some(unit) = entry.recurrence().unit() else {
        return Ok(Occurrences {
            template: entry,
            unit: None,
            step: 0,
            next_index: window.contains(entry.start_time()).then_some(0),
            first_index: 0,
            end_anchor: None,
            end: window.to,
        });
    };
    let step = u32::try_from(entry.interval())
        .map_err(|_| BudgetError::invalid(format!("invalid interval {}", entry.interval())))?;
    let end = match entry.recurrence_end() {
        Some(limit) if limit < window.to => limit,
        _ => window.to,
    };
    let next_index = first_index(entry, unit, step, window, end);
    let first = next_index.unwrap_or(0);
    Ok(Occurrences {
        template: entry,
        unit: Some(unit),
        step,
        next_index,
        first_index: first,
        end_anchor: end_anchor(entry, unit, step, first),
        end,
    })
}

/// Index `k` of the first occurrence `start + k * step` that can land in the window.
///
/// A template already running when the window opens resumes at the first step
/// strictly after `from`.
fn first_index(
    template: &Entry,
    unit: RecurrenceUnit,
    step: u32,
    window: Window,
    end: NaiveDateTime,
) -> Option<u32> {
    let start = template.start_time();
    if window.contains(start) {
        return Some(0);
    }
    // The template starts after the window, or its recurrence stops before it.
    if start > window.from || !window.contains(end) {
        return None;
    }

    let whole_steps = unit.units_between(start, window.from).max(0) / i64::from(step);
    let mut index = u32::try_from(whole_steps).ok()?;
    // Month index differences can round in either direction around month ends, so
    // settle on the earliest step after `from`.
    while index > 0 && unit.advance(start, (index - 1).checked_mul(step)?)? > window.from {
        index -= 1;
    }
    loop {
        let candidate = unit.advance(start, index.checked_mul(step)?)?;
        if candidate > window.from {
            return window.contains(candidate).then_some(index);
        }
        index = index.checked_add(1)?;
    }
}

/// End time of the occurrence at `first`, which later occurrences step from.
///
/// The template's end moves by the same elapsed duration as its start did.
fn end_anchor(
    template: &Entry,
    unit: RecurrenceUnit,
    step: u32,
    first: u32,
) -> Option<NaiveDateTime> {
    let end = template.end_time()?;
    let start = template.start_time();
    let resumed = unit.advance(start, first.checked_mul(step)?)?;
    Some(end + (resumed - start))
}

/// Iterator over the one-off occurrences of one entry within a window.
///
/// Every call to [`occurrences`] starts a fresh, finite sequence.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    template: &'a Entry,
    unit: Option<RecurrenceUnit>,
    step: u32,
    next_index: Option<u32>,
    first_index: u32,
    end_anchor: Option<NaiveDateTime>,
    end: NaiveDateTime,
}

impl Iterator for Occurrences<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        let index = self.next_index.take()?;
        let Some(unit) = self.unit else {
            return Some(self.template.clone());
        };
        let start = unit.advance(self.template.start_time(), index.checked_mul(self.step)?)?;
        if start > self.end {
            return None;
        }
        // Ends step by calendar units too, so a month-long span stays month-long.
        let end_time = match self.end_anchor {
            Some(anchor) => {
                let steps = (index - self.first_index).checked_mul(self.step)?;
                Some(unit.advance(anchor, steps)?)
            }
            None => None,
        };
        self.next_index = index.checked_add(1);
        Some(self.template.occurrence_at(start, end_time))
    }
}

/// Total order of entries by start time.
pub fn by_start_time(a: &Entry, b: &Entry) -> Ordering {
    a.start_time().cmp(&b.start_time())
}

/// Sorts occurrences chronologically, keeping the relative order of ties.
pub fn sort_by_start_time(entries: &mut [Entry]) {
    entries.sort_by(by_start_time);
}
