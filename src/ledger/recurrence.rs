//! Recurrence kinds and the calendar arithmetic used to step a template forward.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Interval stored on entries that do not repeat.
pub const ONCE_INTERVAL: i32 = -1;

/// How often an entry repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RecurrenceKind {
    #[default]
    Once,
    Daily,
    Monthly,
}

/// Calendar granularity of a repeating entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceUnit {
    Day,
    Month,
}

impl RecurrenceKind {
    pub fn is_repeating(self) -> bool {
        !matches!(self, RecurrenceKind::Once)
    }

    /// Returns the stepping unit, or `None` for one-off entries.
    pub fn unit(self) -> Option<RecurrenceUnit> {
        match self {
            RecurrenceKind::Once => None,
            RecurrenceKind::Daily => Some(RecurrenceUnit::Day),
            RecurrenceKind::Monthly => Some(RecurrenceUnit::Month),
        }
    }

    /// Compact code used by row-oriented stores.
    pub fn storage_code(self) -> Option<&'static str> {
        match self {
            RecurrenceKind::Once => None,
            RecurrenceKind::Daily => Some("D"),
            RecurrenceKind::Monthly => Some("M"),
        }
    }

    /// Inverse of [`RecurrenceKind::storage_code`]. Unknown codes decode as daily.
    pub fn from_storage_code(code: Option<&str>) -> Self {
        match code {
            None => RecurrenceKind::Once,
            Some(code) if code.eq_ignore_ascii_case("M") => RecurrenceKind::Monthly,
            Some(_) => RecurrenceKind::Daily,
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecurrenceKind::Once => "Once",
            RecurrenceKind::Daily => "Daily",
            RecurrenceKind::Monthly => "Monthly",
        };
        f.write_str(label)
    }
}

impl RecurrenceUnit {
    /// Moves `anchor` forward by `count` units. Month steps keep the day of month and
    /// clamp to the last day when the target month is shorter.
    ///
    /// Returns `None` when the result falls outside chrono's supported range.
    pub fn advance(self, anchor: NaiveDateTime, count: u32) -> Option<NaiveDateTime> {
        match self {
            RecurrenceUnit::Day => anchor.checked_add_days(Days::new(u64::from(count))),
            RecurrenceUnit::Month => anchor.checked_add_months(Months::new(count)),
        }
    }

    /// Number of whole unit boundaries between `earlier` and `later`.
    ///
    /// Days count elapsed 24h periods; months compare calendar month indices, so the
    /// result may overshoot by one when `later`'s day of month is before `earlier`'s.
    pub fn units_between(self, earlier: NaiveDateTime, later: NaiveDateTime) -> i64 {
        match self {
            RecurrenceUnit::Day => (later - earlier).num_days(),
            RecurrenceUnit::Month => month_index(later) - month_index(earlier),
        }
    }
}

fn month_index(date: NaiveDateTime) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn month_steps_clamp_to_month_end() {
        let jan_31 = at(2024, 1, 31);
        assert_eq!(RecurrenceUnit::Month.advance(jan_31, 1), Some(at(2024, 2, 29)));
        assert_eq!(RecurrenceUnit::Month.advance(jan_31, 2), Some(at(2024, 3, 31)));
        assert_eq!(RecurrenceUnit::Month.advance(jan_31, 3), Some(at(2024, 4, 30)));
    }

    #[test]
    fn day_steps_cross_month_boundaries() {
        assert_eq!(
            RecurrenceUnit::Day.advance(at(2024, 2, 27), 3),
            Some(at(2024, 3, 1))
        );
    }

    #[test]
    fn units_between_uses_calendar_months() {
        assert_eq!(
            RecurrenceUnit::Month.units_between(at(2023, 11, 30), at(2024, 2, 1)),
            3
        );
        assert_eq!(
            RecurrenceUnit::Day.units_between(at(2024, 1, 1), at(2024, 1, 10)),
            9
        );
    }

    #[test]
    fn storage_codes_round_trip() {
        for kind in [
            RecurrenceKind::Once,
            RecurrenceKind::Daily,
            RecurrenceKind::Monthly,
        ] {
            assert_eq!(RecurrenceKind::from_storage_code(kind.storage_code()), kind);
        }
        assert_eq!(
            RecurrenceKind::from_storage_code(Some("x")),
            RecurrenceKind::Daily
        );
    }
}
