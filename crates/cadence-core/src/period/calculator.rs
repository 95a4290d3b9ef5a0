//! Period boundary arithmetic.
//!
//! Every boundary is normalized to midnight. Month boundaries snap to the
//! first day of the target month and year boundaries to January 1, so a
//! monthly task restarts on the 1st regardless of the original day of month.
//! Weekly boundaries are not re-anchored to a weekday.
//!
//! Calendar days are UTC days.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::recurrence::RecurrenceUnit;

/// Start of the period that follows the one containing `from`.
///
/// The result is strictly after `from`. A frequency of 0 is treated as 1.
/// Dates past chrono's representable range saturate to
/// [`DateTime::<Utc>::MAX_UTC`].
pub fn next_period_start(
    unit: RecurrenceUnit,
    frequency: u32,
    from: DateTime<Utc>,
) -> DateTime<Utc> {
    let frequency = frequency.max(1);
    let date = from.date_naive();

    let next = match unit {
        RecurrenceUnit::Day => date.checked_add_days(Days::new(u64::from(frequency))),
        RecurrenceUnit::Week => date.checked_add_days(Days::new(u64::from(frequency) * 7)),
        RecurrenceUnit::Month => date
            .checked_add_months(Months::new(frequency))
            .and_then(|d| d.with_day(1)),
        RecurrenceUnit::Year => i32::try_from(frequency)
            .ok()
            .and_then(|n| date.year().checked_add(n))
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
    };

    next.map(midnight).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Last instant (one second before the next boundary) of a window starting at `start`.
pub fn window_end(unit: RecurrenceUnit, frequency: u32, start: DateTime<Utc>) -> DateTime<Utc> {
    next_period_start(unit, frequency, start) - chrono::Duration::seconds(1)
}

/// Midnight at the start of the calendar day containing `at`.
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    midnight(at.date_naive())
}

/// Start of the window that contains `at` for a schedule anchored at `anchor`.
///
/// The anchor is floored to its unit (midnight, the 1st of the month or
/// January 1) and stepped forward boundary by boundary, so a weekly task
/// anchored on a Monday keeps Monday windows. An anchor after `at` yields the
/// floor of `at` itself.
pub fn window_start_at(
    unit: RecurrenceUnit,
    frequency: u32,
    anchor: DateTime<Utc>,
    at: DateTime<Utc>,
) -> DateTime<Utc> {
    let mut start = unit_floor(unit, anchor);
    if start > at {
        return unit_floor(unit, at);
    }
    loop {
        let next = next_period_start(unit, frequency, start);
        if next > at || next == DateTime::<Utc>::MAX_UTC {
            return start;
        }
        start = next;
    }
}

/// Whether two instants fall on the same calendar day.
pub fn is_same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

fn unit_floor(unit: RecurrenceUnit, at: DateTime<Utc>) -> DateTime<Utc> {
    let date = at.date_naive();
    let floored = match unit {
        RecurrenceUnit::Day | RecurrenceUnit::Week => return start_of_day(at),
        RecurrenceUnit::Month => date.with_day(1),
        RecurrenceUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
    };
    floored.map(midnight).unwrap_or_else(|| start_of_day(at))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
