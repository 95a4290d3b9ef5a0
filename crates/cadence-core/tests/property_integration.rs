//! Property tests for boundary math, bucket partitioning and streak bounds.

use cadence_core::{
    next_period_start, Availability, AvailabilityResolver, Entry, Period, RecurrenceSpec,
    RecurrenceUnit, RecurringTask, StreakCalculator,
};
use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use proptest::prelude::*;

fn unit_strategy() -> impl Strategy<Value = RecurrenceUnit> {
    prop_oneof![
        Just(RecurrenceUnit::Day),
        Just(RecurrenceUnit::Week),
        Just(RecurrenceUnit::Month),
        Just(RecurrenceUnit::Year),
    ]
}

/// Instants between 2000-01-01 and roughly 2060.
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..1_900_000_000).prop_map(|secs| {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    })
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

proptest! {
    #[test]
    fn next_start_is_strictly_after_and_normalized(
        unit in unit_strategy(),
        frequency in 1u32..=60,
        from in instant_strategy(),
    ) {
        let next = next_period_start(unit, frequency, from);
        prop_assert!(next > from);
        prop_assert_eq!(next.hour(), 0);
        prop_assert_eq!(next.minute(), 0);
        prop_assert_eq!(next.second(), 0);
        match unit {
            RecurrenceUnit::Month => prop_assert_eq!(next.day(), 1),
            RecurrenceUnit::Year => {
                prop_assert_eq!(next.day(), 1);
                prop_assert_eq!(next.month(), 1);
            }
            _ => {}
        }
    }

    #[test]
    fn classification_is_deterministic_and_single_bucket(
        unit in unit_strategy(),
        frequency in 1u32..=5,
        start_offset_hours in 0i64..24 * 60,
        now_offset_hours in 0i64..24 * 90,
        has_period in any::<bool>(),
        is_completed in any::<bool>(),
        has_end in any::<bool>(),
    ) {
        let task = RecurringTask::new(
            "u1",
            "t",
            RecurrenceSpec::new(unit, frequency).unwrap(),
            base(),
        )
        .with_id("t");
        let start = base() + Duration::hours(start_offset_hours);
        let period = Period {
            id: "p".into(),
            task_id: "t".into(),
            unit,
            start_date: start,
            end_date: has_end.then(|| next_period_start(unit, frequency, start)),
            is_completed,
            is_active: true,
            count: 0,
            target: None,
            created_at: start,
            updated_at: start,
        };
        let now = base() + Duration::hours(now_offset_hours);
        let active = has_period.then_some(&period);

        let resolver = AvailabilityResolver::new();
        let first = resolver.classify(&task, active, now);
        let second = resolver.classify(&task, active, now);
        prop_assert_eq!(first, second);

        let report = resolver.resolve([(&task, active)], now);
        let buckets = report.available.len() + report.completed_today.len() + report.dormant.len();
        prop_assert_eq!(buckets, 1);
        prop_assert_eq!(report.total_count, 1);

        if let Availability::CompletedToday { next_available_at } = first {
            prop_assert!(next_available_at > now);
        }
    }

    #[test]
    fn longest_streak_never_below_current(activity in proptest::collection::vec(any::<bool>(), 0..40)) {
        let task = RecurringTask::new("u1", "t", RecurrenceSpec::daily(), base()).with_id("t");
        let mut periods = Vec::new();
        let mut entries = Vec::new();
        for (i, active) in activity.iter().enumerate() {
            let start = base() + Duration::days(i as i64);
            let id = format!("p{i}");
            periods.push(Period {
                id: id.clone(),
                task_id: "t".into(),
                unit: RecurrenceUnit::Day,
                start_date: start,
                end_date: Some(start + Duration::days(1)),
                is_completed: true,
                is_active: false,
                count: u32::from(*active),
                target: None,
                created_at: start,
                updated_at: start,
            });
            if *active {
                entries.push(Entry {
                    id: format!("e{i}"),
                    period_id: id,
                    timestamp: start + Duration::hours(8),
                    note: None,
                });
            }
        }

        let now = base() + Duration::days(activity.len() as i64);
        let info = StreakCalculator::new().calculate(&task, &periods, &entries, now);
        prop_assert!(info.longest_streak >= info.current_streak);

        let trailing = activity.iter().rev().take_while(|a| **a).count() as u32;
        prop_assert_eq!(info.current_streak, trailing);
    }
}
