// Property-based tests for trigger schedule building
// Feature: trigger-registration

use common::errors::ScheduleError;
use common::models::{RepeatCount, ScheduleParams, TriggerSchedule};
use common::schedule::build_schedule;
use proptest::prelude::*;
use std::time::Duration;

/// *For any* supplied repeat count, `repeat_forever` yields the forever
/// sentinel and otherwise the count is kept exactly.
#[test]
fn property_simple_repeat_count_mapping() {
    proptest!(|(
        repeat_forever in any::<bool>(),
        repeat_count in any::<u32>(),
        interval_ms in 0u64..86_400_000u64
    )| {
        let params = ScheduleParams::simple(
            repeat_forever,
            repeat_count,
            Duration::from_millis(interval_ms),
        );

        let schedule = build_schedule(&params).unwrap();

        match schedule {
            TriggerSchedule::Simple { repeat_count: built, repeat_interval, initial_delay } => {
                if repeat_forever {
                    prop_assert_eq!(built, RepeatCount::Forever);
                    prop_assert_eq!(built.as_sentinel(), RepeatCount::FOREVER_SENTINEL);
                } else {
                    prop_assert_eq!(built, RepeatCount::Times(repeat_count));
                    prop_assert_eq!(built.as_sentinel(), i64::from(repeat_count));
                }
                prop_assert_eq!(repeat_interval, Duration::from_millis(interval_ms));
                prop_assert_eq!(initial_delay, Duration::ZERO);
            }
            other => prop_assert!(false, "expected simple schedule, got {:?}", other),
        }
    });
}

/// *For any* cron string, the built schedule carries it unchanged.
#[test]
fn property_cron_expression_preserved() {
    proptest!(|(expression in ".{0,40}")| {
        let schedule = build_schedule(&ScheduleParams::cron(expression.clone())).unwrap();
        prop_assert_eq!(schedule, TriggerSchedule::Cron { expression });
    });
}

/// *For any* discriminator other than "Simple" or "Cron", building fails
/// with an unsupported schedule kind.
#[test]
fn property_unknown_kinds_rejected() {
    proptest!(|(kind in "[A-Za-z]{0,12}")| {
        prop_assume!(kind != "Simple" && kind != "Cron");

        let params = ScheduleParams {
            schedule_kind: kind.clone(),
            repeat_forever: true,
            repeat_interval_ms: Some(1000),
            cron_expression: Some("0 0 12 * * ?".to_string()),
            ..ScheduleParams::default()
        };

        prop_assert_eq!(
            build_schedule(&params),
            Err(ScheduleError::UnsupportedScheduleKind(kind))
        );
    });
}
