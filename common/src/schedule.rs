// Schedule building and fire time calculation
//
// Turns a client schedule discriminator plus parameters into a
// TriggerSchedule, and computes when a registered schedule first fires.

use crate::errors::ScheduleError;
use crate::models::{RepeatCount, ScheduleParams, TriggerSchedule};
use chrono::{DateTime, Utc};
use cron::Schedule as CronSchedule;
use std::str::FromStr;
use std::time::Duration;

pub const SIMPLE_SCHEDULE_KIND: &str = "Simple";
pub const CRON_SCHEDULE_KIND: &str = "Cron";

/// Build the schedule variant selected by `params.schedule_kind`.
///
/// Cron syntax is not checked here; that is left to the scheduler.
pub fn build_schedule(params: &ScheduleParams) -> Result<TriggerSchedule, ScheduleError> {
    match params.schedule_kind.as_str() {
        SIMPLE_SCHEDULE_KIND => build_simple_schedule(params),
        CRON_SCHEDULE_KIND => build_cron_schedule(params),
        other => Err(ScheduleError::UnsupportedScheduleKind(other.to_string())),
    }
}

fn build_simple_schedule(params: &ScheduleParams) -> Result<TriggerSchedule, ScheduleError> {
    let repeat_count = if params.repeat_forever {
        RepeatCount::Forever
    } else {
        params
            .repeat_count
            .map(RepeatCount::Times)
            .ok_or_else(|| missing(SIMPLE_SCHEDULE_KIND, "repeat_count"))?
    };

    let repeat_interval = params
        .repeat_interval_ms
        .map(Duration::from_millis)
        .ok_or_else(|| missing(SIMPLE_SCHEDULE_KIND, "repeat_interval_ms"))?;

    Ok(TriggerSchedule::Simple {
        repeat_count,
        repeat_interval,
        // TODO: accept a client-supplied initial delay once the request carries one
        initial_delay: Duration::ZERO,
    })
}

fn build_cron_schedule(params: &ScheduleParams) -> Result<TriggerSchedule, ScheduleError> {
    let expression = params
        .cron_expression
        .clone()
        .ok_or_else(|| missing(CRON_SCHEDULE_KIND, "cron_expression"))?;

    Ok(TriggerSchedule::Cron { expression })
}

fn missing(kind: &str, parameter: &str) -> ScheduleError {
    ScheduleError::MissingParameter {
        kind: kind.to_string(),
        parameter: parameter.to_string(),
    }
}

/// Parse and validate a cron expression (Quartz syntax, second precision)
pub fn parse_cron_expression(expression: &str) -> Result<CronSchedule, ScheduleError> {
    CronSchedule::from_str(expression).map_err(|e| ScheduleError::InvalidCronExpression {
        expression: expression.to_string(),
        reason: e.to_string(),
    })
}

/// ScheduleTrigger computes when a schedule fires
pub trait ScheduleTrigger {
    /// First fire time for a trigger registered at `registered_at`;
    /// `None` if the schedule never fires
    fn first_fire_time(
        &self,
        registered_at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, ScheduleError>;
}

impl ScheduleTrigger for TriggerSchedule {
    fn first_fire_time(
        &self,
        registered_at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, ScheduleError> {
        match self {
            TriggerSchedule::Simple { initial_delay, .. } => {
                let delay = chrono::Duration::from_std(*initial_delay).map_err(|_| {
                    ScheduleError::NoNextFireTime {
                        schedule_kind: SIMPLE_SCHEDULE_KIND.to_string(),
                    }
                })?;
                Ok(Some(registered_at + delay))
            }

            TriggerSchedule::Cron { expression } => {
                let schedule = parse_cron_expression(expression)?;
                Ok(schedule.after(&registered_at).next())
            }
        }
    }
}
