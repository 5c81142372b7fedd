use crate::schedule::{CRON_SCHEDULE_KIND, SIMPLE_SCHEDULE_KIND};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Keys
// ============================================================================

/// Identifies a job in the scheduler by name and group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobKey {
    pub name: String,
    pub group: String,
}

impl JobKey {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// Identifies a trigger in the scheduler by name and group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerKey {
    pub name: String,
    pub group: String,
}

impl TriggerKey {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

// ============================================================================
// Job Data
// ============================================================================

/// One client-supplied entry of a job data map, still in raw form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDataItem {
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
    pub input_type_code: String,
}

impl JobDataItem {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
        input_type_code: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            input_type_code: input_type_code.into(),
        }
    }
}

/// A job data value after conversion by its input type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobDataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    /// Value handed through without conversion
    Raw(serde_json::Value),
}

/// Converted job data, keyed by item key
pub type JobDataMap = HashMap<String, JobDataValue>;

/// Per-key validation messages for job data items that failed
pub type ValidationErrors = BTreeMap<String, String>;

// ============================================================================
// Trigger Registration Request
// ============================================================================

/// Client request to attach a new trigger to an existing job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTriggerRequest {
    pub job_name: String,
    pub job_group: String,
    pub trigger_name: String,
    pub trigger_group: String,
    #[serde(flatten)]
    pub schedule: ScheduleParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_items: Option<Vec<JobDataItem>>,
}

impl AddTriggerRequest {
    pub fn job_key(&self) -> JobKey {
        JobKey::new(&self.job_name, &self.job_group)
    }

    pub fn trigger_key(&self) -> TriggerKey {
        TriggerKey::new(&self.trigger_name, &self.trigger_group)
    }
}

/// Schedule discriminator and the parameters of every known schedule kind.
///
/// Only the parameters belonging to `schedule_kind` are consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub schedule_kind: String,
    #[serde(default)]
    pub repeat_forever: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
}

impl ScheduleParams {
    pub fn simple(repeat_forever: bool, repeat_count: u32, repeat_interval: Duration) -> Self {
        Self {
            schedule_kind: SIMPLE_SCHEDULE_KIND.to_string(),
            repeat_forever,
            repeat_count: Some(repeat_count),
            repeat_interval_ms: Some(
                u64::try_from(repeat_interval.as_millis()).unwrap_or(u64::MAX),
            ),
            cron_expression: None,
        }
    }

    pub fn cron(expression: impl Into<String>) -> Self {
        Self {
            schedule_kind: CRON_SCHEDULE_KIND.to_string(),
            cron_expression: Some(expression.into()),
            ..Self::default()
        }
    }
}

// ============================================================================
// Trigger Schedule
// ============================================================================

/// How many times a simple trigger repeats after its first firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatCount {
    Forever,
    Times(u32),
}

impl RepeatCount {
    /// Repeat count value schedulers use to mean "repeat indefinitely"
    pub const FOREVER_SENTINEL: i64 = -1;

    pub fn is_forever(&self) -> bool {
        matches!(self, RepeatCount::Forever)
    }

    /// Numeric form, with `Forever` mapped to `FOREVER_SENTINEL`
    pub fn as_sentinel(&self) -> i64 {
        match self {
            RepeatCount::Forever => Self::FOREVER_SENTINEL,
            RepeatCount::Times(count) => i64::from(*count),
        }
    }
}

/// TriggerSchedule defines when a registered trigger fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerSchedule {
    Simple {
        repeat_count: RepeatCount,
        repeat_interval: Duration,
        initial_delay: Duration,
    },
    Cron {
        expression: String,
    },
}

impl TriggerSchedule {
    /// Discriminator this schedule was built from
    pub fn kind(&self) -> &'static str {
        match self {
            TriggerSchedule::Simple { .. } => SIMPLE_SCHEDULE_KIND,
            TriggerSchedule::Cron { .. } => CRON_SCHEDULE_KIND,
        }
    }
}

/// Everything handed to the scheduler for one new trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerRegistration {
    pub job: JobKey,
    pub trigger: TriggerKey,
    pub schedule: TriggerSchedule,
    pub data: Option<JobDataMap>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_deserializes_from_flat_payload() {
        let req: AddTriggerRequest = serde_json::from_value(json!({
            "job_name": "cleanup",
            "job_group": "maintenance",
            "trigger_name": "nightly",
            "trigger_group": "default",
            "schedule_kind": "Cron",
            "cron_expression": "0 0 12 * * ?",
            "data_items": [
                { "key": "x", "value": "42", "input_type_code": "integer" }
            ]
        }))
        .unwrap();

        assert_eq!(req.schedule, ScheduleParams::cron("0 0 12 * * ?"));
        assert_eq!(req.job_key(), JobKey::new("cleanup", "maintenance"));
        assert_eq!(req.trigger_key().to_string(), "default.nightly");
        assert_eq!(
            req.data_items,
            Some(vec![JobDataItem::new("x", "42", "integer")])
        );
    }

    #[test]
    fn test_request_without_data_items() {
        let req: AddTriggerRequest = serde_json::from_value(json!({
            "job_name": "cleanup",
            "job_group": "maintenance",
            "trigger_name": "every-5s",
            "trigger_group": "default",
            "schedule_kind": "Simple",
            "repeat_forever": true,
            "repeat_interval_ms": 5000
        }))
        .unwrap();

        assert!(req.data_items.is_none());
        assert!(req.schedule.repeat_forever);
        assert_eq!(req.schedule.repeat_count, None);
        assert_eq!(req.schedule.repeat_interval_ms, Some(5000));
    }

    #[test]
    fn test_simple_params_saturate_oversized_interval() {
        let params = ScheduleParams::simple(true, 0, Duration::MAX);
        assert_eq!(params.repeat_interval_ms, Some(u64::MAX));

        let params = ScheduleParams::simple(false, 2, Duration::from_secs(90));
        assert_eq!(params.repeat_interval_ms, Some(90_000));
    }

    #[test]
    fn test_repeat_count_sentinel() {
        assert_eq!(RepeatCount::Forever.as_sentinel(), -1);
        assert_eq!(RepeatCount::Times(3).as_sentinel(), 3);
        assert!(RepeatCount::Forever.is_forever());
        assert!(!RepeatCount::Times(0).is_forever());
    }

    #[test]
    fn test_job_data_value_serializes_untagged() {
        let value = serde_json::to_value(JobDataValue::Integer(42)).unwrap();
        assert_eq!(value, json!(42));
        let value = serde_json::to_value(JobDataValue::Raw(json!({"a": 1}))).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }
}
