// Error handling framework

use thiserror::Error;

/// A registered converter rejected a raw job data value.
///
/// The message is surfaced verbatim to the client as the validation error
/// for the offending key, so it should read well on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConversionError(pub String);

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Schedule-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Unsupported schedule kind: {0}")]
    UnsupportedScheduleKind(String),

    #[error("Missing {parameter} for {kind} schedule")]
    MissingParameter { kind: String, parameter: String },

    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("No next fire time available for {schedule_kind} schedule")]
    NoNextFireTime { schedule_kind: String },
}

/// Rejections reported by the scheduler collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Trigger '{group}.{name}' already exists")]
    DuplicateTrigger { name: String, group: String },

    #[error("Job '{group}.{name}' not found")]
    JobNotFound { name: String, group: String },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Scheduler unavailable: {0}")]
    Unavailable(String),
}

impl From<ScheduleError> for SchedulerError {
    fn from(err: ScheduleError) -> Self {
        SchedulerError::InvalidSchedule(err.to_string())
    }
}

/// Failures of a command invocation.
///
/// Per-item job data problems never end up here; they are returned as a
/// validation result instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Scheduler rejected trigger: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Machine-readable failure code and message for transport layers
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        ApiError::new("SCHEDULE_ERROR", err.to_string())
    }
}

fn scheduler_error_code(err: &SchedulerError) -> &'static str {
    match err {
        SchedulerError::DuplicateTrigger { .. } => "CONFLICT",
        SchedulerError::JobNotFound { .. } => "NOT_FOUND",
        SchedulerError::InvalidSchedule(_) => "SCHEDULE_ERROR",
        SchedulerError::Unavailable(_) => "SCHEDULER_UNAVAILABLE",
    }
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        ApiError::new(scheduler_error_code(&err), err.to_string())
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        let code = match &err {
            CommandError::Schedule(_) => "SCHEDULE_ERROR",
            CommandError::Scheduler(e) => scheduler_error_code(e),
        };
        ApiError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_schedule_kind_display() {
        let err = ScheduleError::UnsupportedScheduleKind("Calendar".to_string());
        assert_eq!(err.to_string(), "Unsupported schedule kind: Calendar");
    }

    #[test]
    fn test_conversion_error_is_verbatim() {
        let err = ConversionError::new("not a number");
        assert_eq!(err.to_string(), "not a number");
        assert_eq!(err.message(), "not a number");
    }

    #[test]
    fn test_scheduler_rejection_keeps_reason() {
        let err: CommandError = SchedulerError::DuplicateTrigger {
            name: "nightly".to_string(),
            group: "reports".to_string(),
        }
        .into();
        assert!(err.to_string().contains("'reports.nightly' already exists"));
    }

    #[test]
    fn test_duplicate_trigger_to_api_error() {
        let err = CommandError::Scheduler(SchedulerError::DuplicateTrigger {
            name: "t".to_string(),
            group: "g".to_string(),
        });
        let api_err: ApiError = err.into();
        assert_eq!(api_err.code, "CONFLICT");
    }

    #[test]
    fn test_command_error_keeps_full_message() {
        let err = CommandError::Scheduler(SchedulerError::JobNotFound {
            name: "cleanup".to_string(),
            group: "maintenance".to_string(),
        });
        let message = err.to_string();
        let api_err = ApiError::from(err);
        assert_eq!(api_err.code, "NOT_FOUND");
        assert_eq!(api_err.message, message);
    }
}
