// Command invocation surface

pub mod add_trigger;

use crate::errors::{ApiError, CommandError};
use crate::models::ValidationErrors;
use serde::{Deserialize, Serialize};

pub use add_trigger::{AddTriggerCommand, AddTriggerOutcome};

/// Transport-neutral rendering of a command result.
///
/// A command that ran but rejected job data still reports `success`; the
/// rejected keys are listed in `validation_errors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<ValidationErrors>,
}

impl CommandOutput {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_code: None,
            error_message: None,
            validation_errors: None,
        }
    }

    pub fn failed(error: ApiError) -> Self {
        Self {
            success: false,
            error_code: Some(error.code),
            error_message: Some(error.message),
            validation_errors: None,
        }
    }

    pub fn invalid(errors: ValidationErrors) -> Self {
        Self {
            validation_errors: Some(errors),
            ..Self::ok()
        }
    }

    pub fn has_validation_errors(&self) -> bool {
        self.validation_errors
            .as_ref()
            .is_some_and(|errors| !errors.is_empty())
    }
}

impl From<Result<AddTriggerOutcome, CommandError>> for CommandOutput {
    fn from(result: Result<AddTriggerOutcome, CommandError>) -> Self {
        match result {
            Ok(AddTriggerOutcome::Registered) => CommandOutput::ok(),
            Ok(AddTriggerOutcome::ValidationFailed(errors)) => CommandOutput::invalid(errors),
            Err(e) => CommandOutput::failed(e.into()),
        }
    }
}
