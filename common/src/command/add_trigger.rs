// Add-trigger command: validate job data, build the schedule, hand off to the scheduler

use crate::errors::CommandError;
use crate::input_types::InputTypeRegistry;
use crate::job_data::convert_optional_job_data;
use crate::models::{AddTriggerRequest, TriggerRegistration, ValidationErrors};
use crate::schedule::build_schedule;
use crate::scheduler::TriggerScheduler;
use crate::telemetry;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Successful command results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTriggerOutcome {
    /// The scheduler accepted the trigger
    Registered,
    /// Job data was rejected; the scheduler was not called
    ValidationFailed(ValidationErrors),
}

/// Registers a trigger for an existing job.
///
/// Holds no per-request state, so one instance serves concurrent requests.
pub struct AddTriggerCommand {
    registry: Arc<InputTypeRegistry>,
    scheduler: Arc<dyn TriggerScheduler>,
}

impl AddTriggerCommand {
    pub fn new(registry: Arc<InputTypeRegistry>, scheduler: Arc<dyn TriggerScheduler>) -> Self {
        Self {
            registry,
            scheduler,
        }
    }

    pub fn registry(&self) -> &InputTypeRegistry {
        &self.registry
    }

    /// Run the command.
    ///
    /// Job data errors come back as `AddTriggerOutcome::ValidationFailed`.
    /// Unsupported schedule kinds and scheduler rejections are `Err`.
    #[instrument(skip(self, request), fields(
        job = %request.job_key(),
        trigger = %request.trigger_key(),
        schedule_kind = %request.schedule.schedule_kind
    ))]
    pub async fn execute(
        &self,
        request: AddTriggerRequest,
    ) -> Result<AddTriggerOutcome, CommandError> {
        let started = Instant::now();
        let schedule_kind = request.schedule.schedule_kind.clone();

        let result = self.register(request).await;

        let outcome = match &result {
            Ok(AddTriggerOutcome::Registered) => telemetry::OUTCOME_REGISTERED,
            Ok(AddTriggerOutcome::ValidationFailed(_)) => telemetry::OUTCOME_VALIDATION_FAILED,
            Err(_) => telemetry::OUTCOME_FAILED,
        };
        telemetry::record_registration(outcome, &schedule_kind, started.elapsed());

        result
    }

    async fn register(
        &self,
        request: AddTriggerRequest,
    ) -> Result<AddTriggerOutcome, CommandError> {
        let data = match convert_optional_job_data(&self.registry, request.data_items.as_deref())
        {
            Ok(data) => data,
            Err(errors) => {
                warn!(error_count = errors.len(), "Job data validation failed");
                telemetry::record_conversion_errors(errors.len());
                return Ok(AddTriggerOutcome::ValidationFailed(errors));
            }
        };

        let schedule = build_schedule(&request.schedule).map_err(|e| {
            error!(error = %e, "Failed to build trigger schedule");
            e
        })?;

        let registration = TriggerRegistration {
            job: request.job_key(),
            trigger: request.trigger_key(),
            schedule,
            data,
        };

        self.scheduler
            .trigger_job(registration)
            .await
            .map_err(|e| {
                error!(error = %e, "Scheduler rejected trigger");
                e
            })?;

        info!("Trigger registered");
        Ok(AddTriggerOutcome::Registered)
    }
}
