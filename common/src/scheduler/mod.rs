// Scheduler collaborator boundary

pub mod memory;

use crate::errors::SchedulerError;
use crate::models::TriggerRegistration;
use async_trait::async_trait;

pub use memory::{InMemoryScheduler, RegisteredTrigger};

/// The scheduler engine that owns triggers once they are registered.
///
/// Implementations reject a trigger whose (name, group) already exists.
/// Callers do not retry a failed registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriggerScheduler: Send + Sync {
    /// Register a new trigger for an existing job
    async fn trigger_job(&self, registration: TriggerRegistration) -> Result<(), SchedulerError>;
}
