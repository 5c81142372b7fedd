// In-process scheduler used by tests and embedders without a job store

use crate::errors::SchedulerError;
use crate::models::{JobKey, RepeatCount, TriggerKey, TriggerRegistration, TriggerSchedule};
use crate::schedule::{parse_cron_expression, ScheduleTrigger};
use crate::scheduler::TriggerScheduler;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// A trigger accepted by the in-memory scheduler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredTrigger {
    pub registration: TriggerRegistration,
    pub registered_at: DateTime<Utc>,
    pub next_fire_time: Option<DateTime<Utc>>,
}

/// Scheduler that keeps jobs and triggers in memory
#[derive(Debug, Default)]
pub struct InMemoryScheduler {
    jobs: RwLock<HashSet<JobKey>>,
    triggers: RwLock<HashMap<TriggerKey, RegisteredTrigger>>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler that already knows the given jobs
    pub fn with_jobs(jobs: impl IntoIterator<Item = JobKey>) -> Self {
        Self {
            jobs: RwLock::new(jobs.into_iter().collect()),
            triggers: RwLock::default(),
        }
    }

    pub async fn add_job(&self, job: JobKey) {
        self.jobs.write().await.insert(job);
    }

    pub async fn trigger(&self, key: &TriggerKey) -> Option<RegisteredTrigger> {
        self.triggers.read().await.get(key).cloned()
    }

    pub async fn registered_triggers(&self) -> Vec<RegisteredTrigger> {
        self.triggers.read().await.values().cloned().collect()
    }

    pub async fn trigger_count(&self) -> usize {
        self.triggers.read().await.len()
    }

    fn validate_schedule(schedule: &TriggerSchedule) -> Result<(), SchedulerError> {
        match schedule {
            TriggerSchedule::Simple {
                repeat_count,
                repeat_interval,
                ..
            } => {
                let repeats = !matches!(repeat_count, RepeatCount::Times(0));
                if repeats && repeat_interval.is_zero() {
                    return Err(SchedulerError::InvalidSchedule(
                        "Repeat interval must be greater than zero for repeating triggers"
                            .to_string(),
                    ));
                }
                Ok(())
            }
            TriggerSchedule::Cron { expression } => {
                parse_cron_expression(expression)?;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl TriggerScheduler for InMemoryScheduler {
    #[instrument(skip(self, registration), fields(
        job = %registration.job,
        trigger = %registration.trigger,
        schedule_kind = registration.schedule.kind()
    ))]
    async fn trigger_job(&self, registration: TriggerRegistration) -> Result<(), SchedulerError> {
        if !self.jobs.read().await.contains(&registration.job) {
            warn!("Trigger references an unknown job");
            return Err(SchedulerError::JobNotFound {
                name: registration.job.name.clone(),
                group: registration.job.group.clone(),
            });
        }

        Self::validate_schedule(&registration.schedule)?;

        let registered_at = Utc::now();
        let next_fire_time = registration.schedule.first_fire_time(registered_at)?;

        let mut triggers = self.triggers.write().await;
        if triggers.contains_key(&registration.trigger) {
            warn!("Trigger already exists");
            return Err(SchedulerError::DuplicateTrigger {
                name: registration.trigger.name.clone(),
                group: registration.trigger.group.clone(),
            });
        }

        info!(next_fire_time = ?next_fire_time, "Trigger stored");
        triggers.insert(
            registration.trigger.clone(),
            RegisteredTrigger {
                registration,
                registered_at,
                next_fire_time,
            },
        );

        Ok(())
    }
}
