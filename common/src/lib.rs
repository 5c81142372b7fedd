// Trigger registration layer in front of the job scheduler

pub mod command;
pub mod config;
pub mod errors;
pub mod input_types;
pub mod job_data;
pub mod models;
pub mod schedule;
pub mod scheduler;
pub mod telemetry;
