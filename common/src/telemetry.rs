// Telemetry module for structured logging, metrics, and tracing

use crate::schedule::{CRON_SCHEDULE_KIND, SIMPLE_SCHEDULE_KIND};
use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::{
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const SERVICE_NAME: &str = "trigger-registrar";

/// Registration outcome label values
pub const OUTCOME_REGISTERED: &str = "registered";
pub const OUTCOME_VALIDATION_FAILED: &str = "validation_failed";
pub const OUTCOME_FAILED: &str = "failed";

/// Initialize structured logging with JSON formatting and trace context
///
/// Log levels come from `RUST_LOG` when set, otherwise from `log_level`.
/// When `tracing_endpoint` is given, spans are also exported over OTLP.
pub fn init_logging(log_level: &str, tracing_endpoint: Option<&str>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    let registry = tracing_subscriber::registry().with(json_layer);

    if let Some(endpoint) = tracing_endpoint {
        let tracer = init_tracer(endpoint)?;
        let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);
        registry
            .with(telemetry_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;
    } else {
        registry
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;
    }

    tracing::info!(
        log_level = log_level,
        tracing_endpoint = tracing_endpoint,
        "Structured logging initialized"
    );

    Ok(())
}

/// Initialize OpenTelemetry tracer with OTLP exporter
fn init_tracer(endpoint: &str) -> Result<opentelemetry_sdk::trace::Tracer> {
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::runtime::Tokio;

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint)
        .build_span_exporter()
        .map_err(|e| anyhow::anyhow!("Failed to build span exporter: {}", e))?;

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(exporter, Tokio)
        .with_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(Resource::new(vec![
                    KeyValue::new("service.name", SERVICE_NAME),
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                ])),
        )
        .build();

    global::set_tracer_provider(tracer_provider.clone());
    let tracer = tracer_provider.tracer(SERVICE_NAME);

    tracing::info!(endpoint = endpoint, "OpenTelemetry tracer initialized");

    Ok(tracer)
}

/// Shutdown OpenTelemetry tracer provider, flushing remaining spans
pub fn shutdown_tracer() {
    global::shutdown_tracer_provider();
}

/// Install the Prometheus exporter and describe registration metrics
pub fn init_metrics(metrics_port: u16) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", metrics_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid metrics port: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    describe_counter!(
        "trigger_registrations_total",
        "Trigger registration attempts by outcome"
    );
    describe_counter!(
        "job_data_conversion_errors_total",
        "Job data items rejected during conversion"
    );
    describe_histogram!(
        "trigger_registration_duration_seconds",
        "Time spent handling a trigger registration"
    );

    tracing::info!(metrics_port = metrics_port, "Prometheus metrics exporter initialized");

    Ok(())
}

/// Label value for schedule kinds that are not built-in
pub const SCHEDULE_KIND_UNSUPPORTED: &str = "unsupported";

/// Map a client-supplied schedule kind onto a bounded label value
pub fn schedule_kind_label(schedule_kind: &str) -> &'static str {
    match schedule_kind {
        SIMPLE_SCHEDULE_KIND => SIMPLE_SCHEDULE_KIND,
        CRON_SCHEDULE_KIND => CRON_SCHEDULE_KIND,
        _ => SCHEDULE_KIND_UNSUPPORTED,
    }
}

/// Record the outcome and duration of one registration attempt
#[inline]
pub fn record_registration(outcome: &'static str, schedule_kind: &str, elapsed: Duration) {
    counter!(
        "trigger_registrations_total",
        "outcome" => outcome,
        "schedule_kind" => schedule_kind_label(schedule_kind)
    )
    .increment(1);
    histogram!("trigger_registration_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}

/// Record job data items rejected in one request
#[inline]
pub fn record_conversion_errors(count: usize) {
    counter!("job_data_conversion_errors_total").increment(count as u64);
}
