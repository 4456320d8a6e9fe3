//! Telemetry adapters - Observability hooks backed by `tracing`.

mod tracing_failure_sink;

pub use tracing_failure_sink::TracingFailureSink;
