//! Tracing setup: env filter, pretty or JSON console output, optional OTLP export

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::{GriddyError, Result};

const SERVICE_NAME: &str = "griddy";

/// Flushes and shuts down the span exporter when dropped
#[must_use = "dropping the guard shuts down trace export"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shut down trace exporter: {e}");
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("griddy={level},tower_http={level}")))
}

fn tracer_provider(endpoint: &str) -> Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| GriddyError::config(format!("Invalid OTLP exporter: {e}")))?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
        .build())
}

/// Install the global subscriber. Call once, keep the guard alive for the process.
pub fn init(config: &LoggingConfig) -> Result<TelemetryGuard> {
    let provider = config
        .otlp_endpoint
        .as_deref()
        .map(tracer_provider)
        .transpose()?;

    let otel = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    let (pretty, json) = if config.format == "json" {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(pretty)
        .with(json)
        .with(otel)
        .try_init()
        .map_err(|e| GriddyError::config(format!("Failed to install tracing subscriber: {e}")))?;

    if let Some(endpoint) = &config.otlp_endpoint {
        tracing::info!("Exporting traces to {}", endpoint);
    }

    Ok(TelemetryGuard { provider })
}
