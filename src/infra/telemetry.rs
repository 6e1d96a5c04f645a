use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::compiler::METRIC_COMPILE_MS;
use crate::application::content::{
    METRIC_CACHE_HIT, METRIC_CACHE_MISS, METRIC_CACHE_WRITE_FAILURE, METRIC_SHAPE_MISMATCH,
    METRIC_STALE_SERVED,
};
use crate::application::invalidation::METRIC_INVALIDATION_FAILURE;
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Registers descriptions for every metric the service emits. Safe to call
/// more than once.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_CACHE_HIT,
            Unit::Count,
            "Fetches served from a cached document in the current shape."
        );
        describe_counter!(
            METRIC_CACHE_MISS,
            Unit::Count,
            "Fetches that found no cached document for the slug."
        );
        describe_counter!(
            METRIC_SHAPE_MISMATCH,
            Unit::Count,
            "Cached documents in an outdated shape that were recompiled."
        );
        describe_counter!(
            METRIC_CACHE_WRITE_FAILURE,
            Unit::Count,
            "Compiled documents that could not be written to the cache."
        );
        describe_counter!(
            METRIC_STALE_SERVED,
            Unit::Count,
            "Fetches answered with an upgraded cached document after a failed compile."
        );
        describe_counter!(
            METRIC_INVALIDATION_FAILURE,
            Unit::Count,
            "Section writes whose follow-up recompile failed."
        );
        describe_histogram!(
            METRIC_COMPILE_MS,
            Unit::Milliseconds,
            "Content compile latency in milliseconds, source reads included."
        );
    });
}
