//! OpenTelemetry instruments for the catalog API.
//!
//! Instruments are created lazily on first use. Nothing is exported, and no
//! exporter is built, until a handler records something.

use std::{
    env,
    sync::{
        LazyLock,
        atomic::{AtomicBool, Ordering},
    },
};

use strum_macros::EnumIter;

const SERVICE_NAME: &str = "movie-catalog";
const DEFAULT_ENDPOINT: &str = "http://localhost:4318/v1/metrics";
const DEFAULT_EXPORT_INTERVAL_SECS: u64 = 10;

static ENDPOINT: LazyLock<String> = LazyLock::new(|| {
    env::var("OTEL_EXPORTER_OTLP_METRICS_ENDPOINT").unwrap_or(DEFAULT_ENDPOINT.into())
});

static EXPORT_INTERVAL_SECS: LazyLock<u64> = LazyLock::new(|| {
    env::var("CATALOG_METRICS_INTERVAL_SECS")
        .ok()
        .and_then(|secs| secs.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_EXPORT_INTERVAL_SECS)
});

static STARTED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, EnumIter, Hash, Eq, PartialEq, Clone, Copy)]
pub enum Metrics {
    /// Requests received, tagged with `operation`
    CatalogRequest,
    /// Requests that failed inside the document store
    CatalogStoreFailure,
    /// Requests cancelled before the store answered
    CatalogCancelled,
    /// Movies sent back across all listings
    MoviesReturned,
}

impl Metrics {
    fn metric_name(&self) -> &'static str {
        match self {
            Metrics::CatalogRequest => "catalog.requests",
            Metrics::CatalogStoreFailure => "catalog.store_failures",
            Metrics::CatalogCancelled => "catalog.cancelled",
            Metrics::MoviesReturned => "catalog.movies_returned",
        }
    }
}

/// Flushes pending measurements and stops the exporter. A no-op when no
/// metric was ever recorded.
pub fn shutdown() -> Result<(), String> {
    if !STARTED.load(Ordering::Acquire) {
        return Ok(());
    }

    _private::PROVIDER.shutdown().map_err(|err| err.to_string())
}

pub mod _private {
    pub use opentelemetry::KeyValue;

    use std::{collections::HashMap, sync::LazyLock, sync::atomic::Ordering, time::Duration};

    use opentelemetry::{
        global,
        metrics::{Counter, Histogram, Meter},
    };
    use opentelemetry_otlp::{MetricExporter, Protocol, WithExportConfig};
    use opentelemetry_sdk::{
        Resource,
        metrics::{PeriodicReader, SdkMeterProvider},
    };
    use strum::IntoEnumIterator;

    use crate::{ENDPOINT, EXPORT_INTERVAL_SECS, Metrics, SERVICE_NAME, STARTED};

    static METER: LazyLock<Meter> = LazyLock::new(|| {
        global::set_meter_provider(PROVIDER.clone());
        STARTED.store(true, Ordering::Release);

        global::meter(SERVICE_NAME)
    });

    pub(crate) static PROVIDER: LazyLock<SdkMeterProvider> = LazyLock::new(|| {
        let exporter = MetricExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(ENDPOINT.as_str())
            .build()
            .expect("OTLP metrics exporter to build");

        let reader = PeriodicReader::builder(exporter)
            .with_interval(Duration::from_secs(*EXPORT_INTERVAL_SECS))
            .build();

        SdkMeterProvider::builder()
            .with_reader(reader)
            .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
            .build()
    });

    pub static COUNTERS: LazyLock<HashMap<Metrics, Counter<u64>>> = LazyLock::new(|| {
        Metrics::iter()
            .map(|metric| (metric, METER.u64_counter(metric.metric_name()).build()))
            .collect()
    });

    pub static REQUEST_LATENCY: LazyLock<Histogram<f64>> = LazyLock::new(|| {
        METER
            .f64_histogram("catalog.request_duration")
            .with_unit("ms")
            .with_description("Time spent answering a catalog request")
            .build()
    });
}

/// Adds to a counter, with optional `"key" => value` attributes.
#[macro_export]
macro_rules! put_metric {
    ($metric_name:expr, $added_value:expr $(, $key:literal => $value:expr)* $(,)?) => {{
        use $crate::_private::{KeyValue, COUNTERS};

        let metric_name: $crate::Metrics = $metric_name;
        let added_value: u64 = $added_value;

        let attributes: &[KeyValue] = &[
            $(KeyValue::new($key, $value),)*
        ];

        if let Some(counter) = COUNTERS.get(&metric_name) {
            counter.add(added_value, attributes);
        }
    }};
}

/// Records how long `operation` took, from a `tokio::time::Instant` or
/// `std::time::Instant` taken when the request arrived.
#[macro_export]
macro_rules! put_latency {
    ($operation:expr, $start_time:expr) => {{
        use $crate::_private::{KeyValue, REQUEST_LATENCY};

        let elapsed_ms = $start_time.elapsed().as_secs_f64() * 1000.0;

        REQUEST_LATENCY.record(elapsed_ms, &[KeyValue::new("operation", $operation)]);
    }};
}
