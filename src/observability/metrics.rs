use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Vendor call metrics
    pub vendor_requests: IntCounterVec,
    pub vendor_failures: IntCounterVec,
    pub vendor_duration: HistogramVec,

    // Token lifecycle
    pub token_fetches: IntCounterVec,
    pub token_cache_hits: IntCounterVec,

    // Plaid institution pre-selection retries
    pub link_token_retries: IntCounter,

    // Connection log
    pub connection_records: IntCounterVec,

    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("finbridge".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Vendor
            vendor_requests: IntCounterVec::new(Opts::new("vendor_requests_total", "Total vendor REST calls"),&["vendor", "operation"],).unwrap(),
            vendor_failures: IntCounterVec::new(Opts::new("vendor_request_failures_total", "Vendor call failures by status"),&["vendor", "operation", "status"],).unwrap(),
            vendor_duration: HistogramVec::new(HistogramOpts::new("vendor_request_duration_seconds", "Vendor call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),&["vendor", "operation"],).unwrap(),

            // Tokens
            token_fetches: IntCounterVec::new(Opts::new("token_fetches_total", "OAuth token requests by scope kind"),&["scope_kind"],).unwrap(),
            token_cache_hits: IntCounterVec::new(Opts::new("token_cache_hits_total", "Token cache hits by scope kind"),&["scope_kind"],).unwrap(),

            link_token_retries: IntCounter::new("link_token_retries_total", "Link token retries without institution").unwrap(),

            connection_records: IntCounterVec::new(Opts::new("connection_records_total", "Connection records appended"),&["provider"],).unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.vendor_requests.clone())).unwrap();
        reg.register(Box::new(metrics.vendor_failures.clone())).unwrap();
        reg.register(Box::new(metrics.vendor_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_fetches.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.link_token_retries.clone())).unwrap();
        reg.register(Box::new(metrics.connection_records.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
