use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Refresh coordination
    pub refresh_requests: IntCounter,
    pub refresh_failures: IntCounterVec,
    pub refresh_superseded: IntCounter,

    // Profile updates
    pub profile_update_requests: IntCounter,
    pub profile_update_failures: IntCounter,

    // Verification sends (swallowed failures still count)
    pub verification_send_failures: IntCounter,

    // Session state
    pub token_expiry_unix: IntGauge,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("sessionagent".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            refresh_requests: IntCounter::new("refresh_requests_total", "Access-token refresh triggers issued").unwrap(),
            refresh_failures: IntCounterVec::new(Opts::new("refresh_failures_total", "Refresh failures by reason"), &["reason"]).unwrap(),
            refresh_superseded: IntCounter::new("refresh_superseded_total", "Refresh results discarded because a newer trigger superseded them").unwrap(),

            profile_update_requests: IntCounter::new("profile_update_requests_total", "Profile update attempts").unwrap(),
            profile_update_failures: IntCounter::new("profile_update_failures_total", "Profile update failures").unwrap(),

            verification_send_failures: IntCounter::new("verification_send_failures_total", "Verification email sends that failed and were swallowed").unwrap(),

            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Current access-token expiry timestamp").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.refresh_requests.clone())).unwrap();
        reg.register(Box::new(metrics.refresh_failures.clone())).unwrap();
        reg.register(Box::new(metrics.refresh_superseded.clone())).unwrap();
        reg.register(Box::new(metrics.profile_update_requests.clone())).unwrap();
        reg.register(Box::new(metrics.profile_update_failures.clone())).unwrap();
        reg.register(Box::new(metrics.verification_send_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
