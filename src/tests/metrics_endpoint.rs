#[cfg(test)]
mod tests {
    use serial_test::serial;

    use crate::config::settings::MetricsConfig;
    use crate::observability::metrics::get_metrics;
    use crate::observability::routes::{router, MetricsState};
    use crate::tests::common::{build_reqwest_client, spawn_axum};

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[serial]
    async fn metrics_route_exposes_refresh_counters() {
        let metrics = get_metrics().await;
        metrics.refresh_requests.inc();

        let cfg = MetricsConfig {
            path: "/metrics".into(),
            is_enabled: true,
        };
        let app = router(&cfg, MetricsState::new(metrics.registry.clone()));
        let (handle, addr) = spawn_axum(app).await;

        let response = build_reqwest_client()
            .get(format!("http://{addr}/metrics"))
            .send()
            .await
            .expect("metrics request");
        assert!(response.status().is_success());
        let body = response.text().await.unwrap();
        assert!(body.contains("sessionagent_refresh_requests_total"));
        assert!(body.contains("sessionagent_refresh_superseded_total"));

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[serial]
    async fn disabled_metrics_config_serves_nothing() {
        let metrics = get_metrics().await;
        let cfg = MetricsConfig {
            path: "/metrics".into(),
            is_enabled: false,
        };
        let app = router(&cfg, MetricsState::new(metrics.registry.clone()));
        let (handle, addr) = spawn_axum(app).await;

        let response = build_reqwest_client()
            .get(format!("http://{addr}/metrics"))
            .send()
            .await
            .expect("metrics request");
        assert_eq!(response.status().as_u16(), 404);

        handle.abort();
    }
}
