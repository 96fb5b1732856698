use std::sync::Arc;

use axum::routing::get;
use axum::{extract::State, response::IntoResponse, Router};
use http::{header::CONTENT_TYPE, StatusCode};
use prometheus::{Encoder, Registry, TextEncoder};

use crate::config::settings::MetricsConfig;

#[derive(Clone)]
pub struct MetricsState {
    pub registry: Arc<Registry>,
}

impl MetricsState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

pub fn router(metrics_config: &MetricsConfig, state: MetricsState) -> Router {
    let mut router = Router::new();
    if metrics_config.is_enabled {
        router = router.route(metrics_config.path.as_str(), get(serve_metrics));
    }
    router.with_state(state)
}

async fn serve_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "encode failed").into_response();
    }
    (
        StatusCode::OK,
        [(CONTENT_TYPE, encoder.format_type().to_owned())],
        buffer,
    )
        .into_response()
}
