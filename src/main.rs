use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info, warn};

use session_agent::config::loader::load_config;
use session_agent::countdown::ticker::CountdownTicker;
use session_agent::observability::metrics::get_metrics;
use session_agent::observability::routes::{self, MetricsState};
use session_agent::provider::client::{ActiveSession, IdentityClient};
use session_agent::refresh::coordinator::RefreshCoordinator;
use session_agent::session::accessor::SessionAccessor;
use session_agent::store::profile::ProfileStore;
use session_agent::utils::logging::{self, LogLevel};

#[derive(Debug, Parser)]
#[command(name = "session-agent")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, short, env = "SESSION_AGENT_CONFIG", default_value = "config.yaml")]
    config: String,

    /// Override the configured log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load YAML config and install logging
    let cfg = load_config(&args.config)?;
    logging::run(&cfg, args.log_level).await?;

    // 2. Build the provider client and hand it the bootstrap session
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let provider = IdentityClient::new(cfg.provider.clone(), client);
    if let Some(bootstrap) = &cfg.provider.bootstrap {
        provider
            .set_active_session(ActiveSession {
                email: bootstrap.email.clone(),
                email_verified: bootstrap.email_verified,
                display_name: bootstrap.full_name.clone(),
                refresh_token: bootstrap.refresh_token.clone(),
            })
            .await;
    }

    // 3. Seed the profile store from the active session
    let accessor = SessionAccessor::new(provider.clone());
    let store = ProfileStore::new();
    match accessor.fetch_current_session().await? {
        Some(user) => store.sign_in(user),
        None => warn!("no active session configured; refresh triggers will be no-ops"),
    }
    accessor.send_email_verification().await;

    // 4. Spawn the refresh coordinator and trigger an initial refresh
    let coordinator = RefreshCoordinator::spawn(Arc::new(accessor), store.clone());
    coordinator.request_refresh_access_token();

    // 5. Countdown ticker, logged at debug cadence
    let offset_minutes = cfg.settings.countdown_utc_offset_minutes.unwrap_or(0);
    let tz = FixedOffset::east_opt(offset_minutes * 60)
        .ok_or_else(|| anyhow!("invalid countdown_utc_offset_minutes: {offset_minutes}"))?;
    let ticker = CountdownTicker::spawn(&store, tz);
    tokio::spawn({
        let mut line = ticker.subscribe();
        async move {
            while line.changed().await.is_ok() {
                let rendered = line.borrow().clone();
                if !rendered.is_empty() {
                    debug!("{rendered}");
                }
            }
        }
    });

    // 6. Metrics endpoint
    let metrics = get_metrics().await;
    metrics.up.set(1);
    if cfg.settings.metrics.is_enabled {
        let router = routes::router(
            &cfg.settings.metrics,
            MetricsState::new(metrics.registry.clone()),
        );
        let addr = format!("{}:{}", cfg.settings.server.host, cfg.settings.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("metrics endpoint listening on {addr}");
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router).await {
                warn!("metrics endpoint failed: {err}");
            }
        });
    }

    info!("session agent running; SIGHUP re-triggers an access-token refresh");

    // 7. SIGHUP re-triggers a refresh; ctrl-c signs out and exits
    let mut hangup = signal(SignalKind::hangup())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = hangup.recv() => {
                info!("SIGHUP received, re-triggering access-token refresh");
                coordinator.request_refresh_access_token();
            }
        }
    }

    store.sign_out();
    provider.clear_active_session().await;
    drop(ticker);
    info!("session agent stopped");
    Ok(())
}
