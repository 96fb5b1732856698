//! Token refresh coordinator.
//!
//! Serializes concurrent refresh triggers to a single authoritative outcome:
//! every trigger captures a sequence number, workers run concurrently, and a
//! worker only mutates the store if its sequence is still the latest issued
//! one. Superseded results are dropped without any user-visible effect. No
//! automatic retry; a failed refresh waits for the next trigger.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::observability::metrics::get_metrics;
use crate::session::accessor::SessionSource;
use crate::session::user::ProfileUpdate;
use crate::store::profile::ProfileStore;
use crate::utils::error::app_error_message;

enum RefreshRequest {
    AccessToken { seq: u64 },
    UserInformation { seq: u64 },
}

pub struct RefreshCoordinator {
    requests: UnboundedSender<RefreshRequest>,
    token_seq: Arc<AtomicU64>,
    info_seq: Arc<AtomicU64>,
    store: ProfileStore,
    dispatcher: JoinHandle<()>,
}

impl RefreshCoordinator {
    /// Spawn the coordinator over the given session source and store.
    pub fn spawn<S>(source: Arc<S>, store: ProfileStore) -> Self
    where
        S: SessionSource + Send + Sync + 'static,
    {
        let (requests, mut rx) = mpsc::unbounded_channel();
        let token_seq = Arc::new(AtomicU64::new(0));
        let info_seq = Arc::new(AtomicU64::new(0));

        let dispatcher = tokio::spawn({
            let store = store.clone();
            let token_seq = token_seq.clone();
            let info_seq = info_seq.clone();
            async move {
                while let Some(request) = rx.recv().await {
                    match request {
                        RefreshRequest::AccessToken { seq } => {
                            tokio::spawn(run_access_token_refresh(
                                source.clone(),
                                store.clone(),
                                token_seq.clone(),
                                seq,
                            ));
                        }
                        RefreshRequest::UserInformation { seq } => {
                            tokio::spawn(run_user_information_refresh(
                                source.clone(),
                                store.clone(),
                                info_seq.clone(),
                                seq,
                            ));
                        }
                    }
                }
            }
        });

        Self {
            requests,
            token_seq,
            info_seq,
            store,
            dispatcher,
        }
    }

    /// Issue a new access-token refresh trigger. Any unresolved earlier
    /// trigger is superseded: its eventual result will not touch the store.
    pub fn request_refresh_access_token(&self) {
        let seq = self.token_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.request_refresh_access_token();
        let _ = self.requests.send(RefreshRequest::AccessToken { seq });
    }

    /// Issue a profile-update trigger, same latest-wins discipline.
    pub fn request_refresh_user_information(&self) {
        let seq = self.info_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.requests.send(RefreshRequest::UserInformation { seq });
    }
}

impl Drop for RefreshCoordinator {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

async fn run_access_token_refresh<S>(
    source: Arc<S>,
    store: ProfileStore,
    latest: Arc<AtomicU64>,
    seq: u64,
) where
    S: SessionSource + Send + Sync + 'static,
{
    let metrics = get_metrics().await;
    metrics.refresh_requests.inc();

    let outcome = source.mint_access_token().await;

    // Latest trigger wins: a result belonging to a superseded trigger must
    // not reach the store, even if it resolves after the newer one.
    if latest.load(Ordering::SeqCst) != seq {
        metrics.refresh_superseded.inc();
        debug!(seq, "discarding superseded access-token refresh result");
        return;
    }

    match outcome {
        Ok(Some(user)) => {
            if let Some(expiration) = user.access_token_expiration_time {
                metrics.token_expiry_unix.set(expiration.timestamp());
            }
            store.refresh_access_token(user);
            info!(seq, "access token refreshed");
        }
        Ok(None) => {
            debug!(seq, "no active session, refresh skipped");
        }
        Err(err) => {
            metrics
                .refresh_failures
                .with_label_values(&["provider"])
                .inc();
            store.refresh_access_token_fail(app_error_message(&err));
            warn!(seq, "access token refresh failed: {err:#}");
        }
    }
}

async fn run_user_information_refresh<S>(
    source: Arc<S>,
    store: ProfileStore,
    latest: Arc<AtomicU64>,
    seq: u64,
) where
    S: SessionSource + Send + Sync + 'static,
{
    let metrics = get_metrics().await;

    let Some(user) = store.profile().user else {
        return;
    };
    // Nothing to persist until the user has set a name.
    let Some(full_name) = user.full_name else {
        return;
    };
    let update = ProfileUpdate {
        full_name,
        organization: user.organization,
        is_registered_to_receive_api_announcements: user
            .is_registered_to_receive_api_announcements,
    };

    metrics.profile_update_requests.inc();
    let result = source.update_user_information(update).await;

    if latest.load(Ordering::SeqCst) != seq {
        debug!(seq, "discarding superseded profile-update result");
        return;
    }

    match result {
        Ok(()) => {
            store.refresh_user_information_success();
            info!(seq, "user information refreshed");
        }
        Err(err) => {
            metrics.profile_update_failures.inc();
            store.refresh_user_information_fail(app_error_message(&err));
            warn!(seq, "user information refresh failed: {err:#}");
        }
    }
}
