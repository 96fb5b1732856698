use std::fmt::Display;
use std::time::Duration;

use chrono::TimeZone;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::countdown::format::time_left_for_token_expiration;
use crate::helpers::time::now;
use crate::store::profile::ProfileStore;

/// Recompute cadence of the countdown line.
pub const COUNTDOWN_TICK: Duration = Duration::from_millis(250);

/// Publishes the countdown line while an expiration instant exists.
///
/// The interval is only armed while the current profile carries an
/// expiration; clearing it stops the recompute within one tick and the line
/// resets to empty. Dropping the ticker aborts its task, so cleanup holds on
/// every teardown path.
pub struct CountdownTicker {
    line: watch::Receiver<String>,
    worker: JoinHandle<()>,
}

impl CountdownTicker {
    pub fn spawn<Tz>(store: &ProfileStore, tz: Tz) -> Self
    where
        Tz: TimeZone + Send + Sync + 'static,
        Tz::Offset: Display + Send,
    {
        let mut profile_rx = store.subscribe();
        let (line_tx, line) = watch::channel(String::new());

        let worker = tokio::spawn(async move {
            loop {
                let expiration = profile_rx
                    .borrow_and_update()
                    .user
                    .as_ref()
                    .and_then(|u| u.access_token_expiration_time);
                if expiration.is_none() {
                    // Idle until the profile changes; no interval armed.
                    if profile_rx.changed().await.is_err() {
                        return;
                    }
                    continue;
                }

                let mut interval = tokio::time::interval(COUNTDOWN_TICK);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            let expiration = profile_rx
                                .borrow()
                                .user
                                .as_ref()
                                .and_then(|u| u.access_token_expiration_time);
                            let _ = line_tx.send(time_left_for_token_expiration(
                                &tz,
                                now(),
                                expiration,
                            ));
                            if expiration.is_none() {
                                break;
                            }
                        }
                        changed = profile_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            let cleared = profile_rx
                                .borrow()
                                .user
                                .as_ref()
                                .and_then(|u| u.access_token_expiration_time)
                                .is_none();
                            if cleared {
                                let _ = line_tx.send(String::new());
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { line, worker }
    }

    /// Latest rendered countdown line; empty while no expiration exists.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.line.clone()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
