// tests/common/mod.rs
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use axum::Router;
use chrono::Utc;
use reqwest::Client;

use crate::session::accessor::SessionSource;
use crate::session::user::{ProfileUpdate, UserSession};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// One scripted answer of the fake session source.
#[derive(Debug, Clone)]
pub enum ScriptedMint {
    Token { value: &'static str, delay: Duration },
    NoSession { delay: Duration },
    Fail { message: &'static str, delay: Duration },
}

/// Fake `SessionSource` driving the coordinator with scripted outcomes and
/// per-call delays, so supersede timing is deterministic under paused time.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pub mints: Mutex<VecDeque<ScriptedMint>>,
    pub updates: Mutex<Vec<ProfileUpdate>>,
    pub update_error: Mutex<Option<&'static str>>,
}

impl ScriptedSource {
    pub fn with_mints(mints: Vec<ScriptedMint>) -> Self {
        Self {
            mints: Mutex::new(mints.into()),
            ..Self::default()
        }
    }

    pub fn recorded_updates(&self) -> Vec<ProfileUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl SessionSource for ScriptedSource {
    async fn mint_access_token(&self) -> Result<Option<UserSession>> {
        let script = self
            .mints
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted mint_access_token call");
        match script {
            ScriptedMint::Token { value, delay } => {
                tokio::time::sleep(delay).await;
                Ok(Some(UserSession {
                    email: "dev@example.com".into(),
                    refresh_token: Some("refresh-1".into()),
                    access_token: Some(value.into()),
                    access_token_expiration_time: Some(Utc::now() + chrono::Duration::hours(1)),
                    ..UserSession::default()
                }))
            }
            ScriptedMint::NoSession { delay } => {
                tokio::time::sleep(delay).await;
                Ok(None)
            }
            ScriptedMint::Fail { message, delay } => {
                tokio::time::sleep(delay).await;
                Err(anyhow!(message))
            }
        }
    }

    async fn update_user_information(&self, update: ProfileUpdate) -> Result<()> {
        self.updates.lock().unwrap().push(update);
        match *self.update_error.lock().unwrap() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(()),
        }
    }
}
