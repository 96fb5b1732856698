//! Identity-provider REST client.
//!
//! Holds the provider-side view of the signed-in user in memory (the SDK
//! `currentUser` analog) and performs the three account calls the agent
//! needs: forced token mint, profile update, verification-email send.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::settings::ProviderConfig;
use crate::session::user::ProfileUpdate;

/// Provider-side session record. Populated at sign-in (out of scope here,
/// the agent is handed one) and cleared on sign-out.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub email: String,
    pub email_verified: bool,
    pub display_name: Option<String>,
    pub refresh_token: String,
}

/// Response of the forced token mint: `{token, expirationTime}`, plus the
/// rotated refresh token when the provider rotates.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedToken {
    pub token: String,
    pub expiration_time: DateTime<Utc>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IdentityClient {
    cfg: Arc<ProviderConfig>,
    client: Client,
    session: Arc<RwLock<Option<ActiveSession>>>,
}

impl IdentityClient {
    pub fn new(cfg: ProviderConfig, client: Client) -> Self {
        Self {
            cfg: Arc::new(cfg),
            client,
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_active_session(&self, session: ActiveSession) {
        debug!("activating provider session for {}", session.email);
        *self.session.write().await = Some(session);
    }

    pub async fn clear_active_session(&self) {
        *self.session.write().await = None;
    }

    pub async fn active_session(&self) -> Option<ActiveSession> {
        self.session.read().await.clone()
    }

    /// Force the provider to issue a fresh, non-cached access token against
    /// the active session's refresh token. `None` when no session is active.
    pub async fn mint_token(&self) -> Result<Option<MintedToken>> {
        let Some(session) = self.active_session().await else {
            return Ok(None);
        };

        let url = format!("{}/v1/token", self.cfg.token_url);
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", session.refresh_token.as_str()),
        ];
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.cfg.api_key.as_str())])
            .form(&form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("token mint failed: {}", response.status()));
        }

        let minted: MintedToken = response.json().await?;
        if let Some(rotated) = &minted.refresh_token {
            let mut slot = self.session.write().await;
            if let Some(active) = slot.as_mut() {
                active.refresh_token = rotated.clone();
            }
        }
        Ok(Some(minted))
    }

    /// Persist the profile fields against the active session. A no-op without
    /// one. The display name is forwarded verbatim, empty string included.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let Some(_session) = self.active_session().await else {
            return Ok(());
        };

        let url = format!("{}/v1/accounts:update", self.cfg.account_url);
        let body = json!({
            "displayName": update.full_name,
            "organization": update.organization,
            "isRegisteredToReceiveAPIAnnouncements":
                update.is_registered_to_receive_api_announcements,
        });
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.cfg.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("profile update failed: {}", response.status()));
        }

        let mut slot = self.session.write().await;
        if let Some(active) = slot.as_mut() {
            active.display_name = Some(update.full_name.clone());
        }
        Ok(())
    }

    /// Ask the provider to send a verification email. Skipped without an
    /// active session or when the email is already verified.
    pub async fn send_verification_email(&self) -> Result<()> {
        let Some(session) = self.active_session().await else {
            return Ok(());
        };
        if session.email_verified {
            return Ok(());
        }

        let url = format!("{}/v1/accounts:sendVerificationEmail", self.cfg.account_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.cfg.api_key.as_str())])
            .json(&json!({ "email": session.email }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "verification email send failed: {}",
                response.status()
            ));
        }
        Ok(())
    }
}
