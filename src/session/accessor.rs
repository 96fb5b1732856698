use anyhow::Result;
use tracing::warn;

use crate::observability::metrics::get_metrics;
use crate::provider::client::IdentityClient;
use crate::session::user::{ProfileUpdate, UserSession};

/// Operations the refresh coordinator drives. [`SessionAccessor`] implements
/// this over the live provider client; tests drive the coordinator with a
/// scripted implementation instead.
pub trait SessionSource {
    fn mint_access_token(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<UserSession>>> + Send;

    fn update_user_information(
        &self,
        update: ProfileUpdate,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Stateless wrapper over the provider client exposing the session contract.
#[derive(Debug, Clone)]
pub struct SessionAccessor {
    provider: IdentityClient,
}

impl SessionAccessor {
    pub fn new(provider: IdentityClient) -> Self {
        Self { provider }
    }

    /// Current user's profile, or `None` when no session is active. The
    /// organization cannot be retrieved from this source.
    pub async fn fetch_current_session(&self) -> Result<Option<UserSession>> {
        let Some(session) = self.provider.active_session().await else {
            return Ok(None);
        };
        Ok(Some(UserSession {
            full_name: session.display_name,
            email: session.email,
            organization: None,
            refresh_token: Some(session.refresh_token),
            ..UserSession::default()
        }))
    }

    /// Force a fresh, non-cached access token for the active session and
    /// return the profile populated with it and its absolute expiration.
    /// `None` when no session is active; provider failures surface as errors.
    pub async fn mint_access_token(&self) -> Result<Option<UserSession>> {
        let Some(session) = self.provider.active_session().await else {
            return Ok(None);
        };
        let Some(minted) = self.provider.mint_token().await? else {
            return Ok(None);
        };
        Ok(Some(UserSession {
            full_name: session.display_name,
            email: session.email,
            organization: None,
            refresh_token: Some(
                minted
                    .refresh_token
                    .unwrap_or(session.refresh_token),
            ),
            access_token: Some(minted.token),
            access_token_expiration_time: Some(minted.expiration_time),
            is_registered_to_receive_api_announcements: None,
        }))
    }

    /// Persist the richer profile-update field set. The display name is
    /// forwarded verbatim; an empty string is a valid value.
    pub async fn update_user_information(&self, update: ProfileUpdate) -> Result<()> {
        self.provider.update_profile(&update).await
    }

    /// Verification failures must never block the caller: log and continue.
    pub async fn send_email_verification(&self) {
        if let Err(err) = self.provider.send_verification_email().await {
            get_metrics().await.verification_send_failures.inc();
            warn!("email verification send failed: {err:#}");
        }
    }
}

impl SessionSource for SessionAccessor {
    async fn mint_access_token(&self) -> Result<Option<UserSession>> {
        SessionAccessor::mint_access_token(self).await
    }

    async fn update_user_information(&self, update: ProfileUpdate) -> Result<()> {
        SessionAccessor::update_user_information(self, update).await
    }
}
