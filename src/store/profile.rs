use tokio::sync::watch;
use tracing::debug;

use crate::session::user::UserSession;

/// Snapshot of the shared profile state observed by subscribers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub user: Option<UserSession>,
    pub is_refreshing_access_token: bool,
    pub refresh_access_token_error: Option<String>,
    pub refresh_user_information_error: Option<String>,
}

/// Shared profile store backed by a watch channel.
///
/// Writers are the refresh coordinator and the sign-in/sign-out paths;
/// everything else only reads snapshots or subscribes.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    tx: watch::Sender<ProfileState>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ProfileState::default());
        Self { tx }
    }

    pub fn profile(&self) -> ProfileState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.tx.subscribe()
    }

    /// Seed the store with the session established at sign-in.
    pub fn sign_in(&self, user: UserSession) {
        self.tx.send_modify(|state| {
            state.user = Some(user);
            state.is_refreshing_access_token = false;
            state.refresh_access_token_error = None;
            state.refresh_user_information_error = None;
        });
    }

    /// Erases the whole session; token and expiration go together.
    pub fn sign_out(&self) {
        debug!("signing out, clearing session state");
        self.tx.send_modify(|state| {
            *state = ProfileState::default();
        });
    }

    pub fn request_refresh_access_token(&self) {
        self.tx.send_modify(|state| {
            state.is_refreshing_access_token = true;
        });
    }

    /// Success outcome: merge the minted session and clear the previous error.
    pub fn refresh_access_token(&self, user: UserSession) {
        self.tx.send_modify(|state| {
            state.user = Some(match state.user.take() {
                Some(existing) => existing.merged_with(user),
                None => user,
            });
            state.is_refreshing_access_token = false;
            state.refresh_access_token_error = None;
        });
    }

    /// Failure outcome: record the error, leave token fields untouched.
    pub fn refresh_access_token_fail(&self, error: String) {
        self.tx.send_modify(|state| {
            state.is_refreshing_access_token = false;
            state.refresh_access_token_error = Some(error);
        });
    }

    pub fn refresh_user_information_success(&self) {
        self.tx.send_modify(|state| {
            state.refresh_user_information_error = None;
        });
    }

    pub fn refresh_user_information_fail(&self, error: String) {
        self.tx.send_modify(|state| {
            state.refresh_user_information_error = Some(error);
        });
    }
}
