use chrono::{DateTime, Utc};

/// Profile of the signed-in user as published to subscribers.
///
/// `access_token` and `access_token_expiration_time` are set and cleared
/// together; a refresh in flight keeps the previous pair visible until its
/// outcome lands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSession {
    pub full_name: Option<String>,
    pub email: String,
    pub organization: Option<String>,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    pub access_token_expiration_time: Option<DateTime<Utc>>,
    pub is_registered_to_receive_api_announcements: Option<bool>,
}

impl UserSession {
    /// Merge a resolved refresh outcome into the existing profile. Identity
    /// fields only overwrite when the incoming value is present; the token and
    /// its expiration always travel together.
    pub fn merged_with(mut self, incoming: UserSession) -> UserSession {
        if incoming.full_name.is_some() {
            self.full_name = incoming.full_name;
        }
        if !incoming.email.is_empty() {
            self.email = incoming.email;
        }
        if incoming.organization.is_some() {
            self.organization = incoming.organization;
        }
        if incoming.refresh_token.is_some() {
            self.refresh_token = incoming.refresh_token;
        }
        if incoming.is_registered_to_receive_api_announcements.is_some() {
            self.is_registered_to_receive_api_announcements =
                incoming.is_registered_to_receive_api_announcements;
        }
        self.access_token = incoming.access_token;
        self.access_token_expiration_time = incoming.access_token_expiration_time;
        self
    }
}

/// Fields accepted by the provider's profile-update call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub organization: Option<String>,
    pub is_registered_to_receive_api_announcements: Option<bool>,
}
