#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::session::user::UserSession;
    use crate::store::profile::ProfileStore;

    fn signed_in_user() -> UserSession {
        UserSession {
            full_name: Some("Ada Lovelace".into()),
            email: "dev@example.com".into(),
            organization: Some("Analytical Engines".into()),
            refresh_token: Some("refresh-abc".into()),
            access_token: Some("old-token".into()),
            access_token_expiration_time: Some(Utc::now() + chrono::Duration::minutes(10)),
            is_registered_to_receive_api_announcements: Some(true),
        }
    }

    fn mint_outcome(token: &str) -> UserSession {
        UserSession {
            email: "dev@example.com".into(),
            refresh_token: Some("refresh-abc".into()),
            access_token: Some(token.into()),
            access_token_expiration_time: Some(Utc::now() + chrono::Duration::hours(1)),
            ..UserSession::default()
        }
    }

    #[test]
    fn success_merges_tokens_and_preserves_identity_fields() {
        let store = ProfileStore::new();
        store.sign_in(signed_in_user());

        store.refresh_access_token(mint_outcome("new-token"));

        let user = store.profile().user.unwrap();
        assert_eq!(user.access_token.as_deref(), Some("new-token"));
        assert!(user.access_token_expiration_time.is_some());
        // The mint outcome carries no organization; the known one stays.
        assert_eq!(user.organization.as_deref(), Some("Analytical Engines"));
        assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.is_registered_to_receive_api_announcements, Some(true));
    }

    #[test]
    fn success_clears_previous_error_and_refreshing_flag() {
        let store = ProfileStore::new();
        store.sign_in(signed_in_user());
        store.request_refresh_access_token();
        store.refresh_access_token_fail("transient".into());
        assert!(store.profile().refresh_access_token_error.is_some());

        store.request_refresh_access_token();
        assert!(store.profile().is_refreshing_access_token);
        store.refresh_access_token(mint_outcome("new-token"));

        let profile = store.profile();
        assert_eq!(profile.refresh_access_token_error, None);
        assert!(!profile.is_refreshing_access_token);
    }

    #[test]
    fn failure_keeps_token_fields_untouched() {
        let store = ProfileStore::new();
        store.sign_in(signed_in_user());
        let before = store.profile().user.unwrap();

        store.refresh_access_token_fail("provider down".into());

        let profile = store.profile();
        assert_eq!(profile.refresh_access_token_error.as_deref(), Some("provider down"));
        assert_eq!(profile.user.unwrap(), before);
    }

    #[test]
    fn sign_out_erases_tokens_and_expiration_together() {
        let store = ProfileStore::new();
        store.sign_in(signed_in_user());
        store.refresh_access_token_fail("stale error".into());

        store.sign_out();

        let profile = store.profile();
        assert_eq!(profile.user, None);
        assert_eq!(profile.refresh_access_token_error, None);
        assert_eq!(profile.refresh_user_information_error, None);
        assert!(!profile.is_refreshing_access_token);
    }

    #[test]
    fn success_without_prior_user_adopts_the_outcome() {
        let store = ProfileStore::new();
        store.refresh_access_token(mint_outcome("tok"));

        let user = store.profile().user.unwrap();
        assert_eq!(user.access_token.as_deref(), Some("tok"));
        assert_eq!(user.email, "dev@example.com");
    }

    #[tokio::test]
    async fn subscribers_observe_published_outcomes() {
        let store = ProfileStore::new();
        let mut rx = store.subscribe();

        store.sign_in(signed_in_user());
        rx.changed().await.unwrap();
        assert!(rx.borrow().user.is_some());

        store.sign_out();
        rx.changed().await.unwrap();
        assert!(rx.borrow().user.is_none());
    }
}
