use chrono::{DateTime, TimeZone, Utc};

/// Render the time remaining before the access token expires, in the given
/// time zone. Empty when no expiration instant exists; once past the
/// expiration, reports the local wall time it expired at.
pub fn time_left_for_token_expiration<Tz>(
    tz: &Tz,
    now: DateTime<Utc>,
    expiration: Option<DateTime<Utc>>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(expiration) = expiration else {
        return String::new();
    };

    let remaining = expiration.signed_duration_since(now).num_seconds();
    if remaining <= 0 {
        return format!(
            "The access token expired at {}",
            expiration.with_timezone(tz).format("%H:%M:%S %Z")
        );
    }

    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;
    if hours > 0 {
        format!("The access token expires in {hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("The access token expires in {minutes}m {seconds}s")
    } else {
        format!("The access token expires in {seconds}s")
    }
}
