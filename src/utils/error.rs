use anyhow::Error;

/// Normalize a provider/transport failure chain into the single-line message
/// the store publishes. Never empty.
pub fn app_error_message(err: &Error) -> String {
    let message = format!("{err:#}");
    if message.trim().is_empty() {
        "unknown error".to_string()
    } else {
        message
    }
}
