//! Logon decisions and logon body parsing.

use url::form_urlencoded;
use wire::{AuthMode, Credentials};

use crate::config::PortalConfig;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("malformed JSON logon body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported logon content type: {0}")]
    ContentType(String),
}

/// Decide a logon attempt. Returns the user to record on success.
#[must_use]
pub fn authenticate(config: &PortalConfig, attempt: &Credentials) -> Option<String> {
    match config.auth_mode {
        AuthMode::Anonymous => Some(attempt.user.clone()),
        AuthMode::Password => (attempt.user == config.credentials.user
            && attempt.password == config.credentials.password)
            .then(|| attempt.user.clone()),
        AuthMode::Unknown => None,
    }
}

/// Read credentials from a logon body.
///
/// JSON and form bodies are both accepted. A body that looks like a JSON
/// object is parsed as JSON whatever the declared type, since some clients
/// send JSON labelled as a form. An empty body is an anonymous attempt.
pub fn parse_credentials(content_type: Option<&str>, body: &[u8]) -> Result<Credentials, BodyError> {
    let trimmed = body.trim_ascii();
    if trimmed.is_empty() {
        return Ok(Credentials::anonymous());
    }
    if trimmed.starts_with(b"{") {
        return Ok(serde_json::from_slice(trimmed)?);
    }

    let media_type = content_type
        .and_then(|raw| raw.split(';').next())
        .map(|raw| raw.trim().to_ascii_lowercase());
    match media_type.as_deref() {
        Some(JSON_CONTENT_TYPE) => Ok(serde_json::from_slice(trimmed)?),
        None | Some(FORM_CONTENT_TYPE) => {
            let mut credentials = Credentials::anonymous();
            for (key, value) in form_urlencoded::parse(trimmed) {
                match key.as_ref() {
                    "user" => credentials.user = value.into_owned(),
                    "password" => credentials.password = value.into_owned(),
                    _ => {}
                }
            }
            Ok(credentials)
        }
        Some(other) => Err(BodyError::ContentType(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "access_test.rs"]
mod tests;
