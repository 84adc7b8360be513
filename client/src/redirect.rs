//! Post-login redirect.
//!
//! The gateway sends intercepted clients to the login page with the page
//! they originally asked for in the `redir` query parameter (older firmware
//! uses `redirurl`). The value is normally a bare host and path such as
//! `example.com/news`, which is opened over plain HTTP; an explicit
//! `http://` or `https://` URL is used as-is.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use std::fmt;

use url::Url;

/// Canonical query parameter carrying the redirect target.
pub const REDIRECT_PARAM: &str = "redir";
/// Older spelling, read only when `redir` is absent or empty.
pub const REDIRECT_PARAM_ALIAS: &str = "redirurl";

/// A validated http(s) destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectTarget(Url);

impl RedirectTarget {
    /// Validate a raw parameter value. Returns `None` for empty values,
    /// non-http(s) schemes and anything that does not parse with a host.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let candidate = if has_scheme(raw) { raw.to_owned() } else { format!("http://{raw}") };
        let url = Url::parse(&candidate).ok()?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return None;
        }
        Some(Self(url))
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A scheme separator only counts before any path, query or fragment, so a
/// bare host whose query embeds a URL still gets the `http://` default.
fn has_scheme(raw: &str) -> bool {
    raw.find("://").is_some_and(|at| !raw[..at].contains(['/', '?', '#']))
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the redirect target from a page's query string (leading `?` optional).
#[must_use]
pub fn resolve_redirect_target(query: &str) -> Option<RedirectTarget> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut canonical = None;
    let mut alias = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if value.trim().is_empty() {
            continue;
        }
        if key == REDIRECT_PARAM && canonical.is_none() {
            canonical = Some(value.into_owned());
        } else if key == REDIRECT_PARAM_ALIAS && alias.is_none() {
            alias = Some(value.into_owned());
        }
    }

    let raw = canonical.or(alias)?;
    let target = RedirectTarget::parse(&raw);
    if target.is_none() {
        tracing::warn!(value = %raw, "ignoring unusable redirect target");
    }
    target
}

/// Read the redirect target from a full login-page URL.
#[must_use]
pub fn resolve_from_page_url(page: &Url) -> Option<RedirectTarget> {
    page.query().and_then(resolve_redirect_target)
}

/// Performs the navigation once a login is confirmed.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &RedirectTarget);
}
