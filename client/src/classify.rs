//! Failure classification.
//!
//! The portal does not reliably say *why* a logon was refused, so a refusal
//! is classified by whether credentials were part of the attempt, not by
//! anything in the response.

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;

use std::fmt;

use wire::Credentials;

use crate::transport::PortalError;

/// The closed set of errors a login page can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The request could not complete.
    Network,
    /// A credentialed logon was refused.
    AuthFailed,
    /// An anonymous logon was refused.
    LoginFailed,
    /// Anything that does not match a known failure shape.
    Unknown,
}

impl ErrorCategory {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK",
            Self::AuthFailed => "AUTH_FAILED",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Message shown to the user.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Network => "Unable to reach the portal. Check your connection and try again.",
            Self::AuthFailed => "Invalid username or password.",
            Self::LoginFailed => "Login failed. Please try again.",
            Self::Unknown => "An unexpected error occurred.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What the failed operation sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassifyContext {
    pub had_credentials: bool,
}

impl ClassifyContext {
    /// Context for an operation that carried no username.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { had_credentials: false }
    }

    #[must_use]
    pub fn for_credentials(credentials: &Credentials) -> Self {
        Self { had_credentials: credentials.has_user() }
    }
}

/// Map a transport or semantic failure to the category a user sees.
#[must_use]
pub fn classify(error: &PortalError, context: ClassifyContext) -> ErrorCategory {
    match error {
        PortalError::Network { .. } | PortalError::Status { .. } => ErrorCategory::Network,
        PortalError::Rejected { .. } if context.had_credentials => ErrorCategory::AuthFailed,
        PortalError::Rejected { .. } => ErrorCategory::LoginFailed,
        PortalError::Body { .. } | PortalError::Decode(_) | PortalError::ClientBuild(_) => ErrorCategory::Unknown,
    }
}
