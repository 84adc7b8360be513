//! Which screen a login page shows for a given state.
//!
//! Pure and synchronous so any presentation layer (terminal, web, tests)
//! renders the same decisions.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use wire::AuthMode;

use crate::classify::ErrorCategory;
use crate::portal::AuthState;

/// Main panel of the login page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalView {
    /// Status check in flight.
    Loading,
    /// The portal did not say which login it expects.
    Error(ErrorCategory),
    /// Username and password form.
    LoginForm,
    /// Single "continue" button for anonymous access.
    AnonymousContinue,
    /// Already online; offers logout.
    Authorized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub view: PortalView,
    /// Dismissible error shown above the main panel.
    pub banner: Option<ErrorCategory>,
    pub controls_enabled: bool,
}

#[must_use]
pub fn select_view(state: &AuthState) -> Screen {
    if state.is_loading {
        return Screen { view: PortalView::Loading, banner: None, controls_enabled: false };
    }

    let view = if state.is_authorized() {
        PortalView::Authorized
    } else {
        match state.auth_mode {
            AuthMode::Password => PortalView::LoginForm,
            AuthMode::Anonymous => PortalView::AnonymousContinue,
            AuthMode::Unknown => PortalView::Error(state.error.unwrap_or(ErrorCategory::Unknown)),
        }
    };
    // The error view already carries the category.
    let banner = match view {
        PortalView::Error(_) => None,
        _ => state.error,
    };

    Screen { view, banner, controls_enabled: !state.is_busy() }
}
