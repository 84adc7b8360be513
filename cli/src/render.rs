//! Plain-text rendering of the login page.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use client::{AuthState, ErrorCategory, PortalView, select_view};

/// Render the screen `state` selects, one line per element.
pub fn render(state: &AuthState) -> String {
    let screen = select_view(state);
    let mut lines = Vec::new();

    if let Some(category) = screen.banner {
        lines.push(error_line(category));
    }
    match screen.view {
        PortalView::Loading => lines.push("Checking connection status...".to_owned()),
        PortalView::Error(category) => lines.push(error_line(category)),
        PortalView::LoginForm => {
            lines.push("Login required.".to_owned());
            lines.push("Run `portal-cli login --user <name>` to sign in.".to_owned());
        }
        PortalView::AnonymousContinue => {
            lines.push("Guest access available.".to_owned());
            lines.push("Run `portal-cli continue` to accept and connect.".to_owned());
        }
        PortalView::Authorized => {
            match state.session.as_ref().and_then(|s| s.user()) {
                Some(user) => lines.push(format!("Connected as {user}.")),
                None => lines.push("Connected.".to_owned()),
            }
            lines.push("Run `portal-cli logout` to disconnect.".to_owned());
        }
    }
    lines.join("\n")
}

fn error_line(category: ErrorCategory) -> String {
    format!("error [{}]: {}", category.code(), category.message())
}
