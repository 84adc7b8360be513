//! # client
//!
//! Captive-portal client core. Talks to the portal's access API, keeps the
//! authorization state a login page renders from, and sends the user on to
//! their original destination after a successful login.
//!
//! Layers, leaf first:
//! - [`transport`]: the three portal requests, key normalization, typed failures
//! - [`classify`]: failure to user-facing [`ErrorCategory`]
//! - [`portal`]: the [`CaptivePortal`] state machine
//! - [`redirect`]: `redir` query parameter to navigation target
//! - [`view`]: pure state-to-screen selection for a presentation layer

pub mod classify;
pub mod portal;
pub mod redirect;
pub mod transport;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use classify::{ClassifyContext, ErrorCategory, classify};
pub use portal::{AuthState, CaptivePortal, Outcome};
pub use redirect::{Navigator, RedirectTarget, resolve_redirect_target};
pub use transport::{HttpTransport, PortalError, PortalTransport, TransportConfig};
pub use view::{PortalView, Screen, select_view};
pub use wire::{AuthMode, ClientState, Credentials, SessionSnapshot};
