//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the immutable backend configuration and the session table. Both
//! are created once at startup; nothing is process-global.

use std::sync::Arc;

use crate::config::PortalConfig;
use crate::services::session::SessionStore;

/// Shared application state. Clone is required by Axum; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub sessions: SessionStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: PortalConfig) -> Self {
        Self { config: Arc::new(config), sessions: SessionStore::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use wire::AuthMode;

    use super::*;
    use crate::config::Delays;

    /// State with default credentials and no artificial latency.
    #[must_use]
    pub fn test_app_state(auth_mode: AuthMode) -> AppState {
        AppState::new(PortalConfig { auth_mode, delays: Delays::none(), ..PortalConfig::default() })
    }
}
