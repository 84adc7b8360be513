//! Authorization state machine.
//!
//! DESIGN
//! ======
//! `CaptivePortal` owns the `AuthState` of one mounted login page and exposes
//! the portal operations. State is published through a `watch` channel so a
//! presentation layer can re-render on change. Every operation writes the
//! whole auth slice it owns, never a partial patch.
//!
//! CONCURRENCY
//! ===========
//! Operations are single-flight: an async gate admits one of `check_status`,
//! `login` and `logout` at a time, and later callers queue in arrival order.
//! A status poll that lands while a login is in flight therefore runs after
//! it and sees the post-login server state instead of racing it. The status
//! refresh a login performs happens inside the login's turn.
//!
//! LIFETIME
//! ========
//! `unmount` detaches the instance. Results that arrive afterwards are
//! dropped, the published state stays frozen and no redirect fires.

#[cfg(test)]
#[path = "portal_test.rs"]
mod portal_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, watch};
use wire::{AuthMode, ClientState, Credentials, Endpoint, LogonReply, SessionSnapshot, StatusReply};

use crate::classify::{ClassifyContext, ErrorCategory, classify};
use crate::redirect::{Navigator, RedirectTarget};
use crate::transport::{PortalError, PortalTransport};

// =============================================================================
// STATE
// =============================================================================

/// Everything a login page renders from.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub authorization: ClientState,
    /// Only meaningful while the client is not authorized.
    pub auth_mode: AuthMode,
    /// A user-visible status check is in flight.
    pub is_loading: bool,
    /// A login or logout is in flight.
    pub is_submitting: bool,
    pub error: Option<ErrorCategory>,
    /// Present only while authorized.
    pub session: Option<SessionSnapshot>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            authorization: ClientState::Unknown,
            auth_mode: AuthMode::Unknown,
            is_loading: true,
            is_submitting: false,
            error: None,
            session: None,
        }
    }
}

impl AuthState {
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.authorization.is_authorized()
    }

    /// True while interaction should be disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_submitting
    }

    fn apply_status(&mut self, reply: &StatusReply) {
        self.authorization = reply.client_state();
        self.auth_mode = reply.auth_mode();
        self.session = reply.session().cloned();
    }
}

/// Result of an operation, returned in addition to the published state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Done(T),
    Failed(ErrorCategory),
    /// The portal was unmounted; the result was discarded.
    Detached,
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

// =============================================================================
// SHARED CORE
// =============================================================================

struct Shared {
    transport: Arc<dyn PortalTransport>,
    navigator: Arc<dyn Navigator>,
    redirect: Option<RedirectTarget>,
    state: watch::Sender<AuthState>,
    mounted: AtomicBool,
    gate: Mutex<()>,
}

impl Shared {
    /// Apply `f` to the published state. Returns `false`, without touching
    /// anything, once the portal is unmounted.
    fn update(&self, f: impl FnOnce(&mut AuthState)) -> bool {
        self.state.send_if_modified(|state| {
            if !self.mounted.load(Ordering::Acquire) {
                return false;
            }
            f(state);
            true
        })
    }
}

#[derive(Clone, Copy)]
enum Busy {
    Loading,
    Submitting,
}

/// Clears a busy flag on drop, so a cancelled operation future or a
/// panicking transport cannot leave the page stuck in a busy state.
struct BusyGuard<'a> {
    shared: &'a Shared,
    busy: Busy,
}

impl<'a> BusyGuard<'a> {
    fn new(shared: &'a Shared, busy: Busy) -> Self {
        Self { shared, busy }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let busy = self.busy;
        self.shared.update(|state| match busy {
            Busy::Loading => state.is_loading = false,
            Busy::Submitting => state.is_submitting = false,
        });
    }
}

// =============================================================================
// CAPTIVE PORTAL
// =============================================================================

/// Handle to one mounted portal state machine. Cloning shares the instance.
#[derive(Clone)]
pub struct CaptivePortal {
    shared: Arc<Shared>,
}

impl CaptivePortal {
    /// Mount a new instance. `redirect` is the target read from the page URL
    /// at mount; it is used only after a successful login.
    #[must_use]
    pub fn new(
        transport: Arc<dyn PortalTransport>,
        navigator: Arc<dyn Navigator>,
        redirect: Option<RedirectTarget>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        let shared = Shared {
            transport,
            navigator,
            redirect,
            state,
            mounted: AtomicBool::new(true),
            gate: Mutex::new(()),
        };
        Self { shared: Arc::new(shared) }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.shared.state.subscribe()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.shared.mounted.load(Ordering::Acquire)
    }

    /// Detach this instance. In-flight results are discarded from here on.
    pub fn unmount(&self) {
        // Flip the flag under the channel's write lock so no update can be
        // half-way through when it changes.
        self.shared.state.send_if_modified(|_| {
            self.shared.mounted.store(false, Ordering::Release);
            false
        });
        tracing::debug!("captive portal unmounted");
    }

    /// Dismiss the current error. Nothing else changes.
    pub fn clear_error(&self) {
        self.shared.update(|state| state.error = None);
    }

    /// Ask the portal whether this client is authorized.
    ///
    /// A failed check surfaces `Network` but keeps the last known
    /// authorization: a transient outage must not look like a logout.
    pub async fn check_status(&self) -> Outcome<ClientState> {
        let _turn = self.shared.gate.lock().await;
        if !self.shared.update(|state| {
            state.error = None;
            state.is_loading = true;
        }) {
            return Outcome::Detached;
        }
        let _busy = BusyGuard::new(&self.shared, Busy::Loading);

        match self.shared.transport.status().await {
            Ok(reply) => {
                let client_state = reply.client_state();
                if !self.shared.update(|state| state.apply_status(&reply)) {
                    return Outcome::Detached;
                }
                tracing::debug!(%client_state, auth_mode = %reply.auth_mode(), "status check complete");
                Outcome::Done(client_state)
            }
            Err(err) => {
                // Whatever went wrong, the page could not learn its status.
                let category = ErrorCategory::Network;
                tracing::warn!(error = %err, code = category.code(), "status check failed");
                if !self.shared.update(|state| state.error = Some(category)) {
                    return Outcome::Detached;
                }
                Outcome::Failed(category)
            }
        }
    }

    /// Log on with `credentials` (empty for anonymous mode).
    ///
    /// A successful logon reply is not trusted on its own: the portal is
    /// asked for its status afterwards and only a confirmed `AUTHORIZED`
    /// counts. On confirmation the redirect target, if any, is opened and
    /// returned.
    pub async fn login(&self, credentials: Credentials) -> Outcome<Option<RedirectTarget>> {
        let _turn = self.shared.gate.lock().await;
        if !self.shared.update(|state| {
            state.error = None;
            // A submission supersedes the mount-time loading state.
            state.is_loading = false;
            state.is_submitting = true;
        }) {
            return Outcome::Detached;
        }
        let busy = BusyGuard::new(&self.shared, Busy::Submitting);
        let context = ClassifyContext::for_credentials(&credentials);
        tracing::info!(?credentials, "portal login");

        let reply = match self.logon_and_confirm(&credentials).await {
            Ok(reply) => reply,
            Err(err) => {
                let category = classify(&err, context);
                tracing::warn!(error = %err, code = category.code(), "login failed");
                if !self.shared.update(|state| state.error = Some(category)) {
                    return Outcome::Detached;
                }
                return Outcome::Failed(category);
            }
        };

        // The refreshed status is authoritative either way.
        let client_state = reply.client_state();
        let rejection = (!client_state.is_authorized()).then(|| {
            let err = PortalError::Rejected { endpoint: Endpoint::Status, state: client_state };
            classify(&err, context)
        });
        if !self.shared.update(|state| {
            state.apply_status(&reply);
            state.error = rejection;
        }) {
            return Outcome::Detached;
        }
        if let Some(category) = rejection {
            tracing::warn!(%client_state, code = category.code(), "login not confirmed by status");
            return Outcome::Failed(category);
        }
        drop(busy);

        let target = self.shared.redirect.clone();
        match &target {
            Some(target) if self.is_mounted() => {
                tracing::info!(%target, "login confirmed, redirecting");
                self.shared.navigator.navigate(target);
            }
            Some(_) => return Outcome::Detached,
            None => tracing::info!("login confirmed"),
        }
        Outcome::Done(target)
    }

    async fn logon_and_confirm(&self, credentials: &Credentials) -> Result<StatusReply, PortalError> {
        match self.shared.transport.logon(credentials).await? {
            LogonReply::Authorized { session_id, .. } => {
                tracing::debug!(?session_id, "logon accepted");
            }
            LogonReply::Rejected { state, message } => {
                tracing::debug!(%state, %message, "logon rejected");
                return Err(PortalError::Rejected { endpoint: Endpoint::Logon, state });
            }
        }
        self.shared.transport.status().await
    }

    /// Log off. The client is de-authorized locally whether or not the
    /// portal call succeeds; a failure is still reported.
    pub async fn logout(&self) -> Outcome<()> {
        let _turn = self.shared.gate.lock().await;
        if !self.shared.update(|state| {
            state.error = None;
            // A submission supersedes the mount-time loading state.
            state.is_loading = false;
            state.is_submitting = true;
        }) {
            return Outcome::Detached;
        }
        let _busy = BusyGuard::new(&self.shared, Busy::Submitting);

        let error = match self.shared.transport.logoff().await {
            Ok(reply) => {
                tracing::debug!(client_state = %reply.client_state, message = %reply.message, "logoff complete");
                None
            }
            Err(err) => {
                let category = classify(&err, ClassifyContext::anonymous());
                tracing::warn!(error = %err, code = category.code(), "logoff failed, clearing locally");
                Some(category)
            }
        };

        if !self.shared.update(|state| {
            state.authorization = ClientState::Unauthorized;
            state.session = None;
            state.error = error;
        }) {
            return Outcome::Detached;
        }
        match error {
            Some(category) => Outcome::Failed(category),
            None => Outcome::Done(()),
        }
    }
}
