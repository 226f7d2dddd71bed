//! One-shot session reconciliation after page load.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once per page load, after the session store's first hydration:
//! 1. A `token` query parameter left by the external identity redirect wins:
//!    it is stripped from the visible URL, resolved to a principal, stored,
//!    and the page is sent to the role's dashboard.
//! 2. Otherwise, when nothing is held locally, the identity server is asked
//!    for an existing cookie session.
//! 3. Otherwise the page renders its anonymous variant.
//!
//! ERROR HANDLING
//! ==============
//! Network failures are logged and swallowed. The worst case is an
//! anonymous render, which is always safe.
//!
//! CANCELLATION
//! ============
//! The one-shot guard doubles as a staleness check: once [`BootstrapSequencer::cancel`]
//! has run (component unmount), results that arrive late are dropped.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use std::cell::Cell;

use crate::codec;
use crate::config::SessionConfig;
use crate::identity::{IdentityService, PageLocation};
use crate::principal::{Credential, Principal};
use crate::role;
use crate::session::SessionStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Guard {
    Idle,
    Running,
    Finished,
}

/// How a bootstrap run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Already ran (or is running) for this page load.
    Skipped,
    /// Cancelled while a network call was in flight; results dropped.
    Stale,
    /// Consumed a hand-off token and redirected.
    SsoHandoff { landing: String },
    /// Picked up an existing server session and redirected.
    CookieSession { landing: String },
    /// Local state already held a session; nothing to do.
    AlreadyPresent,
    /// No session anywhere.
    Anonymous,
}

/// Guarded one-shot bootstrap.
#[derive(Debug)]
pub struct BootstrapSequencer {
    guard: Cell<Guard>,
    token_param: String,
}

impl BootstrapSequencer {
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self { guard: Cell::new(Guard::Idle), token_param: config.sso_token_param.clone() }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.guard.get() == Guard::Finished
    }

    /// Finish the guard early; in-flight results will be ignored.
    pub fn cancel(&self) {
        self.guard.set(Guard::Finished);
    }

    /// Run the sequence. Repeated calls are no-ops returning `Skipped`.
    pub async fn run(
        &self,
        session: &SessionStore,
        identity: &dyn IdentityService,
        location: &dyn PageLocation,
    ) -> BootstrapOutcome {
        if self.guard.get() != Guard::Idle {
            return BootstrapOutcome::Skipped;
        }
        self.guard.set(Guard::Running);

        if !session.is_hydrated() {
            session.hydrate();
        }

        let outcome = self.sequence(session, identity, location).await;
        if self.guard.get() == Guard::Running {
            self.guard.set(Guard::Finished);
        }
        tracing::info!(outcome = ?outcome, "bootstrap finished");
        outcome
    }

    fn is_stale(&self) -> bool {
        self.guard.get() != Guard::Running
    }

    async fn sequence(
        &self,
        session: &SessionStore,
        identity: &dyn IdentityService,
        location: &dyn PageLocation,
    ) -> BootstrapOutcome {
        if let Some(raw) = location.query_param(&self.token_param) {
            // Strip before anything can fail so a refresh never re-consumes it.
            location.strip_query_param(&self.token_param);
            if let Some(credential) = Credential::new(raw) {
                return self.consume_handoff(session, identity, location, credential).await;
            }
        }

        if !session.state().is_empty() {
            return BootstrapOutcome::AlreadyPresent;
        }

        let principal = match identity.current_session_from_cookie().await {
            Ok(principal) => principal,
            Err(e) => {
                tracing::warn!(error = %e, "cookie session lookup failed; continuing anonymous");
                None
            }
        };
        if self.is_stale() {
            return BootstrapOutcome::Stale;
        }
        let Some(principal) = principal else {
            return BootstrapOutcome::Anonymous;
        };

        let role = role::resolve(Some(&principal), None);
        session.set_session(Some(principal.with_role(role)), None);
        let landing = role.landing_path().to_owned();
        location.redirect(&landing);
        BootstrapOutcome::CookieSession { landing }
    }

    async fn consume_handoff(
        &self,
        session: &SessionStore,
        identity: &dyn IdentityService,
        location: &dyn PageLocation,
        credential: Credential,
    ) -> BootstrapOutcome {
        let claims = codec::decode(credential.as_str());
        let resolved = match identity.resolve_from_credential(&credential).await {
            Ok(principal) => principal,
            Err(e) => {
                tracing::warn!(error = %e, "hand-off token resolution failed; trying token claims");
                None
            }
        };
        if self.is_stale() {
            return BootstrapOutcome::Stale;
        }

        let Some(principal) = resolved.or_else(|| claims.as_ref().and_then(Principal::from_claims)) else {
            tracing::warn!("hand-off token yielded no principal; continuing anonymous");
            return BootstrapOutcome::Anonymous;
        };

        // The token was issued moments ago; its claim beats the user record.
        let role = role::reconcile(Some(&principal), claims.as_ref());
        session.set_session(Some(principal.with_role(role)), Some(credential));
        let landing = role.landing_path().to_owned();
        location.redirect(&landing);
        BootstrapOutcome::SsoHandoff { landing }
    }
}
