//! Leptos bridge for the tab's session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store itself is single-threaded (`Rc` inside) and only exists in the
//! browser. Components read a `RwSignal<SessionSnapshot>` that the store's
//! observer keeps current; event handlers reach the store through
//! [`SessionContext::store`], which is hydrate-only.
//!
//! On the server the snapshot stays cold, so every gate renders its
//! placeholder and the client takes over after hydration.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;
use wheelhouse_session::{GateDecision, Role, SessionSnapshot};

#[derive(Clone, Copy)]
pub struct SessionContext {
    snapshot: RwSignal<SessionSnapshot>,
    #[cfg(feature = "hydrate")]
    store: StoredValue<wheelhouse_session::SessionStore, LocalStorage>,
}

impl SessionContext {
    /// Build the context for this render environment.
    pub fn install() -> Self {
        #[cfg(feature = "hydrate")]
        {
            Self::attach(crate::util::storage::browser_session_store())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Self::detached()
        }
    }

    /// Mirror `store` into a signal.
    #[cfg(feature = "hydrate")]
    pub fn attach(store: wheelhouse_session::SessionStore) -> Self {
        let snapshot = RwSignal::new(store.snapshot());
        store.subscribe(move |next| snapshot.set(next.clone()));
        Self { snapshot, store: StoredValue::new_local(store) }
    }

    /// A context with no store behind it; stays cold.
    #[cfg(not(feature = "hydrate"))]
    pub fn detached() -> Self {
        Self { snapshot: RwSignal::new(SessionSnapshot::default()) }
    }

    #[cfg(feature = "hydrate")]
    pub fn store(&self) -> wheelhouse_session::SessionStore {
        self.store.get_value()
    }

    pub fn snapshot(&self) -> RwSignal<SessionSnapshot> {
        self.snapshot
    }

    /// Tracked gate decision for a subtree.
    pub fn decision(&self, required: Option<Role>) -> GateDecision {
        GateDecision::from_snapshot(&self.snapshot.get(), required)
    }

    /// Tracked effective role.
    pub fn role(&self) -> Role {
        self.snapshot.with(SessionSnapshot::effective_role)
    }

    /// Tracked display label for the signed-in principal.
    pub fn label(&self) -> Option<String> {
        self.snapshot
            .with(|s| s.state.principal.as_ref().map(|p| p.label().to_owned()))
    }

    pub fn has_session(&self) -> bool {
        self.snapshot.with(|s| !s.state.is_empty())
    }
}
