//! Reactive session state for one tab.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` is built at the application root and handed down
//! through context. The render tree observes it; the bootstrap sequencer,
//! the login/register/logout actions and cross-tab notifications write it.
//!
//! LIFECYCLE
//! =========
//! `Cold` until [`SessionStore::hydrate`] reads the durable surface, then
//! `HydratedEmpty` or `HydratedPresent`. Hydration subscribes to the
//! durable surface's change feed once; every notification re-reads and
//! re-applies. [`SessionStore::dispose`] detaches everything.
//!
//! CONSISTENCY
//! ===========
//! [`SessionStore::set_session`] is the only mutator and writes memory and
//! both mirrors in one call. Other tabs converge within one storage-event
//! tick; there is no cross-tab transaction.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::codec::{self, DecodedClaims};
use crate::principal::{Credential, Principal, SessionState};
use crate::role::{self, Role};
use crate::store::{ChangeFeed, DualStore, ListenerId};

/// Hydration phase of the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Cold,
    HydratedEmpty,
    HydratedPresent,
}

/// What observers see after every change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub hydrated: bool,
}

impl SessionSnapshot {
    /// Claims of the held credential, decoded on demand.
    #[must_use]
    pub fn claims(&self) -> Option<DecodedClaims> {
        self.state.credential.as_ref().and_then(|c| codec::decode(c.as_str()))
    }

    /// Render-time effective role.
    #[must_use]
    pub fn effective_role(&self) -> Role {
        role::resolve(self.state.principal.as_ref(), self.claims().as_ref())
    }
}

pub type ObserverId = u64;
type Observer = Rc<dyn Fn(&SessionSnapshot)>;

struct Inner {
    mirror: DualStore,
    feed: Option<Rc<dyn ChangeFeed>>,
    state: RefCell<SessionState>,
    hydrated: Cell<bool>,
    feed_listener: Cell<Option<ListenerId>>,
    observers: RefCell<Vec<(ObserverId, Observer)>>,
    next_observer: Cell<ObserverId>,
}

/// Cheaply clonable handle on the tab's session state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl SessionStore {
    /// Build a cold store. `feed` is `None` where no cross-tab signal exists
    /// (server rendering).
    pub fn new(mirror: DualStore, feed: Option<Rc<dyn ChangeFeed>>) -> Self {
        Self {
            inner: Rc::new(Inner {
                mirror,
                feed,
                state: RefCell::new(SessionState::default()),
                hydrated: Cell::new(false),
                feed_listener: Cell::new(None),
                observers: RefCell::new(Vec::new()),
                next_observer: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn mirror(&self) -> &DualStore {
        &self.inner.mirror
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot { state: self.inner.state.borrow().clone(), hydrated: self.inner.hydrated.get() }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.inner.hydrated.get()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if !self.inner.hydrated.get() {
            Phase::Cold
        } else if self.inner.state.borrow().is_empty() {
            Phase::HydratedEmpty
        } else {
            Phase::HydratedPresent
        }
    }

    #[must_use]
    pub fn effective_role(&self) -> Role {
        self.snapshot().effective_role()
    }

    /// Read the durable surface into memory, re-align the edge records with
    /// it, mark hydrated, and subscribe to cross-tab changes (first call only).
    pub fn hydrate(&self) {
        let next = self.inner.mirror.read_state();
        let role = role_for(&next);
        if let Err(e) = self.inner.mirror.write_edge_for(&next, role) {
            tracing::warn!(error = %e, "edge refresh during hydrate failed");
        }
        self.apply(next, true);
        self.attach_feed();
    }

    /// Replace the session. Memory first, then both mirrors, then observers.
    /// Calling twice with the same values notifies observers once.
    pub fn set_session(&self, principal: Option<Principal>, credential: Option<Credential>) {
        let next = SessionState::new(principal, credential);
        let changed = *self.inner.state.borrow() != next;
        *self.inner.state.borrow_mut() = next.clone();

        let role = role_for(&next);
        if let Err(e) = self.inner.mirror.write(&next, role) {
            tracing::warn!(error = %e, "session mirror write failed; session will not survive reload");
        }

        if changed {
            tracing::info!(
                authenticated = next.is_authenticated(),
                has_credential = next.credential.is_some(),
                role = %role,
                "session updated"
            );
            self.notify();
        }
    }

    /// Register a render-tree observer.
    pub fn subscribe(&self, observer: impl Fn(&SessionSnapshot) + 'static) -> ObserverId {
        let id = self.inner.next_observer.get() + 1;
        self.inner.next_observer.set(id);
        self.inner.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        self.inner.observers.borrow_mut().retain(|(oid, _)| *oid != id);
    }

    /// Detach from the change feed and drop every observer.
    pub fn dispose(&self) {
        if let (Some(feed), Some(id)) = (&self.inner.feed, self.inner.feed_listener.take()) {
            feed.unsubscribe(id);
        }
        self.inner.observers.borrow_mut().clear();
    }

    fn attach_feed(&self) {
        let Some(feed) = &self.inner.feed else {
            return;
        };
        if self.inner.feed_listener.get().is_some() {
            return;
        }
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let id = feed.subscribe(Rc::new(move |_changed| {
            if let Some(inner) = weak.upgrade() {
                let store = SessionStore { inner };
                tracing::debug!(topic = crate::store::SESSION_CHANGED_TOPIC, "re-reading session after external change");
                let next = store.inner.mirror.read_state();
                store.apply(next, true);
            }
        }));
        self.inner.feed_listener.set(Some(id));
    }

    fn apply(&self, next: SessionState, hydrated: bool) {
        let was_hydrated = self.inner.hydrated.replace(hydrated);
        let changed = *self.inner.state.borrow() != next || was_hydrated != hydrated;
        *self.inner.state.borrow_mut() = next;
        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let observers: Vec<Observer> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer(&snapshot);
        }
    }
}

fn role_for(state: &SessionState) -> Role {
    let claims = state.credential.as_ref().and_then(|c| codec::decode(c.as_str()));
    role::resolve(state.principal.as_ref(), claims.as_ref())
}
