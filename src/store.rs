//! The two client-held representations of session state.
//!
//! ARCHITECTURE
//! ============
//! - Durable surface: per-origin key-value store that survives reloads and
//!   is shared by every tab (`localStorage`). Holds `auth:user` (JSON
//!   principal) and `auth:token` (raw credential).
//! - Edge surface: small path-scoped records attached to every request
//!   (`auth_token` marker, `role` hint). The request interceptor reads them
//!   before the page exists, so it never sees the durable surface.
//!
//! INVARIANTS
//! ==========
//! [`DualStore::write`] is the only write path and always issues both
//! surfaces in the same call. A reload must never observe durable-says-in
//! with the edge marker missing, or the interceptor would bounce the user
//! to the login page.
//!
//! In-page code does not read the edge surface for protected decisions.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::rc::Rc;

use crate::config::{EDGE_MARKER_VALUE, SessionConfig};
use crate::error::StorageError;
use crate::principal::{Credential, Principal, SessionState};
use crate::role::Role;

/// Persistent per-origin key-value store.
pub trait DurableSurface {
    /// Read a key. `Ok(None)` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// "Session state may have changed in another tab; re-read."
///
/// Deliberately carries no value: a payload could be stale relative to a
/// concurrent write, and notifications may be coalesced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionChanged;

/// Topic name of [`SessionChanged`] for logs and bridges.
pub const SESSION_CHANGED_TOPIC: &str = "session-changed";

/// Handle returned by [`ChangeFeed::subscribe`].
pub type ListenerId = u64;

/// Cross-tab change notification on the durable surface's key space.
pub trait ChangeFeed {
    fn subscribe(&self, listener: Rc<dyn Fn(SessionChanged)>) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
}

/// `SameSite` attribute for edge records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// Lifetime and scoping shared by every edge record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeAttributes {
    pub path: String,
    pub max_age_secs: u64,
    pub same_site: SameSite,
    pub secure: bool,
}

impl EdgeAttributes {
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            path: "/".to_owned(),
            max_age_secs: config.edge_max_age_secs,
            same_site: SameSite::Lax,
            secure: config.edge_secure,
        }
    }

    /// Record string for `document.cookie`.
    #[must_use]
    pub fn cookie_string(&self, name: &str, value: &str) -> String {
        self.render(name, &urlencoding::encode(value), self.max_age_secs)
    }

    /// Record string that expires `name` immediately.
    #[must_use]
    pub fn expired_cookie_string(&self, name: &str) -> String {
        self.render(name, "", 0)
    }

    fn render(&self, name: &str, value: &str, max_age: u64) -> String {
        let mut out = format!("{name}={value}; Path={}; Max-Age={max_age}", self.path);
        if max_age == 0 {
            out.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        }
        out.push_str("; SameSite=");
        out.push_str(self.same_site.as_str());
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

/// Request-attached records readable by the edge interceptor.
pub trait EdgeSurface {
    fn set_record(&self, name: &str, value: &str, attrs: &EdgeAttributes) -> Result<(), StorageError>;
    /// Expire a record immediately; never writes a tombstone value.
    fn clear_record(&self, name: &str, attrs: &EdgeAttributes) -> Result<(), StorageError>;
    fn get_record(&self, name: &str) -> Option<String>;
}

/// Read/write primitives over both surfaces.
#[derive(Clone)]
pub struct DualStore {
    durable: Rc<dyn DurableSurface>,
    edge: Rc<dyn EdgeSurface>,
    config: SessionConfig,
    attrs: EdgeAttributes,
}

impl DualStore {
    pub fn new(durable: Rc<dyn DurableSurface>, edge: Rc<dyn EdgeSurface>, config: SessionConfig) -> Self {
        let attrs = EdgeAttributes::from_config(&config);
        Self { durable, edge, config, attrs }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn edge_attributes(&self) -> &EdgeAttributes {
        &self.attrs
    }

    /// Mirrored principal, or `None` on missing key, storage failure, or
    /// unparseable value.
    #[must_use]
    pub fn read_user(&self) -> Option<Principal> {
        let raw = self.read_durable(&self.config.durable_user_key)?;
        match serde_json::from_str::<Principal>(&raw) {
            Ok(principal) => Some(principal),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unparseable durable principal");
                None
            }
        }
    }

    /// Mirrored credential, or `None`.
    #[must_use]
    pub fn read_token(&self) -> Option<Credential> {
        self.read_durable(&self.config.durable_token_key).and_then(Credential::new)
    }

    #[must_use]
    pub fn read_state(&self) -> SessionState {
        SessionState::new(self.read_user(), self.read_token())
    }

    fn read_durable(&self, key: &str) -> Option<String> {
        match self.durable.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "durable read failed; treating as absent");
                None
            }
        }
    }

    /// Mirror `state` into the durable surface. Both keys are attempted even
    /// if the first fails; the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first storage or serialization failure.
    pub fn write_durable(&self, state: &SessionState) -> Result<(), StorageError> {
        let user_key = &self.config.durable_user_key;
        let token_key = &self.config.durable_token_key;

        let user_result = match &state.principal {
            Some(principal) => serde_json::to_string(principal)
                .map_err(|source| StorageError::Serialize { key: user_key.clone(), source })
                .and_then(|raw| self.durable.set_item(user_key, &raw)),
            None => self.durable.remove_item(user_key),
        };
        let token_result = match &state.credential {
            Some(credential) => self.durable.set_item(token_key, credential.as_str()),
            None => self.durable.remove_item(token_key),
        };
        user_result.and(token_result)
    }

    /// Set or expire the two edge records with a shared lifetime.
    ///
    /// # Errors
    ///
    /// Returns the first record write failure; both records are attempted.
    pub fn write_edge(&self, marker: Option<&str>, role: Option<Role>) -> Result<(), StorageError> {
        let marker_name = &self.config.edge_marker_record;
        let role_name = &self.config.edge_role_record;

        let marker_result = match marker.filter(|m| !m.is_empty()) {
            Some(value) => self.edge.set_record(marker_name, value, &self.attrs),
            None => self.edge.clear_record(marker_name, &self.attrs),
        };
        let role_result = match role {
            Some(role) => self.edge.set_record(role_name, role.as_str(), &self.attrs),
            None => self.edge.clear_record(role_name, &self.attrs),
        };
        marker_result.and(role_result)
    }

    /// Write both surfaces for `state`. The edge marker is present exactly
    /// when the state holds any session evidence.
    ///
    /// # Errors
    ///
    /// Returns the first failure after attempting every write.
    pub fn write(&self, state: &SessionState, role: Role) -> Result<(), StorageError> {
        let durable = self.write_durable(state);
        let edge = self.write_edge_for(state, role);
        durable.and(edge)
    }

    /// Edge half only, derived from `state`. Used to re-align the edge
    /// records with a durable session that is already in place.
    ///
    /// # Errors
    ///
    /// Returns the first record write failure.
    pub fn write_edge_for(&self, state: &SessionState, role: Role) -> Result<(), StorageError> {
        if state.has_session() {
            self.write_edge(Some(EDGE_MARKER_VALUE), Some(role))
        } else {
            self.write_edge(None, None)
        }
    }
}
