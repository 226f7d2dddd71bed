//! In-memory storage surfaces.
//!
//! Used by SSR rendering (where no browser storage exists) and by tests.
//! [`MemoryDurable::open_tab`] hands out another handle on the same backing
//! map with its own tab identity, and writes notify only the other tabs'
//! listeners, matching how a browser raises `storage` events.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::StorageError;
use crate::store::{ChangeFeed, DurableSurface, EdgeAttributes, EdgeSurface, ListenerId, SessionChanged};

type Listener = Rc<dyn Fn(SessionChanged)>;

#[derive(Default)]
struct SharedDurable {
    items: BTreeMap<String, String>,
    listeners: Vec<(u64, ListenerId, Listener)>,
    next_listener: ListenerId,
    next_tab: u64,
    fail_writes: bool,
}

/// Durable surface backed by a map shared between simulated tabs.
#[derive(Clone)]
pub struct MemoryDurable {
    shared: Rc<RefCell<SharedDurable>>,
    tab: u64,
}

impl Default for MemoryDurable {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDurable {
    #[must_use]
    pub fn new() -> Self {
        Self { shared: Rc::new(RefCell::new(SharedDurable::default())), tab: 0 }
    }

    /// Another tab on the same origin.
    #[must_use]
    pub fn open_tab(&self) -> Self {
        let tab = {
            let mut shared = self.shared.borrow_mut();
            shared.next_tab += 1;
            shared.next_tab
        };
        Self { shared: Rc::clone(&self.shared), tab }
    }

    /// Make every subsequent write fail as if quota were exceeded.
    pub fn set_fail_writes(&self, fail: bool) {
        self.shared.borrow_mut().fail_writes = fail;
    }

    /// Direct read, bypassing the surface contract.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.shared.borrow().items.get(key).cloned()
    }

    /// Listeners registered across all tabs.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared.borrow().listeners.len()
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.shared.borrow().fail_writes {
            return Err(StorageError::Write { key: key.to_owned(), reason: "quota exceeded".to_owned() });
        }
        Ok(())
    }

    fn notify_other_tabs(&self) {
        // Collect first; listeners read the store again.
        let targets: Vec<Listener> = self
            .shared
            .borrow()
            .listeners
            .iter()
            .filter(|(tab, _, _)| *tab != self.tab)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        for listener in targets {
            listener(SessionChanged);
        }
    }
}

impl DurableSurface for MemoryDurable {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let changed = {
            let mut shared = self.shared.borrow_mut();
            let previous = shared.items.insert(key.to_owned(), value.to_owned());
            previous.as_deref() != Some(value)
        };
        if changed {
            self.notify_other_tabs();
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let changed = self.shared.borrow_mut().items.remove(key).is_some();
        if changed {
            self.notify_other_tabs();
        }
        Ok(())
    }
}

impl ChangeFeed for MemoryDurable {
    fn subscribe(&self, listener: Rc<dyn Fn(SessionChanged)>) -> ListenerId {
        let mut shared = self.shared.borrow_mut();
        shared.next_listener += 1;
        let id = shared.next_listener;
        shared.listeners.push((self.tab, id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.shared.borrow_mut().listeners.retain(|(_, lid, _)| *lid != id);
    }
}

#[derive(Default)]
struct EdgeJar {
    records: BTreeMap<String, (String, EdgeAttributes)>,
    fail_writes: bool,
}

/// Edge surface backed by a shared map; clones share records, like cookies
/// shared by every tab of an origin.
#[derive(Clone, Default)]
pub struct MemoryEdge {
    inner: Rc<RefCell<EdgeJar>>,
}

impl MemoryEdge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Attributes the record was last written with.
    #[must_use]
    pub fn attributes(&self, name: &str) -> Option<EdgeAttributes> {
        self.inner.borrow().records.get(name).map(|(_, attrs)| attrs.clone())
    }

    /// Render the live records as a request `Cookie` header.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        self.inner
            .borrow()
            .records
            .iter()
            .map(|(name, (value, _))| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn check_writable(&self, name: &str) -> Result<(), StorageError> {
        if self.inner.borrow().fail_writes {
            return Err(StorageError::Write { key: name.to_owned(), reason: "cookies disabled".to_owned() });
        }
        Ok(())
    }
}

impl EdgeSurface for MemoryEdge {
    fn set_record(&self, name: &str, value: &str, attrs: &EdgeAttributes) -> Result<(), StorageError> {
        self.check_writable(name)?;
        let mut inner = self.inner.borrow_mut();
        if value.is_empty() || attrs.max_age_secs == 0 {
            inner.records.remove(name);
        } else {
            inner.records.insert(name.to_owned(), (value.to_owned(), attrs.clone()));
        }
        Ok(())
    }

    fn clear_record(&self, name: &str, _attrs: &EdgeAttributes) -> Result<(), StorageError> {
        self.check_writable(name)?;
        self.inner.borrow_mut().records.remove(name);
        Ok(())
    }

    fn get_record(&self, name: &str) -> Option<String> {
        self.inner.borrow().records.get(name).map(|(value, _)| value.clone())
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::config::SessionConfig;
    use crate::session::SessionStore;
    use crate::store::DualStore;

    /// A session store wired to fresh in-memory surfaces.
    pub struct MemoryTab {
        pub session: SessionStore,
        pub durable: MemoryDurable,
        pub edge: MemoryEdge,
    }

    #[must_use]
    pub fn memory_tab() -> MemoryTab {
        let durable = MemoryDurable::new();
        let edge = MemoryEdge::new();
        let mirror = DualStore::new(Rc::new(durable.clone()), Rc::new(edge.clone()), SessionConfig::default());
        let feed: Rc<dyn ChangeFeed> = Rc::new(durable.clone());
        MemoryTab { session: SessionStore::new(mirror, Some(feed)), durable, edge }
    }
}
