//! `localStorage`, `document.cookie` and `storage` events as session surfaces.
//!
//! ERROR HANDLING
//! ==============
//! A missing window or storage object (private mode, sandboxed iframe) reads
//! as empty and fails writes with `StorageError::Unavailable`. The session
//! store logs those and keeps the in-memory session.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use wheelhouse_session::SessionConfig;

/// Value of cookie `name` in a `document.cookie` string.
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| urlencoding::decode(value).map_or_else(|_| value.to_owned(), |v| v.into_owned()))
        .filter(|value| !value.is_empty())
}

/// Whether a `storage` event for `key` concerns the session.
/// `None` means the whole store was cleared.
pub fn is_session_change(key: Option<&str>, config: &SessionConfig) -> bool {
    key.is_none_or(|key| config.is_session_key(key))
}

/// Session config for a page served over `protocol` (`"https:"` etc.).
pub fn config_for_protocol(protocol: &str) -> SessionConfig {
    SessionConfig::default().with_secure(protocol.eq_ignore_ascii_case("https:"))
}

#[cfg(feature = "hydrate")]
pub use browser::*;

#[cfg(feature = "hydrate")]
mod browser {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use wheelhouse_session::store::{
        ChangeFeed, DualStore, DurableSurface, EdgeAttributes, EdgeSurface, ListenerId, SessionChanged,
    };
    use wheelhouse_session::{SessionConfig, SessionStore, StorageError};

    use super::{config_for_protocol, is_session_change, read_cookie};

    /// The tab's session store over real browser surfaces.
    pub fn browser_session_store() -> SessionStore {
        let protocol = web_sys::window()
            .and_then(|w| w.location().protocol().ok())
            .unwrap_or_default();
        let config = config_for_protocol(&protocol);
        let feed: Rc<dyn ChangeFeed> = Rc::new(StorageEventFeed::new(config.clone()));
        let mirror = DualStore::new(Rc::new(LocalStorageSurface), Rc::new(CookieSurface), config);
        SessionStore::new(mirror, Some(feed))
    }

    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StorageError::Unavailable("localStorage".to_owned()))
    }

    fn html_document() -> Result<web_sys::HtmlDocument, StorageError> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
            .ok_or_else(|| StorageError::Unavailable("document.cookie".to_owned()))
    }

    fn write_failed(key: &str, err: &wasm_bindgen::JsValue) -> StorageError {
        StorageError::Write { key: key.to_owned(), reason: format!("{err:?}") }
    }

    /// `window.localStorage`.
    pub struct LocalStorageSurface;

    impl DurableSurface for LocalStorageSurface {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            local_storage()?
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            local_storage()?.set_item(key, value).map_err(|e| write_failed(key, &e))
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            local_storage()?.remove_item(key).map_err(|e| write_failed(key, &e))
        }
    }

    /// `document.cookie`, written with the shared edge attributes.
    pub struct CookieSurface;

    impl EdgeSurface for CookieSurface {
        fn set_record(&self, name: &str, value: &str, attrs: &EdgeAttributes) -> Result<(), StorageError> {
            html_document()?
                .set_cookie(&attrs.cookie_string(name, value))
                .map_err(|e| write_failed(name, &e))
        }

        fn clear_record(&self, name: &str, attrs: &EdgeAttributes) -> Result<(), StorageError> {
            html_document()?
                .set_cookie(&attrs.expired_cookie_string(name))
                .map_err(|e| write_failed(name, &e))
        }

        fn get_record(&self, name: &str) -> Option<String> {
            let cookies = html_document().ok()?.cookie().ok()?;
            read_cookie(&cookies, name)
        }
    }

    type StorageListener = Closure<dyn Fn(web_sys::StorageEvent)>;

    /// `storage` events on `window`, filtered to the session keys.
    ///
    /// Browsers raise these only in tabs other than the writer.
    pub struct StorageEventFeed {
        config: SessionConfig,
        listeners: RefCell<Vec<(ListenerId, StorageListener)>>,
        next_id: Cell<ListenerId>,
    }

    impl StorageEventFeed {
        pub fn new(config: SessionConfig) -> Self {
            Self { config, listeners: RefCell::new(Vec::new()), next_id: Cell::new(0) }
        }
    }

    impl ChangeFeed for StorageEventFeed {
        fn subscribe(&self, listener: Rc<dyn Fn(SessionChanged)>) -> ListenerId {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);

            let config = self.config.clone();
            let closure: StorageListener = Closure::new(move |event: web_sys::StorageEvent| {
                if is_session_change(event.key().as_deref(), &config) {
                    listener(SessionChanged);
                }
            });
            match web_sys::window() {
                Some(window) => {
                    if let Err(e) =
                        window.add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
                    {
                        tracing::warn!(error = ?e, "storage listener not installed; no cross-tab sync");
                    }
                }
                None => tracing::warn!("no window; no cross-tab sync"),
            }
            self.listeners.borrow_mut().push((id, closure));
            id
        }

        fn unsubscribe(&self, id: ListenerId) {
            let mut listeners = self.listeners.borrow_mut();
            let Some(index) = listeners.iter().position(|(lid, _)| *lid == id) else {
                return;
            };
            let (_, closure) = listeners.remove(index);
            if let Some(window) = web_sys::window() {
                if let Err(e) =
                    window.remove_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
                {
                    tracing::warn!(error = ?e, "storage listener removal failed");
                }
            }
        }
    }
}
