//! Contracts with the outside world: the remote identity server and the
//! page's own location bar.
//!
//! The identity server is the only authority on who the user is. This crate
//! calls it through [`IdentityService`] and never re-specifies its
//! behavior. Implementations normalize raw responses with
//! [`crate::principal::AuthPayload::from_response`] before returning.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::IdentityError;
use crate::principal::{AuthPayload, Credential, Principal};
use crate::role::Role;

/// Fields sent to the register endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFields {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Requested account type; the server decides what is granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Remote identity server contract.
///
/// `?Send`: browser futures are single-threaded.
#[async_trait(?Send)]
pub trait IdentityService {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, IdentityError>;

    async fn register(&self, fields: &RegisterFields) -> Result<AuthPayload, IdentityError>;

    /// Resolve the principal behind a bearer credential. `Ok(None)` when the
    /// server rejects it.
    async fn resolve_from_credential(&self, credential: &Credential) -> Result<Option<Principal>, IdentityError>;

    /// Resolve an existing server session by cookie alone, no bearer token.
    async fn current_session_from_cookie(&self) -> Result<Option<Principal>, IdentityError>;

    /// Invalidate the server-side session.
    async fn logout(&self) -> Result<(), IdentityError>;
}

/// The current page's URL and navigation.
pub trait PageLocation {
    /// Value of a query parameter on the current URL.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Remove a query parameter from the visible URL without navigating.
    fn strip_query_param(&self, name: &str);

    /// In-app redirect to `path`.
    fn redirect(&self, path: &str);

    /// Full top-level navigation (leaves the app).
    fn navigate_top_level(&self, url: &str);
}

/// Look up `name` in a raw query string (`?a=1&b=2` or `a=1&b=2`).
#[must_use]
pub fn parse_query_param(query: &str, name: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| decode_component(key) == name)
        .map(|(_, value)| decode_component(value))
        .filter(|value| !value.is_empty())
}

/// Rebuild `path?query#fragment` with every `name` parameter removed.
#[must_use]
pub fn remove_query_param(url: &str, name: &str) -> String {
    let (before_fragment, fragment) = match url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (url, None),
    };
    let (path, query) = before_fragment.split_once('?').unwrap_or((before_fragment, ""));

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(k, _)| k);
            decode_component(key) != name
        })
        .collect();

    let mut out = path.to_owned();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::cell::RefCell;

    use super::*;

    type Hook = Box<dyn Fn()>;

    /// Scripted identity server. Each response is consumed by one call;
    /// unscripted calls answer `Ok(None)` / empty payloads.
    #[derive(Default)]
    pub struct FakeIdentity {
        pub login: RefCell<Option<Result<AuthPayload, IdentityError>>>,
        pub register: RefCell<Option<Result<AuthPayload, IdentityError>>>,
        pub resolve: RefCell<Option<Result<Option<Principal>, IdentityError>>>,
        pub cookie_session: RefCell<Option<Result<Option<Principal>, IdentityError>>>,
        pub logout: RefCell<Option<Result<(), IdentityError>>>,
        /// Runs inside every call, before it answers.
        pub during_call: RefCell<Option<Hook>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeIdentity {
        fn record(&self, call: &str) {
            self.calls.borrow_mut().push(call.to_owned());
            if let Some(hook) = self.during_call.borrow().as_ref() {
                hook();
            }
        }

        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl IdentityService for FakeIdentity {
        async fn login(&self, email: &str, _password: &str) -> Result<AuthPayload, IdentityError> {
            self.record(&format!("login:{email}"));
            self.login.borrow_mut().take().unwrap_or_else(|| Ok(AuthPayload::default()))
        }

        async fn register(&self, fields: &RegisterFields) -> Result<AuthPayload, IdentityError> {
            self.record(&format!("register:{}", fields.email));
            self.register.borrow_mut().take().unwrap_or_else(|| Ok(AuthPayload::default()))
        }

        async fn resolve_from_credential(&self, credential: &Credential) -> Result<Option<Principal>, IdentityError> {
            self.record(&format!("resolve:{}", credential.as_str()));
            self.resolve.borrow_mut().take().unwrap_or(Ok(None))
        }

        async fn current_session_from_cookie(&self) -> Result<Option<Principal>, IdentityError> {
            self.record("cookie_session");
            self.cookie_session.borrow_mut().take().unwrap_or(Ok(None))
        }

        async fn logout(&self) -> Result<(), IdentityError> {
            self.record("logout");
            self.logout.borrow_mut().take().unwrap_or(Ok(()))
        }
    }

    /// Location bar backed by a plain string.
    pub struct FakeLocation {
        pub url: RefCell<String>,
        pub redirects: RefCell<Vec<String>>,
        pub top_level: RefCell<Vec<String>>,
    }

    impl FakeLocation {
        #[must_use]
        pub fn at(url: &str) -> Self {
            Self {
                url: RefCell::new(url.to_owned()),
                redirects: RefCell::new(Vec::new()),
                top_level: RefCell::new(Vec::new()),
            }
        }

        #[must_use]
        pub fn url(&self) -> String {
            self.url.borrow().clone()
        }

        #[must_use]
        pub fn last_redirect(&self) -> Option<String> {
            self.redirects.borrow().last().cloned()
        }
    }

    impl PageLocation for FakeLocation {
        fn query_param(&self, name: &str) -> Option<String> {
            let url = self.url.borrow();
            let query = url.split_once('?').map_or("", |(_, q)| q);
            let query = query.split_once('#').map_or(query, |(q, _)| q);
            parse_query_param(query, name)
        }

        fn strip_query_param(&self, name: &str) {
            let next = remove_query_param(&self.url.borrow(), name);
            *self.url.borrow_mut() = next;
        }

        fn redirect(&self, path: &str) {
            self.redirects.borrow_mut().push(path.to_owned());
        }

        fn navigate_top_level(&self, url: &str) {
            self.top_level.borrow_mut().push(url.to_owned());
        }
    }
}
