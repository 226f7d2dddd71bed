//! Request-time path gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs on the server before a protected page is rendered. It sees only the
//! request-attached edge records (the durable surface lives in the browser),
//! so it answers one question: does this request carry any session marker?
//! Role checks happen later, after hydration, in the render gate.
//!
//! TRADE-OFFS
//! ==========
//! The edge records are written by client code and are not signed. A forged
//! marker gets the page shell and nothing else; every data call is still
//! authorized by the identity server.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;

use crate::config::SessionConfig;

/// The two edge records as read off a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeRecords {
    pub marker: Option<String>,
    pub role: Option<String>,
}

impl EdgeRecords {
    /// Pull the marker and role records out of a raw `Cookie` header.
    #[must_use]
    pub fn from_cookie_header(header: &str, config: &SessionConfig) -> Self {
        let mut records = Self::default();
        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = urlencoding::decode(value.trim()).map_or_else(|_| value.trim().to_owned(), |v| v.into_owned());
            if name == config.edge_marker_record {
                records.marker = Some(value);
            } else if name == config.edge_role_record {
                records.role = Some(value);
            }
        }
        records
    }

    /// True when either record carries a non-empty value.
    #[must_use]
    pub fn has_session(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.marker) || present(&self.role)
    }
}

/// What to do with a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

/// Pure path gate over [`EdgeRecords`].
#[derive(Clone, Debug, Default)]
pub struct RouteInterceptor {
    config: SessionConfig,
}

impl RouteInterceptor {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Public pages and static assets never need a session.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        if self.config.public_paths.iter().any(|p| p == path) {
            return true;
        }
        if self.config.asset_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return true;
        }
        let last = path.rsplit('/').next().unwrap_or(path);
        last.rsplit_once('.')
            .is_some_and(|(_, ext)| self.config.asset_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// `/dashboard` itself or anything under `/dashboard/`.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        let prefix = self.config.protected_prefix.trim_end_matches('/');
        path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
    }

    #[must_use]
    pub fn intercept(&self, path: &str, records: &EdgeRecords) -> Decision {
        if self.is_public(path) || !self.is_protected(path) {
            return Decision::Allow;
        }
        if records.has_session() {
            return Decision::Allow;
        }
        tracing::debug!(path, "no session marker; redirecting to login");
        Decision::Redirect(self.login_redirect(path))
    }

    /// `/login?returnTo=<encoded path>`.
    #[must_use]
    pub fn login_redirect(&self, path: &str) -> String {
        format!("{}?{}={}", self.config.login_path, self.config.return_to_param, urlencoding::encode(path))
    }
}

/// Accept a post-login return target only when it is a same-origin
/// absolute path.
#[must_use]
pub fn safe_return_target(raw: &str) -> Option<String> {
    let target = raw.trim();
    if !target.starts_with('/') || target.starts_with("//") || target.contains('\\') {
        return None;
    }
    if target.chars().any(char::is_control) {
        return None;
    }
    Some(target.to_owned())
}
