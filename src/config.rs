//! Session-layer configuration: storage keys, record names, paths, lifetimes.
//!
//! DESIGN
//! ======
//! `SessionConfig::default()` carries the production values. Fields are
//! public so the server can override lifetime/secure flags from its
//! environment and tests can shrink or rename things without globals.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Durable-surface key holding the serialized principal.
pub const DURABLE_USER_KEY: &str = "auth:user";
/// Durable-surface key holding the raw credential.
pub const DURABLE_TOKEN_KEY: &str = "auth:token";
/// Edge record carrying the presence-only session marker.
pub const EDGE_MARKER_RECORD: &str = "auth_token";
/// Edge record carrying the role hint.
pub const EDGE_ROLE_RECORD: &str = "role";
/// Value written to the marker record. Presence is all that matters.
pub const EDGE_MARKER_VALUE: &str = "1";
/// One-time query parameter left by the external identity redirect.
pub const SSO_TOKEN_PARAM: &str = "token";
/// Query parameter carrying the post-login return target.
pub const RETURN_TO_PARAM: &str = "returnTo";
/// Default edge record lifetime: seven days.
pub const DEFAULT_EDGE_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

/// Everything the session layer needs to know about names and paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub durable_user_key: String,
    pub durable_token_key: String,
    pub edge_marker_record: String,
    pub edge_role_record: String,
    /// Lifetime shared by both edge records.
    pub edge_max_age_secs: u64,
    /// Add `Secure` to edge records (pages served over https).
    pub edge_secure: bool,
    pub sso_token_param: String,
    pub return_to_param: String,
    pub login_path: String,
    /// Top-level navigation target after local logout.
    pub logout_path: String,
    /// Paths reachable without a session (exact match).
    pub public_paths: Vec<String>,
    /// Prefix of the tree that requires a session marker.
    pub protected_prefix: String,
    /// URL prefixes that always pass the interceptor (bundles, images).
    pub asset_prefixes: Vec<String>,
    /// File extensions that always pass the interceptor.
    pub asset_extensions: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            durable_user_key: DURABLE_USER_KEY.to_owned(),
            durable_token_key: DURABLE_TOKEN_KEY.to_owned(),
            edge_marker_record: EDGE_MARKER_RECORD.to_owned(),
            edge_role_record: EDGE_ROLE_RECORD.to_owned(),
            edge_max_age_secs: DEFAULT_EDGE_MAX_AGE_SECS,
            edge_secure: false,
            sso_token_param: SSO_TOKEN_PARAM.to_owned(),
            return_to_param: RETURN_TO_PARAM.to_owned(),
            login_path: "/login".to_owned(),
            logout_path: "/auth/logout".to_owned(),
            public_paths: ["/", "/login", "/register", "/forgot-password", "/reset-password", "/auth/callback"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            protected_prefix: "/dashboard".to_owned(),
            asset_prefixes: ["/pkg/", "/assets/", "/static/", "/favicon"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            asset_extensions: [
                "js", "mjs", "css", "wasm", "map", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "woff",
                "woff2", "ttf", "txt",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
        }
    }
}

impl SessionConfig {
    /// Return a copy with the `Secure` flag set for edge records.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.edge_secure = secure;
        self
    }

    /// Return a copy with a different edge record lifetime.
    #[must_use]
    pub fn with_edge_max_age(mut self, secs: u64) -> Self {
        self.edge_max_age_secs = secs;
        self
    }

    /// Return a copy with a different login path.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Whether `key` is one of the durable keys this layer owns.
    #[must_use]
    pub fn is_session_key(&self, key: &str) -> bool {
        key == self.durable_user_key || key == self.durable_token_key
    }
}
