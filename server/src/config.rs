//! Server configuration from the environment.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read once at startup (after `.env` is loaded). Values here only shape the
//! edge gate and the logout cookies; the identity server is configured on
//! its own.
//!
//! VARIABLES
//! =========
//! - `PORT`: listen port, default 3000.
//! - `COOKIE_SECURE`: force the `Secure` cookie flag on or off. When unset,
//!   inferred from `PUBLIC_ORIGIN` being `https://`.
//! - `EDGE_MAX_AGE_SECS`: edge record lifetime, default seven days.
//! - `LOGIN_PATH`: where unauthenticated requests are sent, default `/login`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use wheelhouse_session::SessionConfig;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Parse the boolean spellings accepted in env files.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub session: SessionConfig,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns an error when a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let secure = lookup("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or_else(|| lookup("PUBLIC_ORIGIN").is_some_and(|origin| origin.starts_with("https://")));

        let mut session = SessionConfig::default().with_secure(secure);
        if let Some(raw) = lookup("EDGE_MAX_AGE_SECS") {
            let secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "EDGE_MAX_AGE_SECS", value: raw })?;
            session = session.with_edge_max_age(secs);
        }
        if let Some(path) = lookup("LOGIN_PATH").filter(|p| p.starts_with('/')) {
            session = session.with_login_path(path);
        }

        Ok(Self { port, session })
    }
}
