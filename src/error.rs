//! Error types for storage surfaces and the identity service.
//!
//! ERROR HANDLING
//! ==============
//! None of these are fatal. Callers inside this crate log and degrade to
//! "treat as logged out" or "treat as role user"; the types exist so the
//! surface and service implementations can say what went wrong.

/// Failure reading or writing one of the client-held storage surfaces.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The surface is not available (no window, storage disabled, SSR).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The write was rejected (quota exceeded, private mode, cookie policy).
    #[error("storage write rejected for `{key}`: {reason}")]
    Write { key: String, reason: String },
    /// A value could not be serialized before writing.
    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure talking to the remote identity server.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Transport-level failure (offline, DNS, CORS, aborted request).
    #[error("identity request failed: {0}")]
    Network(String),
    /// The server answered with an unexpected status.
    #[error("identity server returned status {status}")]
    Status { status: u16 },
    /// The response body was not a shape we know how to normalize.
    #[error("failed to decode identity response: {0}")]
    Decode(String),
    /// The identity service is not reachable from this environment.
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}
