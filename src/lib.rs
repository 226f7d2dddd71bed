//! # wheelhouse-session
//!
//! Client-side session and role-gating layer for the Wheelhouse car-rental
//! marketplace. UI-framework agnostic so the Leptos `client` crate and the
//! Axum `server` crate can both consume it.
//!
//! SYSTEM CONTEXT
//! ==============
//! Session state lives in three places that are written independently:
//! the in-memory [`session::SessionStore`] of the current tab, the durable
//! per-origin key-value store (`localStorage` in a browser), and the small
//! request-attached edge records (cookies) read by the
//! [`interceptor::RouteInterceptor`] before a page is served. This crate owns
//! the protocol that keeps them consistent across tabs, reloads and the
//! external identity redirect, and the two enforcement points that consume
//! the result.
//!
//! TRUST MODEL
//! ===========
//! Nothing here verifies a token signature. Decoded claims and edge records
//! are routing hints only; the remote identity server re-validates every
//! privileged action.

pub mod actions;
pub mod bootstrap;
pub mod codec;
pub mod config;
pub mod error;
pub mod gate;
pub mod identity;
pub mod interceptor;
pub mod memory;
pub mod principal;
pub mod role;
pub mod session;
pub mod store;

pub use codec::{DecodedClaims, decode};
pub use config::SessionConfig;
pub use error::{IdentityError, StorageError};
pub use gate::GateDecision;
pub use principal::{Credential, Principal, SessionState};
pub use role::Role;
pub use session::{SessionSnapshot, SessionStore};
