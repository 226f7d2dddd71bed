//! Networking: REST calls to the identity server.

pub mod api;
