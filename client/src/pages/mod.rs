//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Public pages (`home`, `login`, `register`, `auth_callback`) render for
//! everyone. Dashboard pages sit behind the edge interceptor on the server
//! and wrap their content in `RoleGate` on the client.

pub mod auth_callback;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod register;
