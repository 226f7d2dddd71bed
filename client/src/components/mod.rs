//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the session through the `SessionContext` provided by
//! `App`; none of them touch browser storage directly.

pub mod account_bar;
pub mod role_gate;
pub mod unauthorized;
