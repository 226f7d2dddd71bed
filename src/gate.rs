//! Render-time role gate.
//!
//! The decision is a pure function so the Leptos `RoleGate` component and
//! tests share it. The component re-evaluates on every session snapshot.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use crate::codec;
use crate::principal::{Credential, Principal};
use crate::role::{self, Role};
use crate::session::SessionSnapshot;

/// Outcome of gating one subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Storage not read yet; render a placeholder, never the unauthorized view.
    Pending,
    Unauthorized,
    Granted,
}

impl GateDecision {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot, required: Option<Role>) -> Self {
        evaluate(
            snapshot.hydrated,
            snapshot.state.principal.as_ref(),
            snapshot.state.credential.as_ref(),
            required,
        )
    }
}

/// Gate a subtree on session presence and, optionally, an exact role.
///
/// Any principal or credential passes an ungated subtree. A role gate also
/// needs a resolved principal.
#[must_use]
pub fn evaluate(
    hydrated: bool,
    principal: Option<&Principal>,
    credential: Option<&Credential>,
    required: Option<Role>,
) -> GateDecision {
    if !hydrated {
        return GateDecision::Pending;
    }
    if principal.is_none() && credential.is_none() {
        return GateDecision::Unauthorized;
    }
    let Some(required) = required else {
        return GateDecision::Granted;
    };
    // A bare credential is still being resolved; it never opens a role gate.
    if principal.is_none() {
        return GateDecision::Unauthorized;
    }
    let claims = credential.and_then(|c| codec::decode(c.as_str()));
    if role::resolve(principal, claims.as_ref()) == required {
        GateDecision::Granted
    } else {
        GateDecision::Unauthorized
    }
}
