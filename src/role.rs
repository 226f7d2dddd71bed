//! Effective-role resolution.
//!
//! Two orderings exist. Render-time [`resolve`] trusts the principal's own
//! role first. Bootstrap-time [`reconcile`] lets the freshly issued token's
//! claim override a cached principal record. Both are pure and total:
//! `User` is always a safe fallback because the remote server re-checks
//! every privileged action.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::DecodedClaims;
use crate::principal::Principal;

/// Role of the current principal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Renter,
    #[default]
    User,
}

impl Role {
    /// Map a role string from the identity server or a token claim.
    /// Case-insensitive; anything unknown becomes `User`.
    #[must_use]
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Self::Admin,
            "RENTER" => Self::Renter,
            _ => Self::User,
        }
    }

    /// Lowercase wire name, as written to the `role` edge record.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Renter => "renter",
            Self::User => "user",
        }
    }

    /// Dashboard entry point for this role.
    #[must_use]
    pub fn landing_path(self) -> &'static str {
        match self {
            Self::Admin => "/dashboard/admin",
            Self::Renter => "/dashboard/renter",
            Self::User => "/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Servers send `RENTER`, old mirrors hold `renter`; accept both.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_hint(&raw))
    }
}

/// Role carried by the claims alone, if they carry one.
fn claimed_role(claims: Option<&DecodedClaims>) -> Option<Role> {
    let claims = claims?;
    if let Some(hint) = claims.role_hint() {
        return Some(Role::from_hint(hint));
    }
    claims.is_admin_flag().then_some(Role::Admin)
}

/// Render-time role: principal role, else token role hint, else token admin
/// flag, else `User`.
#[must_use]
pub fn resolve(principal: Option<&Principal>, claims: Option<&DecodedClaims>) -> Role {
    principal
        .and_then(|p| p.role)
        .or_else(|| claimed_role(claims))
        .unwrap_or_default()
}

/// Bootstrap-time role: the token claim wins over the principal's role
/// because the token was issued by the server moments earlier.
#[must_use]
pub fn reconcile(principal: Option<&Principal>, claims: Option<&DecodedClaims>) -> Role {
    claimed_role(claims).unwrap_or_else(|| resolve(principal, None))
}
