//! Principal, credential and session-state types, plus the one place raw
//! identity-server responses are turned into them.
//!
//! DESIGN
//! ======
//! The identity server has answered with several shapes over time (flat
//! user, `{ user }`, `{ data: { user } }`, `_id` vs `id`, `name` vs
//! `fullName`). [`normalize_principal`] and [`AuthPayload::from_response`]
//! absorb all of them at the service boundary so nothing downstream ever
//! branches on response shape.

#[cfg(test)]
#[path = "principal_test.rs"]
mod principal_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::DecodedClaims;
use crate::role::Role;

/// The resolved identity of the current user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl Principal {
    /// Rebuild a principal from token claims when the server cannot be
    /// reached. Needs at least a subject id.
    #[must_use]
    pub fn from_claims(claims: &DecodedClaims) -> Option<Self> {
        let id = claims.subject_id()?;
        let role = match claims.role_hint() {
            Some(hint) => Some(Role::from_hint(hint)),
            None => claims.is_admin_flag().then_some(Role::Admin),
        };
        Some(Self {
            id,
            display_name: claims.display_name_hint().map(str::to_owned),
            email: claims.email().map(str::to_owned),
            role,
        })
    }

    /// Same principal with its role replaced.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Best label for greeting the user.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Opaque bearer token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token. Blank input is not a credential.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// `(Principal | absent, Credential | absent)` for one tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub principal: Option<Principal>,
    pub credential: Option<Credential>,
}

impl SessionState {
    #[must_use]
    pub fn new(principal: Option<Principal>, credential: Option<Credential>) -> Self {
        Self { principal, credential }
    }

    /// Canonical logged-out state: nothing held at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principal.is_none() && self.credential.is_none()
    }

    /// Identity resolved. Credential-only ("have proof, resolving identity")
    /// does not count.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Any session evidence at all; enough for the edge marker and request
    /// attachment.
    #[must_use]
    pub fn has_session(&self) -> bool {
        !self.is_empty()
    }
}

/// What login, register and the identity server hand back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthPayload {
    pub token: Option<Credential>,
    pub principal: Option<Principal>,
}

impl AuthPayload {
    /// Normalize any known login/register response body.
    #[must_use]
    pub fn from_response(body: &Value) -> Self {
        Self {
            token: find_token(body),
            principal: normalize_principal(body),
        }
    }
}

const TOKEN_KEYS: [&str; 4] = ["token", "accessToken", "access_token", "jwt"];
const ID_KEYS: [&str; 4] = ["id", "_id", "userId", "sub"];
const NAME_KEYS: [&str; 4] = ["displayName", "name", "fullName", "username"];
const ROLE_KEYS: [&str; 2] = ["role", "userType"];

fn find_token(body: &Value) -> Option<Credential> {
    let obj = body.as_object()?;
    TOKEN_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str).and_then(Credential::new))
        .or_else(|| obj.get("data").and_then(find_token))
}

/// Map any known user-bearing response shape onto a [`Principal`].
///
/// Returns `None` when no identifier can be found.
#[must_use]
pub fn normalize_principal(body: &Value) -> Option<Principal> {
    let obj = body.as_object()?;
    for envelope in ["user", "data", "profile"] {
        if let Some(inner) = obj.get(envelope).filter(|v| v.is_object()) {
            if let Some(principal) = normalize_principal(inner) {
                return Some(principal);
            }
        }
    }

    let id = ID_KEYS.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })?;

    let display_name = NAME_KEYS
        .iter()
        .find_map(|key| non_empty_str(obj.get(*key)))
        .map(str::to_owned)
        .or_else(|| {
            let first = non_empty_str(obj.get("firstName"))?;
            Some(match non_empty_str(obj.get("lastName")) {
                Some(last) => format!("{first} {last}"),
                None => first.to_owned(),
            })
        });

    let role = ROLE_KEYS
        .iter()
        .find_map(|key| non_empty_str(obj.get(*key)))
        .map(Role::from_hint)
        .or_else(|| matches!(obj.get("isAdmin"), Some(Value::Bool(true))).then_some(Role::Admin));

    Some(Principal {
        id,
        display_name,
        email: non_empty_str(obj.get("email")).map(str::to_owned),
        role,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
