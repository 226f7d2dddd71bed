//! Login, register and logout flows.
//!
//! Each flow talks to the identity server first and then goes through
//! [`SessionStore::set_session`], the only mutator. Login and register hand
//! back the path the page should navigate to; logout navigates itself
//! because it leaves the app.

#[cfg(test)]
#[path = "actions_test.rs"]
mod actions_test;

use crate::codec;
use crate::error::IdentityError;
use crate::identity::{IdentityService, PageLocation, RegisterFields};
use crate::interceptor::safe_return_target;
use crate::principal::{AuthPayload, Principal};
use crate::role;
use crate::session::SessionStore;

/// Sign in with email and password. Returns the post-login destination:
/// a safe `return_to` when given, else the role's dashboard.
pub async fn login(
    session: &SessionStore,
    identity: &dyn IdentityService,
    email: &str,
    password: &str,
    return_to: Option<&str>,
) -> Result<String, IdentityError> {
    let payload = identity.login(email.trim(), password).await?;
    establish(session, payload, return_to)
}

/// Create an account and sign in with the response.
pub async fn register(
    session: &SessionStore,
    identity: &dyn IdentityService,
    fields: &RegisterFields,
) -> Result<String, IdentityError> {
    let payload = identity.register(fields).await?;
    establish(session, payload, None)
}

/// Clear every local surface, tell the server, then leave through the
/// server's logout endpoint so it can expire the edge records.
pub async fn logout(session: &SessionStore, identity: &dyn IdentityService, location: &dyn PageLocation) {
    session.set_session(None, None);
    if let Err(e) = identity.logout().await {
        tracing::warn!(error = %e, "remote logout failed; local session already cleared");
    }
    location.navigate_top_level(&session.mirror().config().logout_path);
}

fn establish(session: &SessionStore, payload: AuthPayload, return_to: Option<&str>) -> Result<String, IdentityError> {
    let AuthPayload { token, principal } = payload;
    let claims = token.as_ref().and_then(|t| codec::decode(t.as_str()));
    let principal = principal.or_else(|| claims.as_ref().and_then(Principal::from_claims));
    if principal.is_none() && token.is_none() {
        return Err(IdentityError::Decode("response carried neither a user nor a token".to_owned()));
    }

    let role = role::reconcile(principal.as_ref(), claims.as_ref());
    session.set_session(principal.map(|p| p.with_role(role)), token);

    Ok(return_to
        .and_then(safe_return_target)
        .unwrap_or_else(|| role.landing_path().to_owned()))
}
