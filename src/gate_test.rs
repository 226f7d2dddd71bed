use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::*;
use crate::principal::SessionState;

fn principal(role: Option<Role>) -> Principal {
    Principal { id: "1".to_owned(), display_name: None, email: None, role }
}

fn admin_token() -> Credential {
    let body = URL_SAFE_NO_PAD.encode(r#"{"sub":"5","role":"ADMIN"}"#);
    Credential::new(format!("e30.{body}.c2ln")).unwrap()
}

#[test]
fn pending_until_hydrated() {
    let p = principal(Some(Role::Admin));
    assert_eq!(evaluate(false, Some(&p), None, Some(Role::Admin)), GateDecision::Pending);
    assert_eq!(evaluate(false, None, None, None), GateDecision::Pending);
}

#[test]
fn no_session_is_unauthorized() {
    assert_eq!(evaluate(true, None, None, None), GateDecision::Unauthorized);
    assert_eq!(evaluate(true, None, None, Some(Role::User)), GateDecision::Unauthorized);
}

#[test]
fn wrong_role_is_unauthorized() {
    let user = principal(Some(Role::User));
    assert_eq!(evaluate(true, Some(&user), None, Some(Role::Admin)), GateDecision::Unauthorized);
}

#[test]
fn matching_role_is_granted() {
    let admin = principal(Some(Role::Admin));
    assert_eq!(evaluate(true, Some(&admin), None, Some(Role::Admin)), GateDecision::Granted);
}

#[test]
fn any_session_satisfies_no_requirement() {
    let p = principal(None);
    assert_eq!(evaluate(true, Some(&p), None, None), GateDecision::Granted);
    let opaque = Credential::new("opaque").unwrap();
    assert_eq!(evaluate(true, None, Some(&opaque), None), GateDecision::Granted);
}

#[test]
fn credential_claims_decide_when_principal_has_no_role() {
    let token = admin_token();
    let bare = principal(None);
    assert_eq!(evaluate(true, Some(&bare), Some(&token), Some(Role::Admin)), GateDecision::Granted);
}

#[test]
fn credential_without_principal_never_opens_a_role_gate() {
    let token = admin_token();
    assert_eq!(evaluate(true, None, Some(&token), Some(Role::Admin)), GateDecision::Unauthorized);
    assert_eq!(evaluate(true, None, Some(&token), Some(Role::User)), GateDecision::Unauthorized);
    assert!(!SessionState::new(None, Some(token)).is_authenticated());
}

#[test]
fn principal_role_beats_claims_at_render() {
    let renter = principal(Some(Role::Renter));
    let token = admin_token();
    assert_eq!(evaluate(true, Some(&renter), Some(&token), Some(Role::Admin)), GateDecision::Unauthorized);
}

#[test]
fn from_snapshot_reads_hydration_and_state() {
    let snapshot = SessionSnapshot {
        state: SessionState::new(Some(principal(Some(Role::Renter))), None),
        hydrated: true,
    };
    assert_eq!(GateDecision::from_snapshot(&snapshot, Some(Role::Renter)), GateDecision::Granted);
    assert_eq!(GateDecision::from_snapshot(&SessionSnapshot::default(), None), GateDecision::Pending);
}
