use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use super::*;

fn token_with_payload(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.c2lnbmF0dXJl")
}

// =============================================================
// Valid payloads
// =============================================================

#[test]
fn decode_returns_payload_fields_verbatim() {
    let payload = json!({
        "sub": "42",
        "email": "ana@example.com",
        "role": "RENTER",
        "exp": 1_900_000_000,
        "nested": { "a": [1, 2, 3] }
    });
    let claims = decode(&token_with_payload(&payload)).unwrap();
    assert_eq!(Value::Object(claims.payload().clone()), payload);
}

#[test]
fn decode_handles_url_safe_alphabet_and_missing_padding() {
    // '?' and '>' bytes force '_' and '-' into the url-safe encoding.
    let payload = json!({ "name": "???>>>", "sub": "u1" });
    let token = token_with_payload(&payload);
    assert!(token.contains('_') || token.contains('-'));
    let claims = decode(&token).unwrap();
    assert_eq!(claims.display_name_hint(), Some("???>>>"));
}

#[test]
fn decode_handles_multibyte_utf8() {
    let payload = json!({ "name": "Zoë Ñúñez 🚗" });
    let claims = decode(&token_with_payload(&payload)).unwrap();
    assert_eq!(claims.display_name_hint(), Some("Zoë Ñúñez 🚗"));
}

#[test]
fn decode_ignores_signature_segment_entirely() {
    let payload = json!({ "sub": "1" });
    let token = token_with_payload(&payload);
    let (head, _) = token.rsplit_once('.').unwrap();
    let two_segments = head.to_owned();
    let forged = format!("{head}.not-a-real-signature!!");
    assert_eq!(decode(&two_segments), decode(&forged));
    assert!(decode(&two_segments).is_some());
}

// =============================================================
// Malformed inputs
// =============================================================

#[test]
fn decode_rejects_single_segment() {
    assert!(decode("onlyonesegment").is_none());
    assert!(decode("").is_none());
}

#[test]
fn decode_rejects_invalid_base64() {
    assert!(decode("aaa.%%%%.bbb").is_none());
    assert!(decode("aaa.a.bbb").is_none());
}

#[test]
fn decode_rejects_non_json_payload() {
    let body = URL_SAFE_NO_PAD.encode("not json at all");
    assert!(decode(&format!("h.{body}.s")).is_none());
}

#[test]
fn decode_rejects_non_object_json() {
    let body = URL_SAFE_NO_PAD.encode("[1,2,3]");
    assert!(decode(&format!("h.{body}.s")).is_none());
}

#[test]
fn decode_rejects_invalid_utf8() {
    let body = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
    assert!(decode(&format!("h.{body}.s")).is_none());
}

#[test]
fn decode_of_opaque_sso_token_yields_no_claims() {
    assert!(decode("abc.def.ghi").is_none());
}

// =============================================================
// Accessors
// =============================================================

#[test]
fn subject_id_prefers_sub_then_id_then_user_id() {
    let claims = DecodedClaims::from_payload(
        json!({ "id": "from-id", "userId": "from-user-id" }).as_object().cloned().unwrap(),
    );
    assert_eq!(claims.subject_id().as_deref(), Some("from-id"));

    let numeric = DecodedClaims::from_payload(json!({ "userId": 7 }).as_object().cloned().unwrap());
    assert_eq!(numeric.subject_id().as_deref(), Some("7"));
}

#[test]
fn role_hint_falls_back_to_user_type() {
    let claims = DecodedClaims::from_payload(json!({ "userType": "ADMIN" }).as_object().cloned().unwrap());
    assert_eq!(claims.role_hint(), Some("ADMIN"));
}

#[test]
fn is_admin_flag_requires_boolean_true() {
    let yes = DecodedClaims::from_payload(json!({ "isAdmin": true }).as_object().cloned().unwrap());
    let string = DecodedClaims::from_payload(json!({ "isAdmin": "true" }).as_object().cloned().unwrap());
    let snake = DecodedClaims::from_payload(json!({ "is_admin": true }).as_object().cloned().unwrap());
    assert!(yes.is_admin_flag());
    assert!(!string.is_admin_flag());
    assert!(snake.is_admin_flag());
    assert!(!DecodedClaims::default().is_admin_flag());
}

#[test]
fn empty_strings_count_as_absent() {
    let claims = DecodedClaims::from_payload(json!({ "email": "", "role": "" }).as_object().cloned().unwrap());
    assert_eq!(claims.email(), None);
    assert_eq!(claims.role_hint(), None);
}
