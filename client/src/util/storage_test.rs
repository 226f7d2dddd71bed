use super::*;

#[test]
fn read_cookie_finds_named_record() {
    let cookies = "theme=dark; auth_token=1; role=renter";
    assert_eq!(read_cookie(cookies, "auth_token").as_deref(), Some("1"));
    assert_eq!(read_cookie(cookies, "role").as_deref(), Some("renter"));
}

#[test]
fn read_cookie_decodes_and_skips_empty() {
    assert_eq!(read_cookie("note=a%20b", "note").as_deref(), Some("a b"));
    assert_eq!(read_cookie("role=; auth_token=1", "role"), None);
    assert_eq!(read_cookie("", "role"), None);
    assert_eq!(read_cookie("roles=admin", "role"), None);
}

#[test]
fn storage_events_filtered_to_session_keys() {
    let config = SessionConfig::default();
    assert!(is_session_change(Some("auth:user"), &config));
    assert!(is_session_change(Some("auth:token"), &config));
    assert!(is_session_change(None, &config));
    assert!(!is_session_change(Some("wheelhouse_theme"), &config));
}

#[test]
fn secure_flag_follows_protocol() {
    assert!(config_for_protocol("https:").edge_secure);
    assert!(!config_for_protocol("http:").edge_secure);
    assert!(!config_for_protocol("").edge_secure);
}
