use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_true_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", "On", "  true  "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
}

#[test]
fn parse_bool_false_variants() {
    for val in ["0", "false", "no", "off", "NO"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn parse_bool_invalid_returns_none() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// =============================================================================
// ServerConfig
// =============================================================================

#[test]
fn defaults_when_nothing_set() {
    let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.port, 3000);
    assert!(!config.session.edge_secure);
    assert_eq!(config.session.login_path, "/login");
    assert_eq!(config.session.edge_max_age_secs, wheelhouse_session::config::DEFAULT_EDGE_MAX_AGE_SECS);
}

#[test]
fn secure_inferred_from_https_origin() {
    let config = ServerConfig::from_lookup(lookup(&[("PUBLIC_ORIGIN", "https://wheelhouse.example")])).unwrap();
    assert!(config.session.edge_secure);
}

#[test]
fn explicit_cookie_secure_wins() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("PUBLIC_ORIGIN", "https://wheelhouse.example"),
        ("COOKIE_SECURE", "off"),
    ]))
    .unwrap();
    assert!(!config.session.edge_secure);
}

#[test]
fn numeric_overrides_parse() {
    let config = ServerConfig::from_lookup(lookup(&[("PORT", "8080"), ("EDGE_MAX_AGE_SECS", "3600")])).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.session.edge_max_age_secs, 3600);
}

#[test]
fn invalid_port_is_an_error() {
    let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
}

#[test]
fn relative_login_path_is_ignored() {
    let config = ServerConfig::from_lookup(lookup(&[("LOGIN_PATH", "signin")])).unwrap();
    assert_eq!(config.session.login_path, "/login");
    let config = ServerConfig::from_lookup(lookup(&[("LOGIN_PATH", "/signin")])).unwrap();
    assert_eq!(config.session.login_path, "/signin");
}
