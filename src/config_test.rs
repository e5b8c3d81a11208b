use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_true_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", "  On "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
}

#[test]
fn parse_bool_false_variants() {
    for val in ["0", "false", "no", "off", "False"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn parse_bool_rejects_other_values() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// =============================================================================
// Config::from_lookup
// =============================================================================

#[test]
fn missing_database_url_is_error() {
    assert_eq!(Config::from_lookup(lookup_from(&[])), Err(ConfigError::Missing("DATABASE_URL")));
}

#[test]
fn blank_database_url_is_error() {
    assert_eq!(
        Config::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])),
        Err(ConfigError::Missing("DATABASE_URL"))
    );
}

#[test]
fn defaults_apply_when_only_database_url_set() {
    let cfg = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/gslase")])).unwrap();
    assert_eq!(cfg.database_url, "postgres://localhost/gslase");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
    assert!(!cfg.cookie_secure);
    assert_eq!(cfg.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS);
    assert_eq!(cfg.session_sweep, Duration::from_secs(DEFAULT_SESSION_SWEEP_SECS));
    assert!(cfg.static_dir.ends_with("static"));
    assert_eq!(cfg.admin_password, None);
    assert_eq!(cfg.login_limit, WindowLimit { limit: 10, window: Duration::from_secs(300) });
    assert_eq!(cfg.message_limit, WindowLimit { limit: 30, window: Duration::from_secs(60) });
    assert_eq!(cfg.listen_addr(), "0.0.0.0:5000");
}

#[test]
fn overrides_are_parsed() {
    let cfg = Config::from_lookup(lookup_from(&[
        ("DATABASE_URL", "postgres://db/gslase"),
        ("PORT", "8080"),
        ("BIND_ADDR", "127.0.0.1"),
        ("COOKIE_SECURE", "yes"),
        ("SESSION_TTL_HOURS", "24"),
        ("STATIC_DIR", "/srv/static"),
        ("ADMIN_PASSWORD", "hunter2"),
        ("RATE_LIMIT_MESSAGES", "5"),
        ("RATE_LIMIT_MESSAGES_WINDOW_SECS", "10"),
    ]))
    .unwrap();
    assert_eq!(cfg.listen_addr(), "127.0.0.1:8080");
    assert!(cfg.cookie_secure);
    assert_eq!(cfg.session_ttl_hours, 24);
    assert_eq!(cfg.static_dir, PathBuf::from("/srv/static"));
    assert_eq!(cfg.admin_password.as_deref(), Some("hunter2"));
    assert_eq!(cfg.message_limit, WindowLimit { limit: 5, window: Duration::from_secs(10) });
}

#[test]
fn invalid_port_is_error() {
    let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db"), ("PORT", "http")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "PORT", value: "http".into() });
}

#[test]
fn invalid_cookie_secure_is_error() {
    let err =
        Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db"), ("COOKIE_SECURE", "sometimes")]))
            .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "COOKIE_SECURE", .. }));
}

#[test]
fn empty_admin_password_counts_as_unset() {
    let cfg = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db"), ("ADMIN_PASSWORD", "")])).unwrap();
    assert_eq!(cfg.admin_password, None);
}

#[test]
fn zero_sweep_interval_is_error() {
    let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db"), ("SESSION_SWEEP_SECS", "0")]))
        .unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "SESSION_SWEEP_SECS", value: "0".into() });
}
