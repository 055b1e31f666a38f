#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqtally_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8080"
counter:
  zone_bytez: 1048576 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.counter.zone_name, "req_tally");
    assert_eq!(cfg.counter.zone_bytes, 1024 * 1024);
    assert_eq!(cfg.counter.max_report_bytes, 1024);
    assert_eq!(cfg.counter.route, "/count");
}

#[test]
fn version_must_be_pinned() {
    let bad = r#"
version: 2
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn zone_bytes_range_checked() {
    let bad = r#"
version: 1
counter:
  zone_bytes: 16
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_CONFIG");
}

#[test]
fn report_cap_range_checked() {
    let bad = r#"
version: 1
counter:
  max_report_bytes: 1
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn route_must_be_absolute() {
    let bad = r#"
version: 1
counter:
  route: "count"
"#;
    assert!(config::load_from_str(bad).is_err());
}
