use std::path::PathBuf;

use docserve::config::{CONFIG_ENV, Config};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.static_files.root, PathBuf::from("webroot"));
    assert_eq!(cfg.static_files.index, "index.html");
    assert_eq!(cfg.static_files.extensions.len(), 3);
    assert_eq!(
        cfg.static_files.extensions.get("js").unwrap(),
        "application/javascript; charset=UTF-8"
    );
}

#[test]
fn test_config_from_yaml_partial() {
    let cfg = Config::from_yaml(
        r#"
server:
  listen_addr: "127.0.0.1:9000"
"#,
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:9000");
    assert_eq!(cfg.static_files.root, PathBuf::from("webroot"));
    assert_eq!(cfg.static_files.extensions.len(), 3);
}

#[test]
fn test_config_from_yaml_full() {
    let cfg = Config::from_yaml(
        r#"
server:
  listen_addr: "0.0.0.0:3000"
static_files:
  root: /srv/www
  index: home.html
  extensions:
    html: "text/html; charset=UTF-8"
    svg: "image/svg+xml"
"#,
    )
    .unwrap();

    assert_eq!(cfg.static_files.root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.static_files.index, "home.html");
    assert_eq!(cfg.static_files.extensions.len(), 2);
    assert!(!cfg.static_files.extensions.contains_key("css"));
}

#[test]
fn test_config_rejects_unknown_fields() {
    assert!(Config::from_yaml("server:\n  port: 80\n").is_err());
    assert!(Config::from_yaml("server: [1, 2]\n").is_err());
}

// All environment handling lives in one test so parallel tests never race
// on process-wide variables.
#[test]
fn test_config_load_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docserve.yaml");
    std::fs::write(
        &path,
        "server:\n  listen_addr: \"127.0.0.1:7000\"\nstatic_files:\n  index: main.html\n",
    )
    .unwrap();

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::remove_var("WEBROOT");
        std::env::set_var(CONFIG_ENV, &path);
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:7000");
    assert_eq!(cfg.static_files.index, "main.html");

    unsafe {
        std::env::set_var("LISTEN", "0.0.0.0:5000");
        std::env::set_var("WEBROOT", "/tmp/site");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.static_files.root, PathBuf::from("/tmp/site"));
    assert_eq!(cfg.static_files.index, "main.html");

    unsafe {
        std::env::set_var(CONFIG_ENV, dir.path().join("missing.yaml"));
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var(CONFIG_ENV);
        std::env::remove_var("LISTEN");
        std::env::remove_var("WEBROOT");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:8080");
}
