//! Process contract of the `multiapp-proxy` binary.

use std::fs;
use std::process::{Command, Output};

mod common;
use common::{read, Workspace};

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_multiapp-proxy"));
    cmd.env_remove("INGRESS_ENTRY").env_remove("RUST_LOG");
    cmd
}

fn generate(ws: &Workspace) -> Command {
    let mut cmd = bin();
    cmd.arg("generate")
        .arg("--config")
        .arg(ws.config())
        .arg("--nginx-out")
        .arg(ws.nginx_out())
        .arg("--registry-out")
        .arg(ws.registry_out());
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_generate_success() {
    let ws = Workspace::new();
    ws.write_config("apps:\n  - name: Grafana\n    url: http://host:3000\n");

    let output = generate(&ws).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 app(s)"));
    assert!(stdout.contains("standalone"));
    assert!(read(&ws.nginx_out()).contains("location /grafana/ {"));
    assert!(read(&ws.registry_out()).contains("\"path\": \"/grafana\""));
}

#[test]
fn test_ingress_entry_from_environment() {
    let ws = Workspace::new();
    ws.write_config("apps: []\n");

    let output = generate(&ws)
        .env("INGRESS_ENTRY", "/api/hassio_ingress/tok")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("ingress"));
    assert!(read(&ws.nginx_out()).contains("\"\" \"/api/hassio_ingress/tok\";"));
}

#[test]
fn test_missing_url_exits_nonzero() {
    let ws = Workspace::new();
    ws.write_config("apps:\n  - name: Broken\n");

    let output = generate(&ws).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("url"));
    assert!(!ws.nginx_out().exists());
    assert!(!ws.registry_out().exists());
}

#[test]
fn test_missing_input_exits_nonzero() {
    let ws = Workspace::new();
    let output = generate(&ws).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not found"));
}

#[test]
fn test_unknown_flag_exits_nonzero() {
    let output = bin().args(["generate", "--bogus"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_zero() {
    let output = bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("generate"));
}

#[test]
fn test_convert_then_generate() {
    let ws = Workspace::new();
    let ui = ws.path("options.json");
    fs::write(
        &ui,
        concat!(
            r#"{"debug": true, "apps": "#,
            r#"[{"name": "Zigbee2MQTT", "url": "http://host:8080", "token": "t"}]}"#,
        ),
    )
    .unwrap();

    let output = bin()
        .arg("convert")
        .arg("--from")
        .arg(&ui)
        .arg("--to")
        .arg(ws.config())
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(read(&ws.config()).contains("Zigbee2MQTT"));

    let output = generate(&ws).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(read(&ws.nginx_out()).contains("sub_filter_once off;"));
}

#[test]
fn test_sync_creates_file_store() {
    let ws = Workspace::new();
    let ui = ws.path("options.json");
    let file = ws.path("multi-app-proxy.yaml");
    fs::write(&ui, r#"{"apps": [{"name": "Grafana", "url": "http://host:3000"}]}"#).unwrap();

    let output = bin()
        .arg("sync")
        .arg("--ui")
        .arg(&ui)
        .arg("--file")
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(read(&file).contains("Grafana"));
}
