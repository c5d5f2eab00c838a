use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_tmp_dir(prefix: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("stockdash_{prefix}_{}_{}", std::process::id(), now))
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_stockdash"))
        .args(args)
        .env_remove("STOCKDASH_CONFIG")
        .env_remove("STOCKDASH_METRICS_ADDR")
        .output()
        .expect("run cli");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn headless_prints_figures_json() {
    let (ok, stdout, stderr) = run_cli(&[
        "--headless",
        "--seed",
        "1",
        "--stock",
        "tesla",
        "--chart-type",
        "line",
    ]);
    assert!(ok, "cli failed: {stderr}");

    let value: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json");
    assert_eq!(value["status"], "ok");
    assert_eq!(value["stock"], "Tesla");
    assert_eq!(value["chart_type"], "line");
    assert_eq!(
        value["figures"]["kpi-chart"]["layout"]["title"]["text"],
        "Tesla KPI - Moving Average"
    );
}

#[test]
fn headless_same_seed_is_reproducible() {
    let (_, first, _) = run_cli(&["--headless", "--seed", "77"]);
    let (_, second, _) = run_cli(&["--headless", "--seed", "77"]);
    assert!(!first.trim().is_empty());
    assert_eq!(first, second);
}

#[test]
fn headless_honours_config_file_and_writes_snapshot() {
    let dir = unique_tmp_dir("cli_snapshot");
    fs::create_dir_all(&dir).expect("tmp dir");
    let config_path = dir.join("stockdash.toml");
    fs::write(
        &config_path,
        "[ui]\ndefault_stock = \"Google\"\ndefault_chart_type = \"candlestick\"\n\n[generator]\nseed = 3\n",
    )
    .expect("write config");
    let out_dir = dir.join("out");

    let (ok, stdout, stderr) = run_cli(&[
        "--headless",
        "--config",
        config_path.to_str().expect("utf8 path"),
        "--out-dir",
        out_dir.to_str().expect("utf8 path"),
    ]);
    assert!(ok, "cli failed: {stderr}");

    let value: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json");
    assert_eq!(value["mode"], "snapshot");
    assert_eq!(value["stock"], "Google");
    assert_eq!(value["figures"]["price-chart"]["data"][0]["type"], "candlestick");
    assert!(out_dir.join("ticks.csv").exists());
    assert!(out_dir.join("figures.json").exists());
    assert!(out_dir.join("dashboard.html").exists());
}

#[test]
fn invalid_config_exits_with_error() {
    let dir = unique_tmp_dir("cli_bad_config");
    fs::create_dir_all(&dir).expect("tmp dir");
    let config_path = dir.join("bad.toml");
    fs::write(&config_path, "[ui]\nrefresh_interval_ms = 0\n").expect("write config");

    let (ok, _, stderr) = run_cli(&[
        "--headless",
        "--config",
        config_path.to_str().expect("utf8 path"),
    ]);
    assert!(!ok);
    assert!(stderr.contains("refresh_interval_ms"), "stderr: {stderr}");
}

#[test]
fn unknown_stock_is_rejected_by_argument_parsing() {
    let (ok, _, stderr) = run_cli(&["--headless", "--stock", "amazon"]);
    assert!(!ok);
    assert!(stderr.contains("unknown stock"), "stderr: {stderr}");
}
