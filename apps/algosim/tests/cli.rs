use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_tmp_dir(prefix: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("algosim_{prefix}_{}_{}", std::process::id(), now))
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                return text;
            }
        }
    }
    String::from_utf8_lossy(&raw).to_string()
}

fn try_spawn_server(status: u16, reason: &str, body: &str) -> Option<String> {
    let listener = TcpListener::bind("127.0.0.1:0").ok()?;
    let addr = listener.local_addr().ok()?;
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
        }
    });

    Some(format!("http://{}/api", addr))
}

fn write_config(dir: &Path, end_date: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("create dir");
    let path = dir.join("config.toml");
    let out_dir = dir.join("runs");
    fs::write(
        &path,
        format!(
            r#"
[service]
timeout_ms = 2000

[request]
run_id = "cli_run"
ticker = "aapl"
start_date = "2020-01-01"
end_date = "{end_date}"
initial_capital = 100000.0
strategy = "ma_crossover"

[output]
out_dir = "{}"
html = true
"#,
            out_dir.display().to_string().replace('\\', "/")
        ),
    )
    .expect("write config");
    path
}

fn run_cli(args: &[&str], base_url: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_algosim"));
    cmd.args(args)
        .env_remove("ALGOSIM_CONFIG")
        .env_remove("ALGOSIM_METRICS_ADDR")
        .env("ALGOSIM_LOG", "warn");
    match base_url {
        Some(url) => cmd.env("ALGOSIM_API_BASE_URL", url),
        None => cmd.env_remove("ALGOSIM_API_BASE_URL"),
    };
    cmd.output().expect("run cli")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout is one json line")
}

const RESPONSE: &str = r#"{
  "metrics": {"total_return": 0.0523, "sharpe_ratio": 1.1, "total_trades": 1},
  "equity_curve": [
    {"date": "2020-01-03", "equity": 101000.0},
    {"date": "2020-01-01", "equity": 100000.0},
    {"date": "2020-01-02", "equity": 100500.0}
  ],
  "benchmark": {
    "equity_curve": [
      {"date": "2020-01-01", "equity": 300.0},
      {"date": "2020-01-02", "equity": 301.5}
    ],
    "metrics": {}
  },
  "trades": [{"entry_date": "2020-01-01", "exit_date": "2020-01-02", "pnl": 150.0}]
}"#;

#[test]
fn strategies_mode_prints_catalog() {
    let output = run_cli(&["--mode", "strategies"], None);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["mode"], "strategies");
    assert_eq!(json["strategies"].as_array().map(Vec::len), Some(3));
}

#[test]
fn validate_mode_exits_2_on_invalid_request() {
    let dir = unique_tmp_dir("cli_invalid");
    let config = write_config(&dir, "2019-01-01");
    let output = run_cli(
        &["--mode", "validate", "--config", config.to_str().expect("utf8 path")],
        None,
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("validation failed"));
}

#[test]
fn backtest_then_report_writes_run_directory() {
    let Some(base_url) = try_spawn_server(200, "OK", RESPONSE) else {
        eprintln!("skipping: cannot bind local test server");
        return;
    };
    let dir = unique_tmp_dir("cli_backtest");
    let config = write_config(&dir, "2023-01-01");
    let config_arg = config.to_str().expect("utf8 path");

    let output = run_cli(
        &["--mode", "backtest", "--config", config_arg, "--log-format", "json"],
        Some(&base_url),
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json = stdout_json(&output);
    assert_eq!(json["run_id"], "cli_run");
    assert_eq!(json["chart"]["points"], 3);
    assert_eq!(json["chart"]["buy_markers"], 1);

    let run_dir = dir.join("runs").join("cli_run");
    for name in [
        "request.json",
        "response.json",
        "chart.json",
        "chart.csv",
        "config_snapshot.toml",
        "dashboard.html",
    ] {
        assert!(run_dir.join(name).exists(), "missing {name}");
    }
    let chart: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(run_dir.join("chart.json")).expect("chart"))
            .expect("chart json");
    assert_eq!(chart[0]["date"], "2020-01-01");
    assert_eq!(chart[0]["action"], "BUY");
    assert_eq!(chart[1]["sell_marker"], 301.5);
    assert!(chart[2].get("benchmark").is_none());

    fs::remove_file(run_dir.join("chart.csv")).expect("remove csv");
    let output = run_cli(
        &["--mode", "report", "--run-dir", run_dir.to_str().expect("utf8 path")],
        None,
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["mode"], "report");
    assert!(run_dir.join("chart.csv").exists());
}

#[test]
fn backtest_exits_3_when_service_rejects_request() {
    let Some(base_url) = try_spawn_server(
        404,
        "Not Found",
        r#"{"detail":"No data found for ticker AAPL"}"#,
    ) else {
        eprintln!("skipping: cannot bind local test server");
        return;
    };
    let dir = unique_tmp_dir("cli_rejected");
    let config = write_config(&dir, "2023-01-01");

    let output = run_cli(
        &["--mode", "backtest", "--config", config.to_str().expect("utf8 path")],
        Some(&base_url),
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No data found for ticker AAPL"));
    assert!(!dir.join("runs").join("cli_run").exists());
}
