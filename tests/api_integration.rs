#![cfg(feature = "api")]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

const RECORD_KEYS: &[&str] = &[
    "date",
    "irradiance",
    "humidity",
    "wind_speed",
    "ambient_temperature",
    "tilt_angle",
    "kwh",
    "season",
    "month",
    "day",
];

struct ChildGuard {
    child: Child,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn api_serves_state_records_and_csv() {
    let port = allocate_port();
    let addr = format!("127.0.0.1:{port}");
    let _child = spawn_api_process(port);

    wait_for_server(&addr, Duration::from_secs(8));

    let (state_status, state_body) =
        http_get(&addr, "/state").expect("/state request should succeed");
    assert_eq!(state_status, 200);

    let state: Value = serde_json::from_str(&state_body).expect("state body should be JSON");
    assert_eq!(state["season"], "summer");
    assert_eq!(state["year"], 2026);
    assert_eq!(state["custom_ranges"], true);
    assert_eq!(state["metrics"]["days"].as_u64(), Some(92));
    assert_eq!(state["ranges"]["humidity"][0], 70.0);

    let (records_status, records_body) =
        http_get(&addr, "/records?from=2&to=4").expect("/records request should succeed");
    assert_eq!(records_status, 200);

    let records: Value =
        serde_json::from_str(&records_body).expect("records body should be JSON array");
    let rows = records.as_array().expect("records should be an array");
    assert_eq!(rows.len(), 3);
    for row in rows {
        let obj = row.as_object().expect("row should be an object");
        for key in RECORD_KEYS {
            assert!(obj.contains_key(*key), "missing key: {key}");
        }
    }
    assert_eq!(rows[0]["date"], "2026-06-02");
    assert_eq!(rows[2]["date"], "2026-06-04");

    let (bad_status, _) =
        http_get(&addr, "/records?from=4&to=2").expect("/records request should succeed");
    assert_eq!(bad_status, 400);

    let (csv_status, csv_body) =
        http_get(&addr, "/export.csv").expect("/export.csv request should succeed");
    assert_eq!(csv_status, 200);
    assert!(csv_body.starts_with("date,irradiance"));
    assert_eq!(csv_body.lines().count(), 93);
}

fn allocate_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port bind should succeed");
    let port = listener
        .local_addr()
        .expect("local_addr should be available")
        .port();
    drop(listener);
    port
}

fn spawn_api_process(port: u16) -> ChildGuard {
    let config = format!("{}/scenarios/summer_custom.toml", env!("CARGO_MANIFEST_DIR"));
    let child = Command::new(env!("CARGO_BIN_EXE_solar-calc"))
        .args(["--config", &config, "--serve", "--port", &port.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("solar-calc process should spawn");

    ChildGuard { child }
}

fn wait_for_server(addr: &str, timeout: Duration) {
    let start = Instant::now();
    loop {
        if let Ok((200, _)) = http_get(addr, "/state") {
            return;
        }

        if start.elapsed() >= timeout {
            panic!("timed out waiting for API server on {addr}");
        }

        thread::sleep(Duration::from_millis(50));
    }
}

fn http_get(addr: &str, path: &str) -> Result<(u16, String), String> {
    let mut stream = TcpStream::connect(addr).map_err(|err| format!("connect: {err}"))?;
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .map_err(|err| format!("write: {err}"))?;

    let mut raw = String::new();
    stream
        .read_to_string(&mut raw)
        .map_err(|err| format!("read: {err}"))?;

    let (head, body) = raw
        .split_once("\r\n\r\n")
        .ok_or_else(|| "invalid HTTP response".to_string())?;
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| "missing status code".to_string())?
        .parse::<u16>()
        .map_err(|err| format!("invalid status code: {err}"))?;

    Ok((status, body.to_string()))
}
