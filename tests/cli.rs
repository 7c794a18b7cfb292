//! Runs the built binary and checks its exit status and configuration layering.

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

const BIN: &str = env!("CARGO_BIN_EXE_cors-static-server");

fn work_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cors-static-server-cli-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Run the server in `dir` and wait for it to exit.
///
/// A server that is still running after the deadline bound successfully,
/// which is a failure for every caller here.
fn run_server(dir: &Path, env: &[(&str, String)]) -> Output {
    let mut command = Command::new(BIN);
    command
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        command.env(key, value);
    }
    let mut child = command.spawn().unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while child.try_wait().unwrap().is_none() {
        if Instant::now() > deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("server kept running: it bound a port that was already taken");
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    child.wait_with_output().unwrap()
}

#[test]
fn exits_non_zero_when_configured_port_is_taken() {
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let dir = work_dir("file-port");
    std::fs::write(
        dir.join("cors-server.toml"),
        format!("[server]\nhost = \"127.0.0.1\"\nport = {port}\n"),
    )
    .unwrap();

    let output = run_server(&dir, &[]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("http://localhost:{port}")), "{stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!("failed to bind 127.0.0.1:{port}")), "{stderr}");

    drop(occupied);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn environment_overrides_config_file() {
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let dir = work_dir("env-port");
    // Invalid on purpose: only the environment values can produce a bind error
    std::fs::write(
        dir.join("cors-server.toml"),
        "[server]\nhost = \"not a host\"\nport = 1\n",
    )
    .unwrap();

    let output = run_server(
        &dir,
        &[
            ("CORS_SERVER__SERVER__HOST", "127.0.0.1".to_string()),
            ("CORS_SERVER__SERVER__PORT", port.to_string()),
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!("failed to bind 127.0.0.1:{port}")), "{stderr}");

    drop(occupied);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_address_exits_non_zero() {
    let dir = work_dir("bad-host");
    std::fs::write(dir.join("cors-server.toml"), "[server]\nhost = \"not a host\"\n").unwrap();

    let output = run_server(&dir, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[ERROR]"));

    let _ = std::fs::remove_dir_all(&dir);
}
