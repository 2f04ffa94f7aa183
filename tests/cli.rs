use footy_tools::auth::password::hash_password;
use std::env;
use std::io::Read;
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const CONFIG_KEYS: &[&str] = &[
    "SEED_ADMIN_EMAIL",
    "SEED_ADMIN_PASSWORD",
    "BCRYPT_COST",
    "API_BASE_URL",
    "SMOKE_USER_EMAIL",
    "SMOKE_USER_PASSWORD",
    "SMOKE_ADMIN_EMAIL",
    "SMOKE_ADMIN_PASSWORD",
    "SMOKE_TIMEOUT_SECS",
];

/// A bin with none of the config keys inherited, run away from any `.env`.
fn bin(path: &str) -> Command {
    let mut command = Command::new(path);
    for key in CONFIG_KEYS {
        command.env_remove(key);
    }
    command
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off")
        .current_dir(env::temp_dir());
    command
}

fn run(command: &mut Command) -> Output {
    command.output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
}

/// Accepts connections and never answers them.
fn silent_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    url
}

/// Like `run`, but kills the child if it outlives `limit`.
fn run_within(command: &mut Command, limit: Duration) -> Output {
    let mut child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let mut out = child.stdout.take().unwrap();
    let reader = thread::spawn(move || {
        let mut buf = Vec::new();
        out.read_to_end(&mut buf).unwrap();
        buf
    });

    let started = Instant::now();
    while child.try_wait().unwrap().is_none() {
        if started.elapsed() > limit {
            child.kill().unwrap();
            panic!("process still running after {:?}", limit);
        }
        thread::sleep(Duration::from_millis(50));
    }
    let mut output = child.wait_with_output().unwrap();
    output.stdout = reader.join().unwrap();
    output
}

// ----------------------------------------------------------------------------
// seed_admin / seed_test_users
// ----------------------------------------------------------------------------

#[test]
fn seed_admin_hash_failure_exits_without_output() {
    let output = run(bin(env!("CARGO_BIN_EXE_seed_admin")).env("BCRYPT_COST", "99"));

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "stdout: {}", stdout(&output));
    assert!(stderr(&output).contains("ERROR"));
}

#[test]
fn seed_admin_flags_override_environment() {
    let output = run(bin(env!("CARGO_BIN_EXE_seed_admin"))
        .env("SEED_ADMIN_EMAIL", "env@example.com")
        .env("SEED_ADMIN_PASSWORD", "")
        .env("BCRYPT_COST", "99")
        .args(["--email", "flag@example.com", "--password", "good", "--cost", "4"]));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let script = stdout(&output);
    let deletes: Vec<&str> = script.lines().filter(|l| l.starts_with("DELETE")).collect();
    assert_eq!(deletes, vec!["DELETE FROM users WHERE email = 'flag@example.com';"]);
    assert!(!script.contains("env@example.com"));
    assert!(script.contains("$2a$04$"));
}

#[test]
fn seed_admin_empty_password_without_override_is_fatal() {
    let output = run(bin(env!("CARGO_BIN_EXE_seed_admin"))
        .env("SEED_ADMIN_PASSWORD", "")
        .args(["--cost", "4"]));

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("SEED_ADMIN_PASSWORD"));
}

#[test]
fn seed_test_users_ignores_admin_settings() {
    let output = run(bin(env!("CARGO_BIN_EXE_seed_test_users"))
        .env("SEED_ADMIN_EMAIL", "")
        .env("SEED_ADMIN_PASSWORD", "")
        .args(["--cost", "4"]));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let script = stdout(&output);
    assert_eq!(script.lines().filter(|l| l.starts_with("INSERT INTO users (")).count(), 5);
    assert_eq!(script.lines().filter(|l| l.starts_with("DELETE FROM users")).count(), 5);
}

// ----------------------------------------------------------------------------
// verify_hash
// ----------------------------------------------------------------------------

#[test]
fn verify_hash_exit_codes() {
    let hash = hash_password("Admin123!@#", 4).unwrap();

    let matched = run(bin(env!("CARGO_BIN_EXE_verify_hash")).args(["Admin123!@#", hash.as_str()]));
    assert_eq!(matched.status.code(), Some(0));
    assert!(stdout(&matched).contains(&format!("Hash: {}", hash)));
    assert!(stdout(&matched).lines().any(|l| l.starts_with("Match:") && l.contains("true")));

    let mismatched = run(bin(env!("CARGO_BIN_EXE_verify_hash")).args(["wrong", hash.as_str()]));
    assert_eq!(mismatched.status.code(), Some(1));
    assert!(stdout(&mismatched).lines().any(|l| l.starts_with("Match:") && l.contains("false")));

    let malformed = run(bin(env!("CARGO_BIN_EXE_verify_hash")).args(["Admin123!@#", "not-a-hash"]));
    assert_eq!(malformed.status.code(), Some(2));
    assert!(stderr(&malformed).contains("ERROR"));
}

// ----------------------------------------------------------------------------
// api_smoke
// ----------------------------------------------------------------------------

#[test]
fn api_smoke_exits_nonzero_when_cases_fail() {
    let output = run(bin(env!("CARGO_BIN_EXE_api_smoke"))
        .env("API_BASE_URL", dead_url())
        .args(["--suite", "public"]));

    assert_eq!(output.status.code(), Some(1));
    let report = stdout(&output);
    assert!(report.contains("not running or unreachable"));
    assert!(report.contains("TEST SUMMARY"));
}

#[test]
fn api_smoke_runs_selected_suites_in_dependency_order() {
    let base_url = dead_url();
    let output = run(bin(env!("CARGO_BIN_EXE_api_smoke")).args([
        "--base-url",
        base_url.as_str(),
        "--suite",
        "admin",
        "--suite",
        "login",
        "--suite",
        "admin",
    ]));

    assert_eq!(output.status.code(), Some(1));
    let report = stdout(&output);
    let login = report.find("LOGIN TESTS").unwrap();
    let admin = report.find("ADMIN ROUTE TESTS").unwrap();
    assert!(login < admin, "{}", report);
    assert_eq!(report.matches("ADMIN ROUTE TESTS").count(), 1);
}

#[test]
fn api_smoke_gives_up_on_a_silent_server() {
    let output = run_within(
        bin(env!("CARGO_BIN_EXE_api_smoke"))
            .env("API_BASE_URL", silent_url())
            .env("SMOKE_TIMEOUT_SECS", "1")
            .args(["--suite", "public"]),
        Duration::from_secs(30),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("did not respond in time"));
}

#[test]
fn api_smoke_rejects_zero_timeout() {
    let from_env = run(bin(env!("CARGO_BIN_EXE_api_smoke"))
        .env("API_BASE_URL", dead_url())
        .env("SMOKE_TIMEOUT_SECS", "0"));
    assert!(!from_env.status.success());
    assert!(stderr(&from_env).contains("SMOKE_TIMEOUT_SECS"));
    assert!(!stdout(&from_env).contains("TEST SUMMARY"));

    let base_url = dead_url();
    let from_flag = run(bin(env!("CARGO_BIN_EXE_api_smoke")).args([
        "--base-url",
        base_url.as_str(),
        "--timeout",
        "0",
    ]));
    assert!(!from_flag.status.success());
    assert!(stderr(&from_flag).contains("--timeout"));
}
