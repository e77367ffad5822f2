use std::io::{self, Write};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn sham() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sham"));
    for var in [
        "SHAM_SEED",
        "SHAM_GENERATORS",
        "SHAM_MAX_REPEAT",
        "SHAM_OPTIONAL_PROBABILITY",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn run(args: &[&str]) -> Output {
    sham().args(args).output().unwrap()
}

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = sham()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let written = child.stdin.take().unwrap().write_all(input.as_bytes());
    // sham may exit without reading stdin when a schema argument is given
    if let Err(e) = written {
        assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
    }
    child.wait_with_output().unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_schema_argument_json() {
    let output = run(&["--seed", "1", r#"{"a": 1, "b": [(2), true]}"#]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec![r#"{"a":1,"b":[true,true]}"#]);
}

#[test]
fn test_schema_from_stdin() {
    let output = run_with_stdin(&["-f", "xml"], r#"{"user": {"ok": false}}"#);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["<user><ok>false</ok></user>"]);
}

#[test]
fn test_count_writes_one_document_per_line() {
    let output = run(&["-n", "5", "--seed", "9", "(1, 6)"]);

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 5);
    for line in lines {
        let n: i64 = line.parse().unwrap();
        assert!((1..=6).contains(&n));
    }
}

#[test]
fn test_seed_is_reproducible() {
    let args = ["-n", "3", "--seed", "42", r#"{"n": name, "p": phoneNumber}"#];
    let first = run(&args);
    let second = run(&args);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_seed_from_env() {
    let with_flag = run(&["--seed", "5", "uuid"]);
    let with_env = sham().env("SHAM_SEED", "5").arg("uuid").output().unwrap();

    assert!(with_env.status.success());
    assert_eq!(with_flag.stdout, with_env.stdout);
}

#[test]
fn test_pretty_json() {
    let output = run(&["--pretty", r#"{"a": {"b": 1}}"#]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "{\n    \"a\": {\n        \"b\": 1\n    }\n}\n"
    );
}

#[test]
fn test_custom_generators_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "generators:\n  status:\n    type: one_of\n    values: [active]\n"
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let output = run(&["--generators", path, r#"{"s": status}"#]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec![r#"{"s":"active"}"#]);
}

#[test]
fn test_optional_probability_flag() {
    let output = run(&["-n", "5", "--optional-probability", "0", "/ab?/"]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec![r#""a""#; 5]);
}

#[test]
fn test_parse_error_exits_with_message() {
    let output = run(&[r#"{"a": }"#]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error: Failed to parse schema"), "{stderr}");
}

#[test]
fn test_unknown_generator_exits_with_message() {
    let output = run(&["nobody"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown terminal generator \"nobody\""), "{stderr}");
}

#[test]
fn test_no_schema_is_an_error() {
    let output = run(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr).unwrap().contains("no schema provided"));
}

#[test]
fn test_argument_ignores_stdin() {
    let output = run_with_stdin(&["null"], "true");

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["null"]);
}

#[test]
fn test_argument_does_not_wait_on_open_stdin() {
    let mut child = sham()
        .arg("1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // Keep the write end open for the whole run.
    let stdin = child.stdin.take().unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if Instant::now() >= deadline {
            break None;
        }
        thread::sleep(Duration::from_millis(20));
    };

    if status.is_none() {
        child.kill().unwrap();
    }
    drop(stdin);
    let output = child.wait_with_output().unwrap();

    assert!(status.is_some(), "sham blocked on an idle stdin pipe");
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["1"]);
}

#[test]
fn test_invalid_xml_name() {
    let output = run(&["-f", "xml", r#"{"1bad": 1}"#]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("Invalid XML element name"));
}

#[test]
fn test_invalid_max_repeat() {
    let output = run(&["--max-repeat", "1", "/a*/"]);

    assert_eq!(output.status.code(), Some(1));
}
