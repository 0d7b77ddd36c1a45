use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_anon-mmap-smoke");

#[test]
fn default_run() {
    let output = Command::new(BIN).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        vec!["mmap(): OK", "[u8]", "0", "99", "101", "munmap(): OK"],
        lines
    );
}

#[test]
fn custom_values() {
    let output = Command::new(BIN)
        .args(["--slots", "1", "--first", "1", "--second", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\n1\n2\n"));
}

#[test]
fn zero_slots_fails() {
    let output = Command::new(BIN).args(["--slots", "0"]).output().unwrap();
    assert_eq!(Some(1), output.status.code());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error: cannot map an empty region"));
}

#[test]
fn placeholder() {
    let output = Command::new(BIN).arg("--no-access").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("mmap(): OK\n"));
    assert!(stdout.ends_with("munmap(): OK\n"));
}
