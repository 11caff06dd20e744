//! End-to-end tests for the kapsule binary against a fake backend.
//!
//! The fake backend is a shell script that records its arguments and
//! stdin, prints a line to each output stream, and exits with the status
//! in `FAKE_EXIT`, or kills itself with `SIGKILL` when `FAKE_KILL` is set.

#![cfg(unix)]

use assert_cmd::Command;
use kapsule::COMMANDS;
use predicates::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::os::unix::ffi::OsStringExt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_BACKEND: &str = r#"#!/bin/sh
for a in "$@"; do printf '%s\n' "$a"; done > "$FAKE_DIR/argv"
cat > "$FAKE_DIR/stdin"
echo "backend out"
echo "backend err" >&2
if [ -n "$FAKE_KILL" ]; then kill -9 $$; fi
exit "${FAKE_EXIT:-0}"
"#;

struct Fixture {
    dir: TempDir,
    backend: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let backend = dir.path().join("fake-ignite");
        fs::write(&backend, FAKE_BACKEND).unwrap();
        fs::set_permissions(&backend, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, backend }
    }

    fn kapsule(&self, exit: i32) -> Command {
        let mut cmd = Command::cargo_bin("kapsule").unwrap();
        cmd.env("KAPSULE_BACKEND", &self.backend)
            .env("KAPSULE_CONFIG", self.dir.path().join("missing.toml"))
            .env("FAKE_DIR", self.dir.path())
            .env("FAKE_EXIT", exit.to_string())
            .env_remove("RUST_LOG");
        cmd
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn argv(&self) -> Vec<String> {
        read_lines(&self.path("argv"))
    }

    fn stdin(&self) -> String {
        fs::read_to_string(self.path("stdin")).unwrap()
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn logs_forwards_name_and_relays_output() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .args(["logs", "myvm"])
        .assert()
        .success()
        .stdout("backend out\n")
        .stderr("backend err\n");

    assert_eq!(fx.argv(), vec!["logs", "myvm"]);
}

#[test]
fn run_forwards_flags_and_stdin() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .args(["run", "weaveworks/ignite-ubuntu", "--cpus", "2", "--name", "my vm", "--ssh"])
        .write_stdin("typed input\n")
        .assert()
        .success();

    assert_eq!(
        fx.argv(),
        vec!["run", "weaveworks/ignite-ubuntu", "--cpus", "2", "--name", "my vm", "--ssh"]
    );
    assert_eq!(fx.stdin(), "typed input\n");
}

#[test]
fn non_interactive_commands_do_not_forward_stdin() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .arg("ps")
        .write_stdin("should not arrive\n")
        .assert()
        .success();

    assert_eq!(fx.argv(), vec!["ps"]);
    assert_eq!(fx.stdin(), "");
}

#[test]
fn exec_passes_command_through() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .args(["exec", "vm1", "sh", "-c", "echo $HOME"])
        .write_stdin("")
        .assert()
        .success();

    assert_eq!(fx.argv(), vec!["exec", "vm1", "sh", "-c", "echo $HOME"]);
}

#[test]
fn missing_args_fail_without_spawning() {
    let fx = Fixture::new();
    for args in [&["rm"][..], &["logs"], &["cp", "src"], &["exec", "vm1"], &["stop"]] {
        fx.kapsule(0).args(args).assert().code(1);
    }
    assert!(!fx.path("argv").exists());
}

#[test]
fn backend_failure_prints_prefix_and_exits_one() {
    let fx = Fixture::new();
    fx.kapsule(3)
        .args(["rm", "vm1", "vm2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error removing VMs: exit status 3"))
        .stderr(predicate::str::contains("command failed"));

    assert_eq!(fx.argv(), vec!["rm", "vm1", "vm2"]);
}

#[test]
fn success_adds_no_error_text() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .arg("version")
        .assert()
        .success()
        .stderr(predicate::str::contains("Error").not());
}

#[test]
fn missing_backend_is_launch_error() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .env("KAPSULE_BACKEND", fx.path("no-such-backend"))
        .arg("images")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error listing images: failed to launch"));
}

#[test]
fn backend_from_config_file() {
    let fx = Fixture::new();
    let config = fx.path("config.toml");
    fs::write(&config, format!("backend = {:?}\n", fx.backend.display().to_string())).unwrap();

    fx.kapsule(0)
        .env_remove("KAPSULE_BACKEND")
        .env("KAPSULE_CONFIG", &config)
        .arg("kernels")
        .assert()
        .success();

    assert_eq!(fx.argv(), vec!["kernels"]);
}

#[test]
fn unknown_subcommand_exits_one() {
    let fx = Fixture::new();
    fx.kapsule(0).arg("delete").assert().code(1);
    assert!(!fx.path("argv").exists());
}

#[test]
fn version_flag_reports_own_version() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    assert!(!fx.path("argv").exists());
}

/// The minimum valid argument list for each command.
fn valid_args(min: usize) -> Vec<String> {
    (0..min).map(|i| format!("arg{}", i)).collect()
}

#[test]
fn every_command_exits_zero_on_backend_success() {
    let fx = Fixture::new();
    for spec in COMMANDS {
        let args = valid_args(spec.arity.min());
        fx.kapsule(0)
            .arg(spec.name)
            .args(&args)
            .write_stdin("")
            .assert()
            .success()
            .stderr("backend err\n");

        let mut expected = vec![spec.name.to_string()];
        expected.extend(args);
        assert_eq!(fx.argv(), expected, "{}", spec.name);
    }
}

#[test]
fn every_command_exits_one_with_its_prefix_on_backend_failure() {
    let fx = Fixture::new();
    for spec in COMMANDS {
        fx.kapsule(5)
            .arg(spec.name)
            .args(valid_args(spec.arity.min()))
            .write_stdin("")
            .assert()
            .code(1)
            .stderr(predicate::str::contains(format!(
                "{}: exit status 5",
                spec.error_prefix
            )));
    }
}

#[test]
fn killed_backend_exits_one() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .env("FAKE_KILL", "1")
        .args(["stop", "vm1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error stopping VMs: terminated by signal 9",
        ));
}

#[test]
fn non_utf8_argument_reaches_backend_unchanged() {
    let fx = Fixture::new();
    let source = OsString::from_vec(b"f\xffo".to_vec());
    fx.kapsule(0)
        .arg("cp")
        .arg(&source)
        .arg("dst")
        .assert()
        .success();

    let argv = fs::read(fx.path("argv")).unwrap();
    assert_eq!(argv, b"cp\nf\xffo\ndst\n".to_vec());
}

#[test]
fn bare_invocation_prints_help_and_succeeds() {
    let fx = Fixture::new();
    fx.kapsule(0)
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage"));
    assert!(!fx.path("argv").exists());
}
