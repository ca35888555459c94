#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 假的 pip：按参数输出固定内容
const FAKE_PIP: &str = r#"#!/bin/sh
case "$1" in
  list)
    if [ "$2" = "--outdated" ]; then
      printf 'Package Version Latest Type\n------- ------- ------ -----\n'
      if [ -n "$FAKE_OUTDATED" ]; then printf '%s\n' "$FAKE_OUTDATED"; fi
    else
      printf 'Package Version\n------- -------\na       1.0\nb       3.0\n'
    fi
    ;;
  show)
    case "$2" in
      a) printf 'Name: a\nVersion: 1.0\nLocation: /home/u/.local/lib/python3/site-packages\nRequires: b\nRequired-by: \n' ;;
      b) printf 'Name: b\nVersion: 3.0\nLocation: /usr/lib/python3/dist-packages\nRequires: \nRequired-by: a\n' ;;
      *) echo "WARNING: Package(s) not found: $2" >&2; exit 1 ;;
    esac
    ;;
  install)
    echo "$2" >> "$FAKE_INSTALL_LOG"
    ;;
esac
"#;

struct TestEnv {
    tmp: TempDir,
    config: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let script = tmp.path().join("fake-pip.sh");
        fs::write(&script, FAKE_PIP).expect("write fake pip");

        let config = tmp.path().join("config.toml");
        let content = format!(
            r#"
user_dir = "/home/u/.local"
sys_dir = "/usr/lib/python3"
index_path = "{index}"
pip_command = ["sh", "{script}"]
report_dir = "{reports}"
jobs = 2
"#,
            index = tmp.path().join("pip_packages.json").display(),
            script = script.display(),
            reports = tmp.path().join("reports").display(),
        );
        fs::write(&config, content).expect("write config");
        Self { tmp, config }
    }

    fn path(&self) -> &Path {
        self.tmp.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lian-pip").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("FAKE_INSTALL_LOG", self.path().join("installs.log"))
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn rebuild(&self) {
        self.cmd()
            .arg("rebuild")
            .assert()
            .success()
            .stdout(contains("[2/2]"));
    }
}

#[test]
fn rebuild_writes_sorted_index() {
    let env = TestEnv::new();
    env.rebuild();

    let first = fs::read_to_string(env.path().join("pip_packages.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(value["a"]["requires"], serde_json::json!(["b"]));
    assert_eq!(value["b"]["required"], serde_json::json!(["a"]));
    assert!(first.find("\"a\"").unwrap() < first.find("\"b\"").unwrap());

    env.rebuild();
    let second = fs::read_to_string(env.path().join("pip_packages.json")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn outdated_reports_only_user_packages() {
    let env = TestEnv::new();
    env.rebuild();

    env.cmd()
        .arg("outdated")
        .env("FAKE_OUTDATED", "a 1.0 2.0 wheel\nb 3.0 3.1 wheel")
        .assert()
        .success()
        .stdout(contains("a\t\t1.0->2.0").and(contains("b\t\t").not()));
}

#[test]
fn outdated_with_nothing_to_do_says_up_to_date() {
    let env = TestEnv::new();
    env.rebuild();

    env.cmd()
        .arg("outdated")
        .assert()
        .success()
        .stdout(contains("已是最新"));
}

#[test]
fn outdated_without_index_fails() {
    let env = TestEnv::new();
    env.cmd()
        .arg("outdated")
        .assert()
        .failure()
        .stderr(contains("rebuild"));
}

#[test]
fn stale_index_is_reported() {
    let env = TestEnv::new();
    env.rebuild();

    env.cmd()
        .arg("outdated")
        .env("FAKE_OUTDATED", "ghost 0.1 0.2 wheel")
        .assert()
        .failure()
        .stderr(contains("ghost"));
}

#[test]
fn upgrade_installs_user_packages_only() {
    let env = TestEnv::new();
    env.rebuild();

    env.cmd()
        .arg("upgrade")
        .env("FAKE_OUTDATED", "a 1.0 2.0 wheel\nb 3.0 3.1 wheel")
        .assert()
        .success()
        .stdout(contains("已升级 1 个包"));

    let installs = fs::read_to_string(env.path().join("installs.log")).unwrap();
    assert_eq!(installs, "a\n");
    assert!(env.path().join("reports").exists());
}

#[test]
fn upgrade_dry_run_installs_nothing() {
    let env = TestEnv::new();
    env.rebuild();

    env.cmd()
        .args(["upgrade", "--dry-run"])
        .env("FAKE_OUTDATED", "a 1.0 2.0 wheel")
        .assert()
        .success()
        .stdout(contains("将升级 a"));
    assert!(!env.path().join("installs.log").exists());
}

#[test]
fn graph_without_render_writes_dot() {
    let env = TestEnv::new();
    env.rebuild();

    env.cmd()
        .args(["graph", "deps.dot", "--no-render"])
        .assert()
        .success();

    let dot = fs::read_to_string(env.path().join("deps.dot")).unwrap();
    assert!(dot.contains("\t\"a\" [color=cyan]\n"));
    assert!(dot.contains("\t\"b\" [color=lightpink]\n"));
    assert!(dot.contains("\t\"a\"->\"b\"\n"));
}

#[test]
fn dependents_reads_required_by() {
    let env = TestEnv::new();
    env.rebuild();

    env.cmd()
        .args(["dependents", "b"])
        .assert()
        .success()
        .stdout(contains("a"));

    env.cmd()
        .args(["show", "a"])
        .assert()
        .success()
        .stdout(contains("类别: user"));
}
