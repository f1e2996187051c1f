use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        Self { _tmp: tmp, home }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("bunnylol");
        cmd.env("HOME", &self.home).env_remove("RUST_LOG");
        cmd
    }

    pub fn history_path(&self) -> PathBuf {
        self.home.join(".local/share/bunnylol/history.jsonl")
    }

    /// Writes `~/.config/bunnylol/config.toml`.
    pub fn write_config(&self, body: &str) -> PathBuf {
        let path = self.home.join(".config/bunnylol/config.toml");
        fs::create_dir_all(path.parent().expect("config dir")).expect("create config dir");
        fs::write(&path, body).expect("write config");
        path
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }
}
