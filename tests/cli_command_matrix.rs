use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("bunnylol");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level
    run_help(&home, &[]);

    // runtime commands
    run_help(&home, &["serve"]);
    run_help(&home, &["query"]);
    run_help(&home, &["list"]);
    run_help(&home, &["history"]);

    // grouped subcommands
    run_help(&home, &["history", "list"]);
    run_help(&home, &["history", "check"]);
    run_help(&home, &["history", "clear"]);
}

#[test]
fn version_flag_works() {
    let mut cmd = cargo_bin_cmd!("bunnylol");
    cmd.arg("--version").assert().success();
}
