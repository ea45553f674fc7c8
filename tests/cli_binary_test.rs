//! End-to-end tests of the compiled binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary isolated from the user's config files and LENSES_* environment.
fn lenses_cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lenses-cli").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("LENSES_HOST")
        .env_remove("LENSES_TOKEN")
        .env_remove("LENSES_OUTPUT");
    cmd
}

#[test]
fn given_topic_create_without_name_when_running_then_usage_exit_code() {
    let home = TempDir::new().unwrap();

    lenses_cli(&home)
        .env("LENSES_HOST", "http://127.0.0.1:1")
        .args(["topic", "create"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("\"name\""));
}

#[test]
fn given_no_host_when_running_remote_command_then_config_exit_code() {
    let home = TempDir::new().unwrap();

    lenses_cli(&home)
        .args(["topics"])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("no host configured"));
}

#[test]
fn given_unreachable_host_when_listing_topics_then_unavailable_exit_code() {
    let home = TempDir::new().unwrap();

    lenses_cli(&home)
        .args(["--host", "http://127.0.0.1:1", "--timeout", "2", "topics"])
        .assert()
        .code(69)
        .stderr(predicate::str::contains("request failed"));
}

#[test]
fn given_local_config_when_showing_config_then_token_is_masked() {
    // Arrange
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join(".lenses-cli.toml"),
        "host = \"http://lenses.local:9991\"\ntoken = \"very-secret\"\n",
    )
    .unwrap();

    // Act / Assert
    lenses_cli(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://lenses.local:9991"))
        .stdout(predicate::str::contains("very-secret").not());
}

#[test]
fn given_existing_local_config_when_init_then_refuses_to_overwrite() {
    let home = TempDir::new().unwrap();

    lenses_cli(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join(".lenses-cli.toml").exists());

    lenses_cli(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn given_shell_when_generating_completion_then_script_names_binary() {
    let home = TempDir::new().unwrap();

    lenses_cli(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lenses-cli"));
}
