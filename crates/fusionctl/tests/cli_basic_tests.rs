use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a test command
fn fusionctl() -> Command {
    Command::cargo_bin("fusionctl").unwrap()
}

/// Helper to create a test command with an isolated config file
fn fusionctl_with_config(path: &std::path::Path) -> Command {
    let mut cmd = fusionctl();
    cmd.arg("--config-file").arg(path);
    cmd
}

#[test]
fn test_help_flag() {
    fusionctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fusion management CLI"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_help_short_flag() {
    fusionctl()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    fusionctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fusionctl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_args_shows_help() {
    fusionctl()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    fusionctl()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_profile_help() {
    fusionctl()
        .arg("profile")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile management"));
}

#[test]
fn test_operation_help() {
    fusionctl()
        .arg("operation")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation tracking"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("wait"));
}

#[test]
fn test_operation_alias() {
    fusionctl()
        .arg("op")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation tracking"));
}

#[test]
fn test_operation_wait_help_shows_defaults() {
    fusionctl()
        .arg("operation")
        .arg("wait")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--wait-timeout"))
        .stdout(predicate::str::contains("--wait-interval"))
        .stdout(predicate::str::contains("default: 300"))
        .stdout(predicate::str::contains("default: 2"));
}

#[test]
fn test_operation_wait_missing_id() {
    fusionctl()
        .arg("operation")
        .arg("wait")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_operation_list_has_default_limit() {
    fusionctl()
        .arg("operation")
        .arg("list")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("default: 25"));
}

#[test]
fn test_api_help_shows_examples() {
    fusionctl()
        .arg("api")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Raw API access"))
        .stdout(predicate::str::contains("EXAMPLES:"))
        .stdout(predicate::str::contains("api get /arrays"));
}

#[test]
fn test_api_invalid_method() {
    fusionctl()
        .arg("api")
        .arg("head")
        .arg("/operations")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid HTTP method"));
}

#[test]
fn test_api_missing_path() {
    fusionctl()
        .arg("api")
        .arg("get")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_api_wait_flags_accepted() {
    fusionctl()
        .arg("api")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--wait"))
        .stdout(predicate::str::contains("--wait-timeout"))
        .stdout(predicate::str::contains("--wait-interval"));
}

#[test]
fn test_invalid_output_format() {
    fusionctl()
        .arg("profile")
        .arg("list")
        .arg("-o")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_completions_help() {
    fusionctl()
        .arg("completions")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate shell completions"))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"));
}

#[test]
fn test_completions_bash_output() {
    fusionctl()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("fusionctl"));
}

#[test]
fn test_profile_set_missing_required_args() {
    fusionctl()
        .arg("profile")
        .arg("set")
        .arg("test-profile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--api-url"));
}

#[test]
fn test_profile_show_missing_name() {
    fusionctl()
        .arg("profile")
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_profile_list_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fusionctl_with_config(&config)
        .arg("profile")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_profile_set_list_show_remove_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fusionctl_with_config(&config)
        .args([
            "profile",
            "set",
            "lab",
            "--api-url",
            "https://fusion.lab:8443",
            "--api-token",
            "secret-token",
            "--insecure",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'lab' saved"));

    // The sole profile becomes the default
    fusionctl_with_config(&config)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab"))
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("https://fusion.lab:8443"));

    // Show must not leak the token value
    fusionctl_with_config(&config)
        .args(["profile", "show", "lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API token: configured"))
        .stdout(predicate::str::contains("secret-token").not());

    fusionctl_with_config(&config)
        .args(["profile", "remove", "lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'lab' removed"));

    fusionctl_with_config(&config)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_profile_show_unknown_profile_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fusionctl_with_config(&config)
        .args(["profile", "show", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'ghost' not found"));
}

#[test]
fn test_profile_default_unknown_profile_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fusionctl_with_config(&config)
        .args(["profile", "default", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'ghost' not found"));
}

#[test]
fn test_profile_list_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fusionctl_with_config(&config)
        .args([
            "profile",
            "set",
            "lab",
            "--api-url",
            "https://fusion.lab:8443",
        ])
        .assert()
        .success();

    fusionctl_with_config(&config)
        .args(["profile", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("\"has_token\": false"));
}

#[test]
fn test_operation_get_without_profiles_fails_with_guidance() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fusionctl_with_config(&config)
        .args(["operation", "get", "op1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No profile configured"))
        .stderr(predicate::str::contains("fusionctl profile set"));
}

#[test]
fn test_query_flag_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fusionctl_with_config(&config)
        .args(["profile", "list", "-o", "json", "-q", "count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_verbose_flags_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fusionctl_with_config(&config)
        .arg("-vvv")
        .args(["profile", "list"])
        .assert()
        .success();
}
