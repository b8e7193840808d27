use assert_cmd::Command;

fn libris() -> Command {
    let mut cmd = Command::cargo_bin("libris").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = libris().arg("--help").assert().success().get_output().stdout.clone();
    let help = String::from_utf8(output).unwrap();
    for subcommand in ["serve", "list", "add", "update", "delete", "shell"] {
        assert!(help.contains(subcommand), "missing {subcommand} in:\n{help}");
    }
}

#[test]
fn unreachable_service_reports_generic_message() {
    let assert = libris()
        .args(["list", "--api-url", "http://127.0.0.1:1/api/books"])
        .assert()
        .failure();

    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    // Logs go to stderr; stdout only carries the rendered screen.
    assert_eq!(stdout, "Error: Something went wrong\n");
    assert!(stderr.contains("Something went wrong"));
    assert!(stderr.contains("catalog request failed"));
}

#[test]
fn malformed_id_fails_before_any_request() {
    let assert = libris()
        .args(["delete", "12", "--api-url", "http://127.0.0.1:1/api/books"])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("Invalid ID"));
}
