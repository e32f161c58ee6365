use std::process::Command;

#[test]
fn test_help_lists_every_command() {
    let bin = env!("CARGO_BIN_EXE_compart");

    let output = Command::new(bin).arg("--help").output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["run", "assign", "inject", "rewrite", "patch", "sync", "canonicalize"] {
        assert!(
            stdout.contains(command),
            "help output should list '{}'; got:\n{}",
            command,
            stdout
        );
    }
}

#[test]
fn test_unknown_mode_is_a_usage_error() {
    let bin = env!("CARGO_BIN_EXE_compart");

    let output = Command::new(bin)
        .args(["run", "--mode", "sideways"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown rewrite mode"), "stderr:\n{}", stderr);
}
