//! End-to-end runs of the compiled binary against stand-in tools.

#![cfg(unix)]

mod common;

use common::*;

fn project() -> TestEnv {
    let env = TestEnv::new();
    seed_dav1d(&env);
    install_script(&env, "fake-rewriter.sh", FAKE_REWRITER);
    write_config(&env, "fake-rewriter.sh");
    env
}

#[test]
fn run_produces_compartmentalized_secondary_tree() {
    let env = project();

    let result = env.run(&["run", "--skip-sync"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("==> rewrite"));
    assert!(result.stdout.contains("==> sync (skipped: --skip-sync)"));

    let lib = env.read_secondary("src/lib.c");
    assert!(lib.starts_with("/* compart:preamble v1 sha256:"));
    assert_eq!(lib.matches("#define IA2_COMPARTMENT 2").count(), 1);
    assert!(lib.ends_with("/* rewritten */\n"));

    let tool = env.read_secondary("tools/dav1d.c");
    assert!(tool.contains("INIT_RUNTIME(2)"));
    assert!(tool.contains("#define IA2_COMPARTMENT 1"));

    // Rewritten but not on the keep list
    assert!(!env.secondary_path("src/data.c").exists());
    assert!(env.primary_path("build/compart-rewritten/src/data.c").exists());
    assert!(!env.secondary_path("tests/seek_stress.c").exists());
}

#[test]
fn leftover_rewriter_output_is_not_merged() {
    let env = project();
    env.write_primary(
        "build/compart-rewritten/tools/output/stale.c",
        "STALE REWRITE FROM PREVIOUS RUN\n",
    );

    let result = env.run(&["run", "--skip-sync", "--skip-bootstrap"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(!env.secondary_path("tools/output/stale.c").exists());
    assert!(!env.primary_path("build/compart-rewritten/tools/output").exists());
    assert!(env.read_secondary("tools/dav1d.c").ends_with("/* rewritten */\n"));
}

#[test]
fn bootstrap_canonicalizes_the_compile_database() {
    let env = project();

    let result = env.run(&["run", "--skip-sync"]);

    assert!(result.success, "{}", result.combined_output());
    let db: serde_json::Value =
        serde_json::from_str(&env.read_primary("build/compile_commands.json")).unwrap();
    let expected = env.primary_path("src/lib.c").display().to_string();
    assert_eq!(db[0]["file"], expected.as_str());
    assert_eq!(db[0]["output"], "src/lib.c.o");
}

#[test]
fn per_compartment_mode_invokes_rewriter_per_key() {
    let env = project();

    let result = env.run(&["run", "--skip-sync", "--skip-bootstrap"]);

    assert!(result.success, "{}", result.combined_output());
    let log = env.read_primary("rewriter.log");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("-DPKEY=1"));
    assert!(lines[0].contains("tools/dav1d.c"));
    assert!(!lines[0].contains("src/lib.c"));
    assert!(lines[1].contains("-DPKEY=2"));
    assert!(!lines.iter().any(|l| l.contains("seek_stress.c")));
}

#[test]
fn unified_mode_invokes_rewriter_once_without_pkey() {
    let env = project();

    let result = env.run(&["run", "--skip-sync", "--skip-bootstrap", "--mode", "unified"]);

    assert!(result.success, "{}", result.combined_output());
    let log = env.read_primary("rewriter.log");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(!lines[0].contains("-DPKEY"));
    for file in ["src/lib.c", "src/data.c", "tools/dav1d.c"] {
        assert_eq!(lines[0].matches(file).count(), 1, "{}", file);
    }
}

#[test]
fn rerun_leaves_entry_files_alone() {
    let env = project();
    assert!(env.run(&["run", "--skip-sync"]).success);
    let lib = env.read_primary("src/lib.c");
    let tool = env.read_primary("tools/dav1d.c");

    let result = env.run(&["--json", "run", "--skip-sync"]);

    assert!(result.success, "{}", result.combined_output());
    assert_eq!(env.read_primary("src/lib.c"), lib);
    assert_eq!(env.read_primary("tools/dav1d.c"), tool);

    let events = result.events();
    let primary_changes: Vec<&serde_json::Value> = events
        .iter()
        .filter(|e| e["event"] == "file" && e["stage"] == "inject-primary")
        .collect();
    assert_eq!(primary_changes.len(), 2);
    assert!(primary_changes.iter().all(|e| e["change"] == "unchanged"));
    assert!(events.iter().any(|e| e["event"] == "stage" && e["stage"] == "rewrite"));
    assert!(events.iter().any(|e| e["event"] == "stage" && e["stage"] == "build"));
    assert_eq!(events.last().unwrap()["event"], "data");
    assert_eq!(env.read_primary("rewriter.log").lines().count(), 4);
}

#[test]
fn rewriter_failure_exits_with_its_code() {
    let env = project();
    install_script(&env, "fake-rewriter.sh", FAILING_REWRITER);

    let result = env.run(&["run", "--skip-sync", "--skip-bootstrap"]);

    assert_eq!(result.exit_code, 3, "{}", result.combined_output());
    assert!(result.stderr.contains("failed with exit code 3"), "stderr:\n{}", result.stderr);
    assert!(!env.secondary_path("src/lib.c").exists());
}

#[test]
fn inspect_without_terminal_aborts() {
    let env = project();
    install_script(&env, "fake-rewriter.sh", FAILING_REWRITER);

    let result = env.run(&["--json", "run", "--skip-sync", "--skip-bootstrap", "--on-failure", "inspect"]);

    assert_eq!(result.exit_code, 3);
    let error = result.events().into_iter().last().unwrap();
    assert_eq!(error["event"], "error");
    assert_eq!(error["category"], "external-tool");
    assert_eq!(error["exit_code"], 3);
}

#[test]
fn build_failure_exits_with_build_code() {
    let env = project();
    install_script(&env, "fake-build.sh", "#!/bin/sh\nexit 7\n");
    let config = env
        .read_primary("compart.toml")
        .replace("build = [\"true\"]", &format!("build = [\"{}\"]", env.primary_path("fake-build.sh").display()));
    env.write_primary("compart.toml", &config);

    let result = env.run(&["run", "--skip-sync"]);

    assert_eq!(result.exit_code, 7, "{}", result.combined_output());
    // Bootstrap failed, nothing downstream ran
    assert!(!env.primary_path("rewriter.log").exists());
}

#[test]
fn sync_clones_then_pulls() {
    let env = project();
    install_script(&env, "fake-git.sh", FAKE_GIT);
    append_config(
        &env,
        &format!("[sync]\ngit = \"{}\"\n", env.primary_path("fake-git.sh").display()),
    );

    let first = env.run(&["sync"]);
    assert!(first.success, "{}", first.combined_output());
    assert!(first.stdout.contains("cloned"));

    let second = env.run(&["--json", "sync"]);
    assert!(second.success, "{}", second.combined_output());
    let data = second.events().into_iter().last().unwrap();
    assert_eq!(data["cloned"], false);
    assert_eq!(data["stashed"], false);

    let log = env.read_primary("git.log");
    let lines: Vec<&str> = log.lines().collect();
    assert!(lines[0].starts_with("clone "));
    assert_eq!(&lines[1..], &["status --porcelain", "pull --rebase"]);
}
