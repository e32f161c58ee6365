mod common;

use common::*;

#[test]
fn dry_run_shows_diff_and_writes_nothing() {
    let env = TestEnv::new();
    seed_dav1d(&env);
    write_config(&env, "rewriter.sh");

    let result = env.run(&["inject", "--dry-run"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("--- a/tools/dav1d.c"), "stdout:\n{}", result.stdout);
    assert!(result.stdout.contains("+#define IA2_COMPARTMENT 1"), "stdout:\n{}", result.stdout);
    assert!(result.stdout.contains("2 entry files would change"));
    assert_eq!(env.read_primary("src/lib.c"), LIB_C);
    assert_eq!(env.read_primary("tools/dav1d.c"), DAV1D_C);
}

#[test]
fn inject_writes_preambles_once() {
    let env = TestEnv::new();
    seed_dav1d(&env);
    write_config(&env, "rewriter.sh");

    let first = env.run(&["inject"]);
    assert!(first.success, "{}", first.combined_output());
    assert!(first.stdout.contains("2 entry files updated"));

    let lib = env.read_primary("src/lib.c");
    let tool = env.read_primary("tools/dav1d.c");
    assert!(lib.starts_with("/* compart:preamble v1 sha256:"));
    assert!(lib.contains("#define IA2_COMPARTMENT 2"));
    assert!(!lib.contains("INIT_RUNTIME"));
    assert!(tool.contains("#define IA2_COMPARTMENT 1"));
    assert!(tool.contains("INIT_RUNTIME(2)"));
    assert!(lib.ends_with(LIB_C));
    assert_eq!(env.read_primary("src/data.c"), DATA_C);
    assert_eq!(env.read_primary("tests/seek_stress.c"), SEEK_STRESS_C);

    let second = env.run(&["inject"]);
    assert!(second.success);
    assert!(second.stdout.contains("0 entry files updated"));
    assert_eq!(env.read_primary("src/lib.c"), lib);
    assert_eq!(env.read_primary("tools/dav1d.c"), tool);
}

#[test]
fn inject_json_reports_each_entry_file() {
    let env = TestEnv::new();
    seed_dav1d(&env);
    write_config(&env, "rewriter.sh");

    let result = env.run(&["--json", "inject"]);

    assert!(result.success, "{}", result.combined_output());
    let events = result.events();
    let files: Vec<&serde_json::Value> = events.iter().filter(|e| e["event"] == "file").collect();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f["change"] == "inserted"));

    let data = events.last().unwrap();
    assert_eq!(data["event"], "data");
    assert_eq!(data["files"][0]["path"], "tools/dav1d.c");
    assert_eq!(data["files"][0]["binary"], true);
    assert_eq!(data["files"][1]["binary"], false);
}

#[test]
fn stale_preamble_is_replaced() {
    let env = TestEnv::new();
    seed_dav1d(&env);
    write_config(&env, "rewriter.sh");
    assert!(env.run(&["inject"]).success);

    // Move src to key 3; the old block must go, not stack up.
    let mut config = env.read_primary("compart.toml");
    config.push_str(
        "\n[compartments.src]\nkey = 3\nentry = \"lib.c\"\n\n[compartments.tools]\nkey = 1\nentry = \"dav1d.c\"\n",
    );
    env.write_primary("compart.toml", &config);

    let result = env.run(&["--json", "inject"]);

    assert!(result.success, "{}", result.combined_output());
    let lib = env.read_primary("src/lib.c");
    assert_eq!(lib.matches("compart:preamble v1").count(), 1);
    assert!(lib.contains("#define IA2_COMPARTMENT 3"));
    assert!(!lib.contains("#define IA2_COMPARTMENT 2"));
    assert!(env.read_primary("tools/dav1d.c").contains("INIT_RUNTIME(2)"));

    let changes: Vec<(String, String)> = result
        .events()
        .iter()
        .filter(|e| e["event"] == "file")
        .map(|e| (e["path"].as_str().unwrap().to_string(), e["change"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        changes,
        vec![
            ("tools/dav1d.c".to_string(), "unchanged".to_string()),
            ("src/lib.c".to_string(), "replaced".to_string()),
        ]
    );
}
