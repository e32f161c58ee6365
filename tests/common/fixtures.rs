//! Reusable project content.

use super::env::TestEnv;

pub const LIB_C: &str = "#include \"config.h\"\n\nint dav1d_open(void) { return 0; }\n";
pub const DATA_C: &str = "int dav1d_data_create(void) { return 0; }\n";
pub const DAV1D_C: &str = "#include <stdio.h>\n\nint main(int argc, char *argv[]) {\n    return 0;\n}\n";
pub const SEEK_STRESS_C: &str = "int main(void) { return 0; }\n";

/// Compile database with `directory` = build dir and build-relative files,
/// the way meson writes it.
pub fn compile_db(env: &TestEnv) -> String {
    let build = env.primary_path("build");
    let records: Vec<serde_json::Value> = ["src/lib.c", "src/data.c", "tools/dav1d.c", "tests/seek_stress.c"]
        .iter()
        .map(|file| {
            serde_json::json!({
                "directory": build.display().to_string(),
                "file": format!("../{}", file),
                "command": format!("cc -c ../{}", file),
                "output": format!("{}.o", file),
            })
        })
        .collect();
    serde_json::to_string_pretty(&records).unwrap()
}

/// Minimal dav1d-shaped primary tree with a compile database.
pub fn seed_dav1d(env: &TestEnv) {
    env.write_primary("src/lib.c", LIB_C);
    env.write_primary("src/data.c", DATA_C);
    env.write_primary("tools/dav1d.c", DAV1D_C);
    env.write_primary("tests/seek_stress.c", SEEK_STRESS_C);
    env.write_primary("build/compile_commands.json", &compile_db(env));
}

/// `compart.toml` pointing every tool at harmless stand-ins.
///
/// `rewriter` is a path relative to the primary root.
pub fn write_config(env: &TestEnv, rewriter: &str) {
    let config = format!(
        r#"patches = []

[project]
secondary_tree = "{secondary}"

[rewriter]
binary = "{rewriter}"

[toolchain]
resource_include = "/usr/include"

[build]
configure = ["true"]
build = ["true"]
cc = "true"
"#,
        secondary = env.secondary.path().display(),
        rewriter = rewriter,
    );
    env.write_primary("compart.toml", &config);
}

/// Append TOML tables to the project configuration.
pub fn append_config(env: &TestEnv, tables: &str) {
    let mut config = env.read_primary("compart.toml");
    config.push('\n');
    config.push_str(tables);
    env.write_primary("compart.toml", &config);
}

/// Swap the top-level patch list.
pub fn set_patches(env: &TestEnv, patches: &str) {
    let config = env
        .read_primary("compart.toml")
        .replacen("patches = []", &format!("patches = {}", patches), 1);
    env.write_primary("compart.toml", &config);
}

/// Rewriter stand-in: copies each input file into the output directory under
/// its root-relative path with a marker line appended, and logs its arguments
/// to `rewriter.log` next to itself.
#[cfg(unix)]
pub const FAKE_REWRITER: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/rewriter.log"
out=""
root=""
while [ $# -gt 0 ]; do
    case "$1" in
        --output-directory) out="$2"; shift 2 ;;
        --root-directory) root="$2"; shift 2 ;;
        --output-prefix|-p|--extra-arg) shift 2 ;;
        *)
            rel="${1#$root/}"
            mkdir -p "$out/$(dirname "$rel")"
            { cat "$1"; echo "/* rewritten */"; } > "$out/$rel"
            shift
            ;;
    esac
done
"#;

#[cfg(unix)]
pub const FAILING_REWRITER: &str = "#!/bin/sh\necho 'rewriter: unsupported construct' >&2\nexit 3\n";

/// `git` stand-in: logs its arguments; `clone` creates `<dest>/.git`.
#[cfg(unix)]
pub const FAKE_GIT: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/git.log"
if [ "$1" = "clone" ]; then
    mkdir -p "$3/.git"
fi
exit 0
"#;

#[cfg(unix)]
pub fn install_script(env: &TestEnv, relative: &str, content: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = env.primary_path(relative);
    env.write_primary(relative, content);
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
}
