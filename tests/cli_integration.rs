//! CLI integration tests for chainfind.
//!
//! Discovery tests run with `--isolated` so only fixture directories are
//! scanned, never the host's PATH.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the chainfind binary command.
fn chainfind() -> Command {
    Command::cargo_bin("chainfind").unwrap()
}

fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// chainfind triplet
// ============================================================================

#[test]
fn test_triplet_json() {
    let output = chainfind()
        .args(["triplet", "x86_64-linux-gnu", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["arch"], "x64");
    assert_eq!(json["os"], "linux");
    assert_eq!(json["abi"], "elf");
    assert_eq!(json["libc"], "glibc");
    assert_eq!(json["original"], "x86_64-linux-gnu");
    assert_eq!(json["vendors"], serde_json::json!(["gnu"]));
}

#[test]
fn test_triplet_summary() {
    chainfind()
        .args(["triplet", "aarch64-linux-gnu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- arch: arm64"))
        .stdout(predicate::str::contains("- libc: glibc"));
}

#[test]
fn test_triplet_warns_about_unknown_os() {
    chainfind()
        .args(["triplet", "x86_64-unknown-foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown operating system"));
}

#[test]
fn test_triplet_rejects_empty_input() {
    chainfind()
        .args(["triplet", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty target string"));
}

// ============================================================================
// chainfind discover
// ============================================================================

#[test]
fn test_discover_isolated_empty_json() {
    let tmp = temp_dir();

    chainfind()
        .args(["discover", "-f", "json", "--isolated", "--path"])
        .arg(tmp.path())
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_discover_isolated_empty_summary() {
    let tmp = temp_dir();

    chainfind()
        .args(["discover", "--isolated", "--path"])
        .arg(tmp.path())
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no compilers found"));

    chainfind()
        .args(["discover", "-i", "--isolated", "--path"])
        .arg(tmp.path())
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no installations found"));
}

#[test]
fn test_discover_gcc_json_is_valid() {
    let tmp = temp_dir();

    let output = chainfind()
        .args(["discover", "-t", "gcc", "-f", "json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for chain in json.as_array().unwrap() {
        assert_eq!(chain["compiler"], "gcc");
    }
}

#[test]
fn test_discover_rejects_unknown_type() {
    chainfind()
        .args(["discover", "-t", "tcc"])
        .assert()
        .failure();
}

#[test]
fn test_discover_isolated_requires_path() {
    chainfind()
        .args(["discover", "--isolated"])
        .assert()
        .failure();
}

#[cfg(unix)]
mod fake_compilers {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    const FAKE_GCC: &str = r#"#!/bin/sh
case "$*" in
"-dM -E -")
  printf '#define __GNUC__ 13\n#define __GNUC_MINOR__ 2\n#define __GNUC_PATCHLEVEL__ 0\n'
  ;;
"-v")
  cat >&2 <<'EOF'
Using built-in specs.
Target: x86_64-linux-gnu
Configured with: ../src/configure --enable-languages=c,c++
Thread model: posix
gcc version 13.2.0 (GCC)
EOF
  ;;
*)
  exit 1
  ;;
esac
"#;

    fn script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn fixture() -> TempDir {
        let tmp = temp_dir();
        script(tmp.path(), "gcc-13", FAKE_GCC);
        script(tmp.path(), "g++-13", FAKE_GCC);
        tmp
    }

    #[test]
    fn test_discover_fake_gcc() {
        let tmp = fixture();

        let output = chainfind()
            .args(["discover", "-t", "gcc", "-f", "json", "--isolated", "--path"])
            .arg(tmp.path())
            .current_dir(tmp.path())
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let chains = json.as_array().unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0]["compiler"], "gcc");
        assert_eq!(chains[0]["version"], "13.2.0");
        assert_eq!(chains[0]["target"]["arch"], "x64");
        assert!(chains[0]["tools"]["c++"]
            .as_str()
            .unwrap()
            .ends_with("/g++-13"));
    }

    #[test]
    fn test_discover_isolated_keeps_tools_in_search_dirs() {
        let tmp = fixture();
        script(tmp.path(), "ar", "#!/bin/sh\n");

        let output = chainfind()
            .args(["discover", "-t", "gcc", "-f", "json", "--isolated", "--path"])
            .arg(tmp.path())
            .current_dir(tmp.path())
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let tools = json[0]["tools"].as_object().unwrap();
        let root = tmp.path().to_str().unwrap();
        for (tool, path) in tools {
            let path = path.as_str().unwrap();
            assert!(path.starts_with(root), "{} found outside {}: {}", tool, root, path);
        }
        assert!(tools["ar"].as_str().unwrap().ends_with("/ar"));
    }

    #[test]
    fn test_discover_best_for_target() {
        let tmp = fixture();

        chainfind()
            .args(["discover", "--best", "--target", "x86_64-pc-linux-gnu", "--isolated", "--path"])
            .arg(tmp.path())
            .current_dir(tmp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("gcc 13.2.0 targeting 'x86_64-linux-gnu'"));

        chainfind()
            .args(["discover", "--best", "--target", "aarch64-linux-gnu", "--isolated", "--path"])
            .arg(tmp.path())
            .current_dir(tmp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("no compilers found"));
    }

    #[test]
    fn test_env_from_cc() {
        let tmp = fixture();

        chainfind()
            .args(["env", "--config", "release"])
            .env("CC", tmp.path().join("gcc-13"))
            .env_remove("CXX")
            .current_dir(tmp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("compiler: gcc 13.2.0"))
            .stdout(predicate::str::contains("- release flags: -DNDEBUG -O3"));
    }
}

// ============================================================================
// chainfind env
// ============================================================================

#[test]
fn test_env_without_compiler_vars() {
    chainfind()
        .arg("env")
        .env_remove("CC")
        .env_remove("CXX")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing CC/CXX"));
}

#[test]
fn test_env_with_invalid_path() {
    chainfind()
        .arg("env")
        .env("CC", "/nonexistent/bin/gcc")
        .env_remove("CXX")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid CC path"));
}

// ============================================================================
// chainfind completions
// ============================================================================

#[test]
fn test_completions_bash() {
    chainfind()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chainfind"));
}

#[test]
fn test_completions_to_file() {
    let tmp = temp_dir();
    let script = tmp.path().join("chainfind.zsh");

    chainfind()
        .args(["completions", "zsh", "-o"])
        .arg(&script)
        .assert()
        .success()
        .stdout("");

    let text = std::fs::read_to_string(&script).unwrap();
    assert!(text.contains("#compdef chainfind"));
    assert!(text.contains("discover"));
}
