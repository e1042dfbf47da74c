//! CLI integration tests for libsmith.
//!
//! Most tests put small shell scripts standing in for the compiler and
//! archiver on an isolated `PATH`, so they run the same on every host. The
//! real-toolchain tests only run when `cc` and `ar` are installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the libsmith binary command, isolated from the user's config.
fn libsmith(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("libsmith").unwrap();
    cmd.current_dir(project)
        .env("HOME", project)
        .env_remove("AR")
        .env_remove("RUST_LOG");
    cmd
}

/// Create a project with the given source files.
fn project(files: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for f in files {
        let path = tmp.path().join(f);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "int answer(void) { return 42; }\n").unwrap();
    }
    tmp
}

/// Install an executable shell script named `name` into `<root>/bin`.
#[cfg(unix)]
fn fake_tool(root: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = root.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let path = bin.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    bin
}

fn has_real_toolchain() -> bool {
    cfg!(unix) && which::which("cc").is_ok() && which::which("ar").is_ok()
}

// ============================================================================
// argument handling
// ============================================================================

#[test]
fn test_help_lists_options() {
    let tmp = TempDir::new().unwrap();

    libsmith(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--type"))
        .stdout(predicate::str::contains("--sources"));
}

#[test]
fn test_output_is_required() {
    let tmp = TempDir::new().unwrap();

    libsmith(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_files_and_sources_conflict() {
    let tmp = TempDir::new().unwrap();

    libsmith(tmp.path())
        .args(["--files", "a.c", "--sources", "src", "--output", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_type_rejected() {
    let tmp = TempDir::new().unwrap();

    libsmith(tmp.path())
        .args(["--output", "x", "--type", "dynamic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dynamic"));
}

// ============================================================================
// discovery and detection failures
// ============================================================================

#[test]
fn test_no_sources_found() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("src")).unwrap();
    fs::write(tmp.path().join("src/README.md"), "docs").unwrap();

    libsmith(tmp.path())
        .args(["--output", "mylib"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: no source files found"));

    assert!(!tmp.path().join("build").exists());
}

#[cfg(unix)]
#[test]
fn test_no_toolchain_found() {
    let tmp = project(&["src/a.c"]);
    let empty_bin = tmp.path().join("empty-bin");
    fs::create_dir_all(&empty_bin).unwrap();

    libsmith(tmp.path())
        .env("PATH", &empty_bin)
        .args(["--output", "mylib"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no suitable C/C++ compiler"));
}

// ============================================================================
// --plan / --print-toolchain
// ============================================================================

#[cfg(unix)]
#[test]
fn test_print_toolchain_with_preferred_compiler() {
    let tmp = project(&["src/a.c"]);
    let bin = fake_tool(tmp.path(), "mycc", "exit 0");

    libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--output", "mylib", "--compiler", "mycc", "--print-toolchain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name:  mycc"))
        .stdout(predicate::str::contains("style: unix"));
}

#[cfg(unix)]
#[test]
fn test_plan_prints_json_and_runs_nothing() {
    let tmp = project(&["src/a.c", "src/b.c"]);
    let bin = fake_tool(tmp.path(), "cc", "touch ran-cc; exit 0");

    let output = libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--output", "mylib", "--type", "static", "--plan"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["pipeline"], "unix-static");
    assert_eq!(plan["steps"].as_array().unwrap().len(), 3);
    assert_eq!(plan["steps"][2]["type"], "archive");
    assert_eq!(plan["artifact"]["path"], "build/libmylib.a");

    assert!(!tmp.path().join("build").exists());
    assert!(!tmp.path().join("ran-cc").exists());
}

#[cfg(unix)]
#[test]
fn test_project_config_supplies_defaults() {
    let tmp = project(&["src/a.c"]);
    let bin = fake_tool(tmp.path(), "cc", "exit 0");
    fs::create_dir_all(tmp.path().join(".libsmith")).unwrap();
    fs::write(
        tmp.path().join(".libsmith/config.toml"),
        "[build]\nkind = \"static\"\nbuild_dir = \"out\"\ninclude = [\"include\"]\n",
    )
    .unwrap();

    let output = libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--output", "mylib", "--plan"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["pipeline"], "unix-static");
    assert_eq!(plan["artifact"]["path"], "out/libmylib.a");
    let args = plan["steps"][0]["command"]["args"].as_array().unwrap();
    assert!(args.iter().any(|a| a == "-Iinclude"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_linux_config_section_adds_libs() {
    let tmp = project(&["src/a.c"]);
    let bin = fake_tool(tmp.path(), "cc", "exit 0");
    fs::create_dir_all(tmp.path().join(".libsmith")).unwrap();
    fs::write(
        tmp.path().join(".libsmith/config.toml"),
        "[build]\nlibs = [\"z\"]\n\n[build.linux]\nlibs = [\"m\"]\n\n[build.macos]\nlibs = [\"objc\"]\n",
    )
    .unwrap();

    let output = libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--output", "mylib", "--plan"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let args = plan["steps"][0]["command"]["args"].as_array().unwrap();
    assert!(args.iter().any(|a| a == "-lz"));
    assert!(args.iter().any(|a| a == "-lm"));
    assert!(!args.iter().any(|a| a == "-lobjc"));
}

#[cfg(unix)]
#[test]
fn test_cflags_do_not_swallow_later_options() {
    let tmp = project(&["src/a.c"]);
    let bin = fake_tool(tmp.path(), "cc", "exit 0");

    let output = libsmith(tmp.path())
        .env("PATH", &bin)
        .args([
            "--type", "static", "--cflags", "-O2", "--cflags", "-Wall", "--fpic", "--output",
            "mylib", "--plan",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let args = plan["steps"][0]["command"]["args"].as_array().unwrap();
    assert!(args.iter().any(|a| a == "-O2"));
    assert!(args.iter().any(|a| a == "-Wall"));
    assert!(args.iter().any(|a| a == "-fPIC"));
    assert!(!args.iter().any(|a| a == "--fpic"));
}

// ============================================================================
// builds with stand-in tools
// ============================================================================

#[cfg(target_os = "linux")]
#[test]
fn test_shared_build_single_compiler_call() {
    let tmp = project(&["src/a.c", "src/b.c"]);
    let bin = fake_tool(tmp.path(), "clang", "echo \"$@\" >> calls.log");

    libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--sources", "src", "--output", "mylib", "--type", "shared"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Built shared library: build/libmylib.so",
        ));

    let log = fs::read_to_string(tmp.path().join("calls.log")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert_eq!(
        log.trim_end(),
        "-shared -o build/libmylib.so src/a.c src/b.c"
    );
}

#[cfg(unix)]
#[test]
fn test_static_build_compiles_then_archives() {
    let tmp = project(&["src/a.c", "src/b.c"]);
    fake_tool(tmp.path(), "gcc", "echo \"gcc $@\" >> calls.log");
    let bin = fake_tool(tmp.path(), "ar", "echo \"ar $@\" >> calls.log");

    libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--output", "mylib", "--type", "static", "--fpic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built static library: build/libmylib.a"));

    let log = fs::read_to_string(tmp.path().join("calls.log")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(
        lines,
        vec![
            "gcc -c -fPIC src/a.c -o build/obj/a.o",
            "gcc -c -fPIC src/b.c -o build/obj/b.o",
            "ar rcs build/libmylib.a build/obj/a.o build/obj/b.o",
        ]
    );
    assert!(tmp.path().join("build/obj").is_dir());
}

#[cfg(unix)]
#[test]
fn test_failing_compile_propagates_exit_code() {
    let tmp = project(&["src/a.c", "src/b.c"]);
    fake_tool(
        tmp.path(),
        "gcc",
        "echo \"gcc $@\" >> calls.log\ncase \"$*\" in *b.c*) echo 'b.c:1: error: boom' >&2; exit 2;; esac",
    );
    let bin = fake_tool(tmp.path(), "ar", "echo \"ar $@\" >> calls.log");

    libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--output", "mylib", "--type", "static"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Build failed."))
        .stderr(predicate::str::contains("b.c:1: error: boom"));

    let log = fs::read_to_string(tmp.path().join("calls.log")).unwrap();
    assert_eq!(log.lines().count(), 2);
    assert!(!log.contains("ar rcs"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_verbose_echoes_commands() {
    let tmp = project(&["src/a.c"]);
    let bin = fake_tool(tmp.path(), "cc", "echo compiler-says-hi");
    let cc = bin.join("cc");

    libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--output", "mylib", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "+ {} -shared -o build/libmylib.so src/a.c",
            cc.display()
        )))
        .stdout(predicate::str::contains("compiler-says-hi"));
}

#[cfg(unix)]
#[test]
fn test_emit_compile_commands() {
    let tmp = project(&["src/a.c", "src/b.cpp"]);
    fake_tool(tmp.path(), "clang", "exit 0");
    let bin = fake_tool(tmp.path(), "clang++", "exit 0");

    libsmith(tmp.path())
        .env("PATH", &bin)
        .args(["--output", "mylib", "--emit-compile-commands"])
        .assert()
        .success();

    let db = fs::read_to_string(tmp.path().join("build/compile_commands.json")).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&db).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["file"], "src/a.c");
    assert_eq!(entries[1]["file"], "src/b.cpp");
    assert_eq!(entries[1]["arguments"][0], bin.join("clang++").display().to_string());
}

// ============================================================================
// real toolchain
// ============================================================================

#[test]
fn test_real_static_build() {
    if !has_real_toolchain() {
        eprintln!("skipping: cc/ar not available");
        return;
    }
    let tmp = project(&["src/answer.c"]);

    libsmith(tmp.path())
        .args(["--output", "answer", "--type", "static", "--compiler", "cc"])
        .assert()
        .success();

    assert!(tmp.path().join("build/libanswer.a").is_file());
    assert!(tmp.path().join("build/obj/answer.o").is_file());
}

#[test]
fn test_real_shared_build() {
    if !has_real_toolchain() {
        eprintln!("skipping: cc/ar not available");
        return;
    }
    let tmp = project(&["src/answer.c"]);
    let name = if cfg!(target_os = "macos") {
        "libanswer.dylib"
    } else {
        "libanswer.so"
    };

    libsmith(tmp.path())
        .args(["--output", "answer", "--compiler", "cc", "--fpic"])
        .assert()
        .success();

    assert!(tmp.path().join("build").join(name).is_file());
}

#[test]
fn test_real_compile_error_reported() {
    if !has_real_toolchain() {
        eprintln!("skipping: cc/ar not available");
        return;
    }
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("src")).unwrap();
    fs::write(tmp.path().join("src/broken.c"), "int broken( {\n").unwrap();

    libsmith(tmp.path())
        .args(["--output", "broken", "--type", "static", "--compiler", "cc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build failed."));

    assert!(!tmp.path().join("build/libbroken.a").exists());
}
