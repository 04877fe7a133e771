use assert_cmd::Command;
use assert_cmd::cargo;
use binrelay::platform::TargetKey;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn binrelay() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("binrelay"));
    cmd.env_remove("BINRELAY_PACKAGE_DIR")
        .env_remove("BINRELAY_PACKAGE_NAME")
        .env_remove("BINRELAY_BINARY_NAME")
        .env_remove("CARGO_TARGET_DIR");
    cmd
}

fn shim() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("binrelay-shim"));
    cmd.env_remove("BINRELAY_SHIM_PACKAGE_DIR")
        .env_remove("BINRELAY_SHIM_PACKAGE_NAME")
        .env_remove("BINRELAY_SHIM_BINARY_NAME");
    cmd
}

/// Main package `@acme/tool` at 0.1.0 with all six platform packages.
fn write_package_tree(package_dir: &Path) {
    fs::create_dir_all(package_dir.join("bin")).unwrap();
    fs::write(
        package_dir.join("package.json"),
        r#"{
  "name": "@acme/tool",
  "version": "0.1.0",
  "bin": {
    "tool": "bin/tool"
  },
  "license": "MIT"
}
"#,
    )
    .unwrap();
    fs::write(package_dir.join("README.md"), "# tool\n").unwrap();
    fs::write(package_dir.join("bin/tool"), "launcher").unwrap();

    for key in TargetKey::ALL {
        let dir = package_dir.join("platform-packages").join(key.slug());
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("package.json"),
            format!(
                "{{\n  \"name\": \"@acme/tool-{}\",\n  \"version\": \"0.1.0\",\n  \"license\": \"MIT\"\n}}\n",
                key.slug()
            ),
        )
        .unwrap();
        fs::write(dir.join("README.md"), "# platform\n").unwrap();
    }
}

#[test]
fn test_sync_version_then_validate() {
    let dir = tempdir().unwrap();
    let package_dir = dir.path().join("npm");
    write_package_tree(&package_dir);

    binrelay()
        .args(["sync-version", "1.2.3", "--package-dir"])
        .arg(&package_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("updated @acme/tool 0.1.0 -> 1.2.3"))
        .stdout(predicate::str::contains("7 of 7 manifests updated"));

    let main = fs::read_to_string(package_dir.join("package.json")).unwrap();
    assert!(main.contains("\"@acme/tool-darwin-arm64\": \"1.2.3\""));

    binrelay()
        .args(["validate", "--package-dir"])
        .arg(&package_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 error(s), 6 warning(s)"));
}

#[test]
fn test_sync_version_rejects_leading_v() {
    let dir = tempdir().unwrap();
    write_package_tree(dir.path());
    let before = fs::read_to_string(dir.path().join("package.json")).unwrap();

    binrelay()
        .args(["sync-version", "v1.2.3"])
        .env("BINRELAY_PACKAGE_DIR", dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("use 1.2.3, not v1.2.3"));

    assert_eq!(fs::read_to_string(dir.path().join("package.json")).unwrap(), before);
}

#[test]
fn test_validate_reports_empty_binary() {
    let dir = tempdir().unwrap();
    write_package_tree(dir.path());
    let bin_dir = dir.path().join("platform-packages/linux-x64/bin");
    fs::create_dir_all(&bin_dir).unwrap();
    fs::write(bin_dir.join("tool"), "").unwrap();

    binrelay()
        .args(["validate", "--package-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("@acme/tool-linux-x64: Binary is empty"))
        .stdout(predicate::str::contains("Not listed in optionalDependencies"))
        .stderr(predicate::str::contains("Validation failed with 1 error(s)"));
}

#[test]
fn test_validate_reports_version_drift() {
    let dir = tempdir().unwrap();
    write_package_tree(dir.path());

    binrelay()
        .args(["sync-version", "1.2.3", "--package-dir"])
        .arg(dir.path())
        .assert()
        .success();

    // An interrupted sync leaves one platform behind
    fs::write(
        dir.path().join("platform-packages/darwin-x64/package.json"),
        "{\n  \"name\": \"@acme/tool-darwin-x64\",\n  \"version\": \"1.2.2\",\n  \"license\": \"MIT\"\n}\n",
    )
    .unwrap();

    binrelay()
        .args(["validate", "--package-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "@acme/tool-darwin-x64: Version 1.2.2 differs from main package version 1.2.3",
        ))
        .stderr(predicate::str::contains("Validation failed with 1 error(s)"));
}

#[test]
fn test_prepare_copies_release_binaries() {
    let dir = tempdir().unwrap();
    let package_dir = dir.path().join("npm");
    let target_dir = dir.path().join("target");
    write_package_tree(&package_dir);

    let release = target_dir.join("x86_64-pc-windows-msvc/release");
    fs::create_dir_all(&release).unwrap();
    fs::write(release.join("tool.exe"), "MZ").unwrap();

    binrelay()
        .arg("prepare")
        .arg("--package-dir")
        .arg(&package_dir)
        .arg("--target-dir")
        .arg(&target_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("prepared win32-x64"))
        .stdout(predicate::str::contains("1 prepared, 5 skipped"));

    let copied = package_dir.join("platform-packages/win32-x64/bin/tool.exe");
    assert_eq!(fs::read_to_string(copied).unwrap(), "MZ");
}

#[test]
fn test_check_install_never_fails() {
    let dir = tempdir().unwrap();

    binrelay()
        .args(["check-install", "--package-dir"])
        .arg(dir.path().join("missing"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning"));
}

#[test]
fn test_shim_reports_missing_platform_package() {
    let Ok(key) = TargetKey::from_host(std::env::consts::OS, std::env::consts::ARCH) else {
        return;
    };
    let dir = tempdir().unwrap();
    let package_dir = dir.path().join("node_modules/@acme/tool");
    write_package_tree(&package_dir);

    shim()
        .arg("--help")
        .env("BINRELAY_SHIM_PACKAGE_DIR", &package_dir)
        .env("BINRELAY_SHIM_BINARY_NAME", "tool")
        // Release settings must not redirect the launcher
        .env("BINRELAY_PACKAGE_DIR", "package/npm")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error: Binary not found"))
        .stderr(predicate::str::contains(format!(
            "npm install @acme/tool-{}",
            key.slug()
        )));
}

#[cfg(unix)]
#[test]
fn test_shim_forwards_arguments_and_exit_code() {
    use std::os::unix::fs::PermissionsExt;

    let Ok(key) = TargetKey::from_host(std::env::consts::OS, std::env::consts::ARCH) else {
        return;
    };
    let dir = tempdir().unwrap();
    let modules = dir.path().join("node_modules");
    let package_dir = modules.join("@acme/tool");
    write_package_tree(&package_dir);

    // Registry layout: the platform package is a sibling of the main package
    let bin_dir = modules.join(format!("@acme/tool-{}", key.slug())).join("bin");
    fs::create_dir_all(&bin_dir).unwrap();
    let binary = bin_dir.join("tool");
    fs::write(&binary, "#!/bin/sh\necho \"args: $*\"\nexit 3\n").unwrap();
    fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();

    shim()
        .args(["--flag", "value with spaces"])
        .env("BINRELAY_SHIM_PACKAGE_DIR", &package_dir)
        .env("BINRELAY_SHIM_BINARY_NAME", "tool")
        // Release settings must not redirect the launcher
        .env("BINRELAY_PACKAGE_DIR", "package/npm")
        .assert()
        .code(3)
        .stdout("args: --flag value with spaces\n");

    binrelay()
        .args(["locate", "--package-dir"])
        .arg(&package_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(binary.to_string_lossy().as_ref()));
}
