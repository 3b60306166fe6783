#![allow(dead_code)]

use starbase_sandbox::{assert_cmd, Sandbox};
use std::fs;
use std::path::{Path, PathBuf};
use system_env::PlatformTarget;

pub fn create_installer_command<T: AsRef<Path>>(path: T) -> assert_cmd::Command {
    let path = path.as_ref();
    let home_dir = path.join(".home");

    // Folders must exist or tests fail!
    fs::create_dir_all(&home_dir).unwrap();

    let mut cmd = assert_cmd::Command::cargo_bin("devspace-installer").unwrap();
    cmd.current_dir(path);
    cmd.timeout(std::time::Duration::from_secs(60));
    cmd.env_remove("npm_execpath");
    cmd.env_remove("DEVSPACE_INSTALLER_RELEASE_HOST");
    cmd.env_remove("DEVSPACE_INSTALLER_TIMEOUT");
    cmd.env("HOME", &home_dir);
    cmd.env("USERPROFILE", &home_dir);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("DEVSPACE_INSTALLER_LOG", "trace");
    cmd.env("DEVSPACE_INSTALLER_MANIFEST", path.join("package.json"));
    cmd.env("DEVSPACE_INSTALLER_FALLBACK_DIR", path.join(".fallback"));
    // Keeps real package managers out of reach
    cmd.env("PATH", get_prefix_bin_dir(path));
    cmd.env("npm_config_prefix", path.join(".prefix"));
    cmd
}

pub fn create_manifest(sandbox: &Sandbox, version: &str) {
    sandbox.create_file(
        "package.json",
        format!(r#"{{"name": "devspace", "version": "{version}"}}"#),
    );
}

pub fn get_prefix_bin_dir<T: AsRef<Path>>(path: T) -> PathBuf {
    path.as_ref().join(".prefix/bin")
}

/// Artifact for the host platform, or `None` if the host has no release.
pub fn get_artifact_path(version: &str) -> Option<String> {
    let platform = PlatformTarget::detect().ok()?;

    Some(format!(
        "/covexo/devspace/releases/download/v{version}/{}",
        platform
            .os
            .get_exe_name(format!("devspace-{}", platform.artifact_suffix()))
    ))
}
