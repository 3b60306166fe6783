use async_trait::async_trait;
use devspace_installer::*;
use starbase_sandbox::{create_empty_sandbox, Sandbox};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use system_env::{PlatformTarget, SystemArch, SystemOS};

const ARTIFACT_PATH: &str = "/covexo/devspace/releases/download/v4.2.0/devspace-linux-amd64";

struct StaticFeed {
    stable: &'static str,
    prerelease: &'static str,
    calls: AtomicUsize,
}

impl StaticFeed {
    fn new(stable: &'static str, prerelease: &'static str) -> Self {
        Self {
            stable,
            prerelease,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseFeed for StaticFeed {
    async fn fetch_latest_version(
        &self,
        include_prerelease: bool,
    ) -> Result<ReleaseVersion, InstallerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        ReleaseVersion::parse(if include_prerelease {
            self.prerelease
        } else {
            self.stable
        })
    }
}

fn create_config(sandbox: &Sandbox, host: String) -> InstallerConfig {
    let mut config = InstallerConfig::from_home(sandbox.path().join("home"));
    config.release_host = host;
    config.fallback_bin_dir = sandbox.path().join("fallback");
    config
}

fn create_target(sandbox: &Sandbox) -> InstallTarget {
    let dir = sandbox.path().join("bin");

    fs::create_dir_all(&dir).unwrap();

    InstallTarget::new(dir, "devspace", SystemOS::Linux)
}

fn linux_amd64() -> PlatformTarget {
    PlatformTarget::new(SystemOS::Linux, SystemArch::Amd64)
}

mod install {
    use super::*;

    #[tokio::test]
    async fn installs_explicit_version() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", ARTIFACT_PATH)
            .with_status(200)
            .with_body("devspace 4.2.0")
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("9.9.9", "9.9.9");
        let client = create_http_client(&config).unwrap();
        let mut installer = Installer::new(&config, client, &feed);

        let outcome = installer
            .install(
                &linux_amd64(),
                &target,
                Some(ReleaseVersion::parse("4.2.0").unwrap()),
            )
            .await
            .unwrap();

        mock.assert_async().await;

        assert_eq!(installer.phase, InstallPhase::Installed);
        assert_eq!(outcome.version.as_str(), "4.2.0");
        assert_eq!(outcome.session.http_status, 200);
        assert_eq!(outcome.session.bytes_written, 14);
        assert!(outcome.fresh);
        assert_eq!(feed.calls(), 0);

        assert_eq!(
            fs::read_to_string(&target.final_path).unwrap(),
            "devspace 4.2.0"
        );
        assert!(!target.temp_path.exists());
        assert!(!target.legacy_path.exists());
    }

    #[tokio::test]
    async fn resolves_latest_stable_when_no_version() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", ARTIFACT_PATH)
            .with_status(200)
            .with_body("latest")
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("4.2.0", "5.0.0-beta.1");
        let client = create_http_client(&config).unwrap();
        let mut installer = Installer::new(&config, client, &feed);

        let outcome = installer
            .install(&linux_amd64(), &target, None)
            .await
            .unwrap();

        mock.assert_async().await;

        assert_eq!(outcome.version.as_str(), "4.2.0");
        assert_eq!(feed.calls(), 1);
    }

    #[tokio::test]
    async fn falls_back_to_latest_once_when_missing() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let missing = server
            .mock("GET", "/covexo/devspace/releases/download/v1.0.0/devspace-linux-amd64")
            .with_status(404)
            .create_async()
            .await;
        let found = server
            .mock(
                "GET",
                "/covexo/devspace/releases/download/v5.0.0-beta.1/devspace-linux-amd64",
            )
            .with_status(200)
            .with_body("beta")
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("4.2.0", "5.0.0-beta.1");
        let client = create_http_client(&config).unwrap();
        let mut installer = Installer::new(&config, client, &feed);

        let outcome = installer
            .install(
                &linux_amd64(),
                &target,
                Some(ReleaseVersion::parse("1.0.0").unwrap()),
            )
            .await
            .unwrap();

        missing.assert_async().await;
        found.assert_async().await;

        assert_eq!(outcome.version.as_str(), "5.0.0-beta.1");
        assert_eq!(feed.calls(), 1);
        assert_eq!(fs::read_to_string(&target.final_path).unwrap(), "beta");
    }

    #[tokio::test]
    async fn fails_on_second_missing_artifact() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", ARTIFACT_PATH)
            .with_status(404)
            .expect(2)
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("4.2.0", "4.2.0");
        let client = create_http_client(&config).unwrap();
        let mut installer = Installer::new(&config, client, &feed);

        let error = installer
            .install(
                &linux_amd64(),
                &target,
                Some(ReleaseVersion::parse("4.2.0").unwrap()),
            )
            .await
            .unwrap_err();

        mock.assert_async().await;

        assert!(error.to_string().contains("is not available"));
        assert_eq!(installer.phase, InstallPhase::Failed);
        assert_eq!(feed.calls(), 1);
        assert!(!target.final_path.exists());
        assert!(!target.temp_path.exists());
    }

    #[tokio::test]
    async fn fails_on_server_error_without_retrying() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", ARTIFACT_PATH)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("4.2.0", "4.2.0");
        let client = create_http_client(&config).unwrap();
        let mut installer = Installer::new(&config, client, &feed);

        let result = installer
            .install(
                &linux_amd64(),
                &target,
                Some(ReleaseVersion::parse("4.2.0").unwrap()),
            )
            .await;

        mock.assert_async().await;

        assert!(result.is_err());
        assert_eq!(feed.calls(), 0);
    }

    #[tokio::test]
    async fn replaces_existing_binary_and_stale_artifacts() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", ARTIFACT_PATH)
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);

        fs::write(&target.final_path, "old").unwrap();
        fs::write(&target.temp_path, "partial").unwrap();
        fs::write(&target.legacy_path, "older").unwrap();

        let feed = StaticFeed::new("4.2.0", "4.2.0");
        let client = create_http_client(&config).unwrap();
        let mut installer = Installer::new(&config, client, &feed);

        let outcome = installer
            .install(
                &linux_amd64(),
                &target,
                Some(ReleaseVersion::parse("4.2.0").unwrap()),
            )
            .await
            .unwrap();

        assert!(!outcome.fresh);
        assert_eq!(fs::read_to_string(&target.final_path).unwrap(), "new");
        assert!(!target.temp_path.exists());
        assert!(!target.legacy_path.exists());
    }

    #[tokio::test]
    async fn repeated_installs_are_idempotent() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", ARTIFACT_PATH)
            .with_status(200)
            .with_body("same")
            .expect(2)
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("4.2.0", "4.2.0");
        let client = create_http_client(&config).unwrap();

        for _ in 0..2 {
            let mut installer = Installer::new(&config, client.clone(), &feed);

            installer
                .install(
                    &linux_amd64(),
                    &target,
                    Some(ReleaseVersion::parse("4.2.0").unwrap()),
                )
                .await
                .unwrap();
        }

        assert_eq!(fs::read_to_string(&target.final_path).unwrap(), "same");
        assert_eq!(fs::read_dir(&target.directory).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn reports_progress_per_chunk() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", ARTIFACT_PATH)
            .with_status(200)
            .with_body("0123456789")
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("4.2.0", "4.2.0");
        let client = create_http_client(&config).unwrap();
        let written = Arc::new(AtomicUsize::new(0));
        let written_clone = Arc::clone(&written);

        let mut installer = Installer::new(&config, client, &feed).on_chunk(move |current, _| {
            written_clone.store(current as usize, Ordering::SeqCst);
        });

        installer
            .install(
                &linux_amd64(),
                &target,
                Some(ReleaseVersion::parse("4.2.0").unwrap()),
            )
            .await
            .unwrap();

        assert_eq!(written.load(Ordering::SeqCst), 10);
    }
}

mod install_for_host {
    use super::*;

    #[tokio::test]
    async fn fails_before_any_network_activity() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("4.2.0", "4.2.0");
        let client = create_http_client(&config).unwrap();

        for (os, arch) in [("linux", "mips"), ("solaris", "x86_64")] {
            let mut installer = Installer::new(&config, client.clone(), &feed);

            let error = installer
                .install_for_host(os, arch, &target, None)
                .await
                .unwrap_err();

            assert!(error.to_string().contains("on this platform"));
            assert_eq!(installer.phase, InstallPhase::Failed);
        }

        mock.assert_async().await;

        assert_eq!(feed.calls(), 0);
        assert!(!target.final_path.exists());
    }

    #[tokio::test]
    async fn maps_host_identifiers_to_artifact() {
        let sandbox = create_empty_sandbox();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/covexo/devspace/releases/download/v4.2.0/devspace-darwin-amd64",
            )
            .with_status(200)
            .with_body("mac")
            .create_async()
            .await;

        let config = create_config(&sandbox, server.url());
        let target = create_target(&sandbox);
        let feed = StaticFeed::new("4.2.0", "4.2.0");
        let client = create_http_client(&config).unwrap();
        let mut installer = Installer::new(&config, client, &feed);

        installer
            .install_for_host("macos", "x86_64", &target, None)
            .await
            .unwrap();

        mock.assert_async().await;
    }
}

mod replace {
    use super::*;

    #[test]
    fn fails_without_downloaded_file() {
        let sandbox = create_empty_sandbox();
        let target = create_target(&sandbox);

        fs::write(&target.final_path, "old").unwrap();

        let result = replace_binary(&target.temp_path, &target.final_path, &target.legacy_path);

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&target.final_path).unwrap(), "old");
    }

    #[cfg(unix)]
    #[test]
    fn keeps_previous_contents_when_rename_fails() {
        use miette::Diagnostic;

        let sandbox = create_empty_sandbox();
        let target = create_target(&sandbox);
        let previous = target.final_path.join("previous");

        // A non-empty directory cannot be replaced by a file
        fs::create_dir_all(&target.final_path).unwrap();
        fs::write(&previous, "old").unwrap();
        fs::write(&target.temp_path, "new").unwrap();

        let error = replace_binary(&target.temp_path, &target.final_path, &target.legacy_path)
            .unwrap_err();

        assert!(matches!(error, InstallerError::ReplaceFailed { .. }));
        assert!(error
            .help()
            .unwrap()
            .to_string()
            .contains("--unsafe-perm"));
        assert_eq!(fs::read_to_string(&previous).unwrap(), "old");
        assert_eq!(fs::read_to_string(&target.temp_path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn marks_binary_executable() {
        use std::os::unix::fs::PermissionsExt;

        let sandbox = create_empty_sandbox();
        let target = create_target(&sandbox);

        fs::write(&target.temp_path, "new").unwrap();

        replace_binary(&target.temp_path, &target.final_path, &target.legacy_path).unwrap();

        let mode = fs::metadata(&target.final_path).unwrap().permissions().mode();

        assert_eq!(mode & 0o777, 0o755);
        assert!(!target.temp_path.exists());
    }
}

mod companions {
    use super::*;

    #[test]
    fn none_outside_windows() {
        let target = InstallTarget::new("/usr/local/bin", "devspace", SystemOS::Linux);

        assert!(target
            .companion_paths("devspace", SystemOS::Linux, true)
            .is_empty());
    }

    #[test]
    fn skips_cmd_script_on_fresh_install() {
        let target = InstallTarget::new("C:/npm", "devspace", SystemOS::Windows);

        let dir = PathBuf::from("C:/npm");

        assert_eq!(target.final_path, dir.join("devspace.exe"));
        assert_eq!(
            target.companion_paths("devspace", SystemOS::Windows, false),
            vec![dir.join("devspace"), dir.join("devspace.ps1")]
        );
        assert_eq!(
            target
                .companion_paths("devspace", SystemOS::Windows, true)
                .len(),
            3
        );
    }

    #[test]
    fn names_temp_and_legacy_paths() {
        let target = InstallTarget::new("/opt/bin", "devspace", SystemOS::Linux);

        let dir = PathBuf::from("/opt/bin");

        assert_eq!(target.temp_path, dir.join("devspace.dl"));
        assert_eq!(target.legacy_path, dir.join(".devspace.old"));
    }
}
