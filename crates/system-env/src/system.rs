use crate::env::*;
use crate::error::Error;
use std::env::consts;
use std::fmt;
use tracing::trace;

/// The operating system and architecture pair that a release artifact
/// is selected for. Derived once per run and never mutated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PlatformTarget {
    /// Platform architecture.
    pub arch: SystemArch,

    /// Operating system.
    pub os: SystemOS,
}

impl PlatformTarget {
    /// Detect the platform of the running process.
    pub fn detect() -> Result<Self, Error> {
        Self::from_host(consts::OS, consts::ARCH)
    }

    /// Map host identifiers (as reported by [`std::env::consts`]) to a target.
    /// Fails if either identifier has no mapping.
    pub fn from_host(os: &str, arch: &str) -> Result<Self, Error> {
        let target = PlatformTarget {
            os: SystemOS::from_rust_os(os)?,
            arch: SystemArch::from_rust_arch(arch)?,
        };

        trace!(os, arch, target = %target, "Resolved platform target");

        Ok(target)
    }

    pub fn new(os: SystemOS, arch: SystemArch) -> Self {
        PlatformTarget { arch, os }
    }

    /// Return the `<platform>-<arch>` segment used in artifact file names.
    pub fn artifact_suffix(&self) -> String {
        format!("{}-{}", self.os.as_token(), self.arch.as_token())
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact_suffix())
    }
}
