use crate::pm_vendor::*;
use std::fmt;

/// Node.js package manager that globally installs the CLI package.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodePackageManager {
    Npm,
    Yarn,
}

impl NodePackageManager {
    /// Detect the package manager that triggered the current invocation by
    /// looking for a manager specific marker in the invocation path. Yarn
    /// installs live under a `yarn` tree, everything else is treated as npm.
    pub fn detect_from_invocation(invocation: &str) -> Self {
        let invocation = invocation.to_lowercase();

        if invocation.contains(&yarn().invocation_marker) {
            Self::Yarn
        } else {
            Self::Npm
        }
    }

    /// Return the other supported package manager.
    pub fn alternate(&self) -> Self {
        match self {
            Self::Npm => Self::Yarn,
            Self::Yarn => Self::Npm,
        }
    }

    /// Return every supported package manager.
    pub fn all() -> [Self; 2] {
        [Self::Npm, Self::Yarn]
    }

    /// Return vendor configuration for the current package manager.
    pub fn get_config(&self) -> PackageManagerConfig {
        match self {
            Self::Npm => npm(),
            Self::Yarn => yarn(),
        }
    }

    /// Return the command and arguments that print the global bin directory.
    pub fn get_global_bin_command(&self) -> Vec<String> {
        self.get_config().global_bin_command
    }
}

impl fmt::Display for NodePackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{self:?}").to_lowercase())
    }
}
