use crate::error::Error;
use std::env::consts;
use std::fmt;

/// Architecture of the system environment, limited to the architectures
/// that release artifacts are published for.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SystemArch {
    X86,
    Amd64,
    Arm,
}

impl SystemArch {
    /// Map a [`std::env::consts::ARCH`] compatible string.
    pub fn from_rust_arch(arch: &str) -> Result<SystemArch, Error> {
        match arch {
            "x86" => Ok(Self::X86),
            "x86_64" => Ok(Self::Amd64),
            "arm" => Ok(Self::Arm),
            other => Err(Error::UnsupportedArch(other.to_owned())),
        }
    }

    /// Return the token used when naming release artifacts.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::X86 => "386",
            Self::Amd64 => "amd64",
            Self::Arm => "arm",
        }
    }
}

impl fmt::Display for SystemArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

/// Operating system of the current environment.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SystemOS {
    Darwin,
    FreeBSD,
    Linux,
    Windows,
}

impl SystemOS {
    /// Return an instance derived from [`std::env::consts::OS`].
    pub fn from_env() -> Result<SystemOS, Error> {
        Self::from_rust_os(consts::OS)
    }

    /// Map a [`std::env::consts::OS`] compatible string.
    pub fn from_rust_os(os: &str) -> Result<SystemOS, Error> {
        match os {
            "macos" => Ok(Self::Darwin),
            "freebsd" => Ok(Self::FreeBSD),
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            other => Err(Error::UnsupportedOS(other.to_owned())),
        }
    }

    /// Return the token used when naming release artifacts.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::FreeBSD => "freebsd",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// Return the provided name as a system formatted file name for executables.
    /// On Windows this will append an ".exe" extension. On Unix, no extension.
    pub fn get_exe_name(&self, name: impl AsRef<str>) -> String {
        self.get_file_name(name, "exe")
    }

    /// Return the provided file name formatted with the extension (without dot)
    /// when on Windows. On Unix, returns the name as-is.
    pub fn get_file_name(&self, name: impl AsRef<str>, windows_ext: impl AsRef<str>) -> String {
        let name = name.as_ref();
        let ext = windows_ext.as_ref();

        if self.is_windows() && !name.ends_with(ext) {
            format!("{name}.{ext}")
        } else {
            name.to_owned()
        }
    }

    /// Return the separator used between entries of the `PATH` variable.
    pub fn path_list_separator(&self) -> char {
        if self.is_windows() {
            ';'
        } else {
            ':'
        }
    }

    /// Return true if Windows.
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl fmt::Display for SystemOS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}
