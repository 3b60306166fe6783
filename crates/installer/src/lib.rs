mod config;
mod context;
mod download;
mod error;
mod install;
mod target;
mod uninstall;
#[cfg(unix)]
mod unix;
mod version;
#[cfg(windows)]
mod windows;

pub use config::*;
pub use context::*;
pub use download::*;
pub use error::InstallerError;
pub use install::*;
pub use target::*;
pub use uninstall::*;
#[cfg(unix)]
pub use unix::*;
pub use version::*;
#[cfg(windows)]
pub use windows::*;
