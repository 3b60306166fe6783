mod get_tag;
mod install;
mod uninstall;
mod update_version;

pub use get_tag::*;
pub use install::*;
pub use uninstall::*;
pub use update_version::*;
