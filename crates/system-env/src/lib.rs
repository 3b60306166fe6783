mod env;
mod error;
mod helpers;
mod pm;
mod pm_vendor;
mod process;
mod system;

pub use env::*;
pub use error::*;
pub use helpers::*;
pub use pm::*;
pub use pm_vendor::*;
pub use process::*;
pub use system::*;
