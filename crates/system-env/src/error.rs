#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Unsupported operating system `{0}`.")]
    UnsupportedOS(String),

    #[error("Unsupported architecture `{0}`.")]
    UnsupportedArch(String),
}
