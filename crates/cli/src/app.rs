use crate::commands::InstallArgs;
use clap::builder::styling::{Color, Style, Styles};
use clap::{Parser, Subcommand, ValueEnum};
use starbase_styles::color::Color as ColorType;

/// Verbosity of the installer's own output. Package managers capture
/// stderr from lifecycle scripts, so anything above `info` is opt-in.
#[derive(ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogLevel {
    Off,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

fn create_styles() -> Styles {
    let color = |ty: ColorType| Style::new().fg_color(Some(Color::from(ty as u8)));

    Styles::default()
        .error(color(ColorType::Red))
        .header(Style::new().bold())
        .literal(color(ColorType::Teal))
        .placeholder(color(ColorType::GrayLight))
        .usage(color(ColorType::Teal).bold())
}

#[derive(Clone, Debug, Parser)]
#[command(
    name = "devspace-installer",
    version,
    about,
    long_about = None,
    disable_help_subcommand = true,
    next_line_help = false,
    styles = create_styles()
)]
pub struct App {
    #[arg(
        value_enum,
        long,
        global = true,
        env = "DEVSPACE_INSTALLER_LOG",
        help = "Lowest log level to output"
    )]
    pub log: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(name = "noop", about = "Do nothing and exit successfully.")]
    Noop,

    #[command(
        name = "update-version",
        about = "Record the latest devspace release in the package metadata.",
        long_about = "Resolve the latest devspace release, including pre-releases, and write it to the version field of package.json."
    )]
    UpdateVersion,

    #[command(
        name = "get-tag",
        about = "Print the release channel of the packaged version.",
        long_about = "Print the npm dist-tag for the version in package.json, for example beta for 1.2.3-beta.4, or latest for a stable version."
    )]
    GetTag,

    #[command(
        name = "install",
        about = "Download and install the devspace binary.",
        long_about = "Download the devspace release for this platform and install it into the global bin directory of npm or yarn."
    )]
    Install(InstallArgs),

    #[command(
        name = "uninstall",
        about = "Remove the devspace binary.",
        long_about = "Remove the devspace binary and the scripts linked next to it, and offer to remove the ~/.devspace configuration."
    )]
    Uninstall,

    #[command(
        name = "finish-install",
        about = "Download and install the devspace binary from a package lifecycle script.",
        long_about = "Same as install, but without progress output, for use in npm postinstall scripts."
    )]
    FinishInstall(InstallArgs),
}
