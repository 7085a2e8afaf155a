//! CLI argument definitions for `nbctl`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line interface for the NetBeans installation manager.
#[derive(Parser, Debug)]
#[command(
    name = "nbctl",
    version,
    about = "Locate, inspect and drive NetBeans IDE installations",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// Operation to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Options selecting the tree an installation is searched in.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RootArgs {
    /// Directory to search instead of the configured search root.
    #[arg(long, value_name = "DIR")]
    pub(crate) root: Option<PathBuf>,
}

/// Structured subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Lists the versions published in the release catalog.
    Versions {
        /// Catalog URL to list instead of the configured one.
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// Prints the highest published version.
    Latest {
        /// Catalog URL to list instead of the configured one.
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// Prints the root of the installation of a version.
    Locate {
        /// Version to look for, in its published form (for example `12.6`).
        version: String,
        #[command(flatten)]
        root: RootArgs,
    },
    /// Reports the state of one plugin.
    Plugin {
        /// Module code name.
        name: String,
        /// Version of the installation to query.
        version: String,
        #[command(flatten)]
        root: RootArgs,
    },
    /// Lists every module of an installation with its state.
    Plugins {
        /// Version of the installation to query.
        version: String,
        #[command(flatten)]
        root: RootArgs,
    },
    /// Runs the launcher of an installation and exits with its code.
    Run {
        /// Version of the installation to run.
        version: String,
        #[command(flatten)]
        root: RootArgs,
        /// Do not pass the headless JVM property.
        #[arg(long)]
        no_headless: bool,
        /// Return immediately instead of waiting for the launcher.
        #[arg(long)]
        no_wait: bool,
        /// Arguments passed to the launcher, after `--`.
        #[arg(last = true, value_name = "ARG")]
        args: Vec<String>,
    },
    /// Terminates the running processes of an installation.
    Stop {
        /// Version of the installation to stop.
        version: String,
        #[command(flatten)]
        root: RootArgs,
    },
    /// Prints the download URL of an installer.
    InstallerUrl {
        /// Version to download.
        version: String,
        /// Feature bundle such as `php` or `cpp`; all features when omitted.
        #[arg(long, value_name = "BUNDLE")]
        features: Option<String>,
    },
    /// Downloads an installer and prints its path.
    Download {
        /// Version to download.
        version: String,
        /// Feature bundle such as `php` or `cpp`; all features when omitted.
        #[arg(long, value_name = "BUNDLE")]
        features: Option<String>,
        /// Destination directory; the system temporary directory by default.
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
    },
    /// Reports whether this host can run the manager.
    Check,
}

impl CliCommand {
    /// Whether the command inspects or drives a local installation.
    pub(crate) const fn touches_installation(&self) -> bool {
        matches!(
            self,
            Self::Locate { .. }
                | Self::Plugin { .. }
                | Self::Plugins { .. }
                | Self::Run { .. }
                | Self::Stop { .. }
        )
    }
}
