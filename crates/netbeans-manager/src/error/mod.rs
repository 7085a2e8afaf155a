//! Domain errors raised by manager operations.
//!
//! Every variant carries the key that failed to resolve (version, plugin
//! name, URL, command or path) so the orchestrator can act on it without
//! parsing messages. I/O errors are wrapped in `Arc` to satisfy the
//! `result_large_err` Clippy lint.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::host::HostError;

/// Errors surfaced by the public operations of this crate.
#[derive(Debug, Error)]
pub enum NetBeansError {
    /// No directory under the search root verified as the requested version.
    #[error("no install path found for version {version}")]
    NoInstallationFound {
        /// Version that was searched for.
        version: String,
    },

    /// The installation's module listing did not include the plugin.
    #[error("plugin {plugin} was not found for NetBeans {version}")]
    NoPluginFound {
        /// Plugin name that was looked up.
        plugin: String,
        /// IDE version whose installation was queried.
        version: String,
    },

    /// A version selection was requested over an empty list.
    #[error("cannot pick a version from an empty list")]
    EmptyInput,

    /// A version string is not a dotted sequence of non-negative integers.
    #[error("version '{version}' is not a dotted sequence of non-negative integers")]
    MalformedVersion {
        /// Offending version string.
        version: String,
    },

    /// The remote catalog answered with a non-success status.
    #[error("unable to download NetBeans versions from {url}: status {status}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// The remote catalog could not be reached at all.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// URL that was requested.
        url: String,
        /// Transport failure description.
        message: String,
    },

    /// A host command could not be executed.
    #[error("failed to execute '{command}': {source}")]
    Process {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A local file could not be written or read.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The host lacks something the manager needs.
    #[error("NetBeans management is unavailable: {reason}")]
    Unsupported {
        /// Human-readable description of the missing capability.
        reason: String,
    },
}

/// Maps a collaborator failure while running `command` into
/// [`NetBeansError::Process`].
pub(crate) fn process_error(command: &dyn fmt::Display, error: HostError) -> NetBeansError {
    match error {
        HostError::Spawn { command: rendered, source } => NetBeansError::Process {
            command: rendered,
            source,
        },
        other => NetBeansError::Process {
            command: command.to_string(),
            source: Arc::new(std::io::Error::other(other.to_string())),
        },
    }
}
