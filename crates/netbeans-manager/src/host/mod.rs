//! Host collaborators consumed by the manager.
//!
//! The manager never reaches for processes, archives, the network or the
//! process table directly. Each of those concerns sits behind a trait that
//! is injected at construction, so tests can substitute fakes and an
//! orchestrator can route execution through its own primitives. Production
//! implementations live in [`system`].

use std::ffi::OsString;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

pub mod system;

/// Failure reported by a host collaborator.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// The command could not be spawned or waited on.
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
    /// The HTTP request did not produce a response.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Transport failure description.
        message: String,
    },
    /// The process table could not be read or a signal could not be sent.
    #[error("process table error: {message}")]
    ProcessTable {
        /// Failure description.
        message: String,
    },
}

/// A program and its arguments, executed without a shell.
///
/// The [`fmt::Display`] form joins the program and arguments with single
/// spaces; it is used for logging and error context only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl CommandLine {
    /// Creates a command line for `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Appends a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory the command runs in.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Working directory, if one was set.
    #[must_use]
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs commands synchronously.
pub trait ProcessRunner {
    /// Runs the command to completion and returns its exit code.
    ///
    /// A process terminated by a signal reports `-1`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Spawn`] when the command cannot be started.
    fn retcode(&self, command: &CommandLine) -> Result<i32, HostError>;

    /// Runs the command to completion and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Spawn`] when the command cannot be started.
    fn output(&self, command: &CommandLine) -> Result<String, HostError>;
}

/// Extracts a single entry from an archive.
pub trait ArchiveExtractor {
    /// Extracts `entry` from `archive` into `destination`, preserving the
    /// entry's relative path. Returns the extractor's status code; zero means
    /// success.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] when the extractor itself cannot run.
    fn extract(&self, archive: &Path, entry: &str, destination: &Path) -> Result<i32, HostError>;
}

/// Response to an HTTP GET.
pub struct HttpResponse {
    status: u16,
    body: Box<dyn Read + Send>,
}

impl HttpResponse {
    /// Creates a response from a status code and a body reader.
    #[must_use]
    pub const fn new(status: u16, body: Box<dyn Read + Send>) -> Self {
        Self { status, body }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Consumes the response and returns the body reader.
    #[must_use]
    pub fn into_body(self) -> Box<dyn Read + Send> {
        self.body
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Performs HTTP GET requests.
pub trait HttpFetcher {
    /// Requests `url`. Non-success statuses are returned as responses, not
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Transport`] when no response was received.
    fn get(&self, url: &str) -> Result<HttpResponse, HostError>;
}

/// A running process as seen in the process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    /// Process identifier.
    pub pid: u32,
    /// Full command line, arguments separated by single spaces.
    pub cmdline: String,
}

/// Lists and signals running processes.
pub trait ProcessTable {
    /// Returns every process visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ProcessTable`] when the table cannot be read.
    fn processes(&self) -> Result<Vec<ProcessEntry>, HostError>;

    /// Sends a termination request to `pid`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ProcessTable`] when the signal cannot be
    /// delivered.
    fn terminate(&self, pid: u32) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests;
