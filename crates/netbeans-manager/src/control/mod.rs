//! Launching and stopping an installation's processes.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{NetBeansError, process_error};
use crate::host::{ArchiveExtractor, CommandLine, ProcessRunner, ProcessTable};
use crate::locator::InstallationLocator;

/// Tracing target for process control.
const CONTROL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::control");

/// JVM property appended to headless runs.
pub const HEADLESS_ARG: &str = "-J-Djava.awt.headless=True";

/// Numeric result reported for a run that was not waited on.
pub const NON_BLOCKING_SENTINEL: i32 = 2;

/// How a launch request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The launcher ran to completion with this exit code; `-1` when it was
    /// killed by a signal.
    Exited(i32),
    /// Non-blocking launches are not implemented. Nothing was spawned.
    Unsupported,
}

impl RunOutcome {
    /// Returns the numeric result. [`RunOutcome::Unsupported`] maps to
    /// [`NON_BLOCKING_SENTINEL`].
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Exited(code) => code,
            Self::Unsupported => NON_BLOCKING_SENTINEL,
        }
    }
}

/// Launch flags for [`ProcessController::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Append [`HEADLESS_ARG`] to the arguments.
    pub headless: bool,
    /// Wait for the launcher to exit.
    pub wait: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            headless: true,
            wait: true,
        }
    }
}

/// A process that could not be signalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopFailure {
    /// Process identifier.
    pub pid: u32,
    /// Failure description.
    pub message: String,
}

/// Outcome of [`ProcessController::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopReport {
    /// Path searched for in process command lines.
    pub signature: PathBuf,
    /// Processes that were sent a termination request.
    pub terminated: Vec<u32>,
    /// Processes that matched but could not be signalled.
    pub failures: Vec<StopFailure>,
}

impl StopReport {
    /// Whether every matching process was signalled.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs launchers and terminates running instances.
#[derive(Debug)]
pub struct ProcessController<'a, X, R, P> {
    locator: &'a InstallationLocator<X>,
    runner: &'a R,
    table: &'a P,
}

impl<'a, X, R, P> ProcessController<'a, X, R, P> {
    /// Creates a controller over the given collaborators.
    #[must_use]
    pub const fn new(locator: &'a InstallationLocator<X>, runner: &'a R, table: &'a P) -> Self {
        Self {
            locator,
            runner,
            table,
        }
    }
}

impl<X, R, P> ProcessController<'_, X, R, P>
where
    X: ArchiveExtractor,
    R: ProcessRunner,
    P: ProcessTable,
{
    /// Runs the launcher of `version` with `args`.
    ///
    /// Without [`RunOptions::wait`] nothing is scanned or spawned and
    /// [`RunOutcome::Unsupported`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::NoInstallationFound`] when the installation
    /// cannot be located and [`NetBeansError::Process`] when the launcher
    /// cannot be started. A non-zero exit code is not an error.
    pub fn run(
        &self,
        version: &str,
        args: &[String],
        options: RunOptions,
        root: &Path,
    ) -> Result<RunOutcome, NetBeansError> {
        if !options.wait {
            debug!(target: CONTROL_TARGET, version, "non-blocking run requested");
            return Ok(RunOutcome::Unsupported);
        }

        let installation = self.locator.find_installation(version, root)?;
        let mut command = CommandLine::new(installation.executable()).args(args);
        if options.headless {
            command = command.arg(HEADLESS_ARG);
        }
        let code = self
            .runner
            .retcode(&command)
            .map_err(|err| process_error(&command, err))?;
        info!(target: CONTROL_TARGET, command = %command, code, "launcher exited");
        Ok(RunOutcome::Exited(code))
    }

    /// Sends a termination request to every process started from the
    /// installation of `version`.
    ///
    /// A process matches when its command line contains the installation's
    /// native library directory. The calling process is never signalled.
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::NoInstallationFound`] when the installation
    /// cannot be located and [`NetBeansError::Process`] when the process
    /// table cannot be read. Per-process signal failures are reported in
    /// [`StopReport::failures`].
    pub fn stop(&self, version: &str, root: &Path) -> Result<StopReport, NetBeansError> {
        let installation = self.locator.find_installation(version, root)?;
        let signature = installation.native_libraries();
        let needle = signature.to_string_lossy().into_owned();
        let own_pid = std::process::id();

        let processes = self
            .table
            .processes()
            .map_err(|err| process_error(&"process table listing", err))?;

        let mut report = StopReport {
            signature,
            terminated: Vec::new(),
            failures: Vec::new(),
        };
        for entry in processes
            .iter()
            .filter(|process| process.pid != own_pid && process.cmdline.contains(needle.as_str()))
        {
            match self.table.terminate(entry.pid) {
                Ok(()) => report.terminated.push(entry.pid),
                Err(err) => {
                    warn!(
                        target: CONTROL_TARGET,
                        pid = entry.pid,
                        error = %err,
                        "failed to signal process"
                    );
                    report.failures.push(StopFailure {
                        pid: entry.pid,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            target: CONTROL_TARGET,
            version,
            signature = %needle,
            terminated = report.terminated.len(),
            failed = report.failures.len(),
            "stop requested"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests;
