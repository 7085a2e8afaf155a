//! Production implementations of the host collaborators.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tracing::debug;

use super::{
    ArchiveExtractor, CommandLine, HostError, HttpFetcher, HttpResponse, ProcessEntry,
    ProcessRunner, ProcessTable,
};

/// Tracing target for host command execution.
const HOST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::host");

/// Program used to unpack entries from `.jar` archives.
pub const JAR_PROGRAM: &str = "jar";

/// Runs commands with [`std::process::Command`], without a shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    fn command(command: &CommandLine) -> Command {
        let mut process = Command::new(command.program());
        process.args(command.get_args());
        if let Some(dir) = command.cwd() {
            process.current_dir(dir);
        }
        process
    }

    fn spawn_error(command: &CommandLine, source: std::io::Error) -> HostError {
        HostError::Spawn {
            command: command.to_string(),
            source: Arc::new(source),
        }
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn retcode(&self, command: &CommandLine) -> Result<i32, HostError> {
        debug!(target: HOST_TARGET, command = %command, "running command");
        let status = Self::command(command)
            .stdin(Stdio::null())
            .status()
            .map_err(|err| Self::spawn_error(command, err))?;
        debug!(target: HOST_TARGET, command = %command, ?status, "command exited");
        Ok(status.code().unwrap_or(-1))
    }

    fn output(&self, command: &CommandLine) -> Result<String, HostError> {
        debug!(target: HOST_TARGET, command = %command, "capturing command output");
        let output = Self::command(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| Self::spawn_error(command, err))?;
        if !output.stderr.is_empty() {
            debug!(
                target: HOST_TARGET,
                command = %command,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "command stderr output"
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extracts archive entries by running `jar -xf` in the destination.
#[derive(Debug, Default, Clone, Copy)]
pub struct JarExtractor<R> {
    runner: R,
}

impl<R> JarExtractor<R> {
    /// Creates an extractor that runs `jar` through `runner`.
    #[must_use]
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: ProcessRunner> ArchiveExtractor for JarExtractor<R> {
    fn extract(&self, archive: &Path, entry: &str, destination: &Path) -> Result<i32, HostError> {
        let command = CommandLine::new(JAR_PROGRAM)
            .arg("-xf")
            .arg(archive)
            .arg(entry)
            .current_dir(destination);
        self.runner.retcode(&command)
    }
}

/// Blocking HTTP client backed by `ureq`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UreqFetcher;

impl HttpFetcher for UreqFetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, HostError> {
        debug!(target: HOST_TARGET, url, "fetching");
        match ureq::get(url).call() {
            Ok(response) | Err(ureq::Error::Status(_, response)) => {
                let status = response.status();
                let body: Box<dyn Read + Send> = Box::new(response.into_reader());
                Ok(HttpResponse::new(status, body))
            }
            Err(ureq::Error::Transport(transport)) => Err(HostError::Transport {
                url: url.to_owned(),
                message: transport.to_string(),
            }),
        }
    }
}

/// Process table read from `/proc` and signalled with `kill(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcfsTable;

impl ProcfsTable {
    const PROC_ROOT: &'static str = "/proc";

    fn read_cmdline(pid_dir: &Path) -> Option<String> {
        let raw = fs::read(pid_dir.join("cmdline")).ok()?;
        let cmdline = raw
            .split(|byte| *byte == 0)
            .filter(|part| !part.is_empty())
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join(" ");
        Some(cmdline)
    }
}

impl ProcessTable for ProcfsTable {
    fn processes(&self) -> Result<Vec<ProcessEntry>, HostError> {
        let entries = fs::read_dir(Self::PROC_ROOT).map_err(|err| HostError::ProcessTable {
            message: format!("cannot read {}: {err}", Self::PROC_ROOT),
        })?;

        let mut processes = Vec::new();
        for entry in entries.flatten() {
            let Some(pid) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<u32>().ok())
            else {
                continue;
            };
            // Processes can exit between listing and reading; skip them.
            if let Some(cmdline) = Self::read_cmdline(&entry.path()) {
                processes.push(ProcessEntry { pid, cmdline });
            }
        }
        Ok(processes)
    }

    fn terminate(&self, pid: u32) -> Result<(), HostError> {
        let raw = i32::try_from(pid).map_err(|_| HostError::ProcessTable {
            message: format!("pid {pid} is out of range"),
        })?;
        kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(|errno| HostError::ProcessTable {
            message: format!("failed to signal pid {pid}: {errno}"),
        })
    }
}
