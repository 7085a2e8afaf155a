//! Command execution against a [`NetBeansManager`].

use std::io::Write;
use std::process::ExitCode;

use netbeans_manager::host::{ArchiveExtractor, HttpFetcher, ProcessRunner, ProcessTable};
use netbeans_manager::{Capabilities, NetBeansManager, PluginStatus, RunOptions, RunOutcome};

use crate::AppError;
use crate::IoStreams;
use crate::cli::{CliCommand, RootArgs};

/// Executes `command` and returns the process exit code.
pub(crate) fn execute<R, X, F, P, W, E>(
    command: CliCommand,
    manager: &NetBeansManager<R, X, F, P>,
    capabilities: &Capabilities,
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError>
where
    R: ProcessRunner,
    X: ArchiveExtractor,
    F: HttpFetcher,
    P: ProcessTable,
    W: Write,
    E: Write,
{
    if command.touches_installation() {
        capabilities.ensure()?;
    }

    match command {
        CliCommand::Versions { url } => {
            for version in manager.list_versions(url.as_deref())? {
                io.line(&version)?;
            }
        }
        CliCommand::Latest { url } => {
            let versions = manager.list_versions(url.as_deref())?;
            io.line(&netbeans_manager::pick_latest(versions)?)?;
        }
        CliCommand::Locate { version, root } => {
            let installation = manager.find_installation(&version, root_path(&root))?;
            io.line(&installation.path().display().to_string())?;
        }
        CliCommand::Plugin {
            name,
            version,
            root,
        } => {
            let status = manager.find_plugin(&name, &version, root_path(&root))?;
            io.line(&render_status(&status))?;
        }
        CliCommand::Plugins { version, root } => {
            for record in manager.list_plugins(&version, root_path(&root))? {
                io.line(&render_status(&PluginStatus::from(&record)))?;
            }
        }
        CliCommand::Run {
            version,
            root,
            no_headless,
            no_wait,
            args,
        } => {
            let options = RunOptions {
                headless: !no_headless,
                wait: !no_wait,
            };
            let outcome = manager.run(&version, &args, options, root_path(&root))?;
            if outcome == RunOutcome::Unsupported {
                io.error_line("non-blocking runs are not supported; nothing was started")?;
            }
            return Ok(exit_code_from_status(outcome.code()));
        }
        CliCommand::Stop { version, root } => {
            let report = manager.stop(&version, root_path(&root))?;
            for pid in &report.terminated {
                io.line(&format!("stopped {pid}"))?;
            }
            for failure in &report.failures {
                io.error_line(&format!("failed to stop {}: {}", failure.pid, failure.message))?;
            }
            if !report.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
        CliCommand::InstallerUrl { version, features } => {
            io.line(&manager.installer_url(&version, features.as_deref()))?;
        }
        CliCommand::Download {
            version,
            features,
            dest,
        } => {
            let path = manager.download_installer(&version, features.as_deref(), dest.as_deref())?;
            io.line(&path.display().to_string())?;
        }
        CliCommand::Check => return report_capabilities(capabilities, io),
    }
    Ok(ExitCode::SUCCESS)
}

fn root_path(root: &RootArgs) -> Option<&std::path::Path> {
    root.root.as_deref()
}

fn render_status(status: &PluginStatus) -> String {
    let mut rendered = format!("{}\t{}\t{}", status.name, status.version, status.state);
    if let Some(upgrade) = status.upgrade.as_ref() {
        rendered.push('\t');
        rendered.push_str(&upgrade.target);
        if !upgrade.detail.is_empty() {
            rendered.push(' ');
            rendered.push_str(&upgrade.detail);
        }
    }
    rendered
}

fn report_capabilities<W: Write, E: Write>(
    capabilities: &Capabilities,
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError> {
    let platform = if capabilities.platform_supported() {
        "supported"
    } else {
        "unsupported"
    };
    io.line(&format!("platform: {platform}"))?;
    match capabilities.archive_tool() {
        Some(path) => io.line(&format!("jar: {}", path.display()))?,
        None => io.line("jar: missing")?,
    }
    if capabilities.is_available() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Maps a launcher status to a process exit code. Out-of-range statuses,
/// including `-1` for signalled launchers, become a generic failure.
pub(crate) fn exit_code_from_status(status: i32) -> ExitCode {
    u8::try_from(status).map_or(ExitCode::FAILURE, ExitCode::from)
}
