//! Command-line runtime for `nbctl`.
//!
//! The runtime splits leading configuration flags from the command, loads
//! configuration through `ortho_config`, installs telemetry, probes the host
//! and executes one subcommand against the production manager. IO streams
//! and the configuration loader are injected so tests can drive the runtime
//! without touching the process environment.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use netbeans_manager::{Capabilities, NetBeansManager};

mod cli;
mod commands;
mod config;
mod errors;
mod telemetry;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
pub(crate) use errors::AppError;

/// Output streams handed to the runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    stdout: &'a mut W,
    stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }

    pub(crate) fn line(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.stdout, "{text}").map_err(AppError::WriteOutput)
    }

    pub(crate) fn error_line(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.stderr, "{text}").map_err(AppError::WriteOutput)
    }
}

/// Runs the CLI with the given arguments and output streams.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

fn run_with_loader<I, W, E, L>(args: I, io: &mut IoStreams<'_, W, E>, loader: &L) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let collected: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&collected);

    let cli = match Cli::try_parse_from(&split.command_arguments) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, io),
    };

    let result = loader.load(&split.config_arguments).and_then(|config| {
        telemetry::initialise(&config)?;
        let manager = NetBeansManager::system(&config);
        commands::execute(cli.command, &manager, &Capabilities::probe(), io)
    });

    match result {
        Ok(exit_code) => exit_code,
        Err(error) => {
            // Nothing more can be reported when stderr itself fails.
            drop(writeln!(io.stderr, "{error}"));
            ExitCode::FAILURE
        }
    }
}

/// Prints help and version output to stdout and usage errors to stderr.
fn report_usage<W: Write, E: Write>(error: &clap::Error, io: &mut IoStreams<'_, W, E>) -> ExitCode {
    let rendered = error.to_string();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            drop(write!(io.stdout, "{rendered}"));
            ExitCode::SUCCESS
        }
        _ => {
            drop(write!(io.stderr, "{rendered}"));
            ExitCode::from(2)
        }
    }
}
