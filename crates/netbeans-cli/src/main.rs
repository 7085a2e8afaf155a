//! CLI entrypoint for the NetBeans installation manager.
//!
//! The binary delegates to [`netbeans_cli::run`], which loads configuration,
//! parses the command line and drives the manager against the host.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    netbeans_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
