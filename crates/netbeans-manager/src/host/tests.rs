//! Unit tests for host collaborators.

use std::ffi::OsString;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use rstest::rstest;

use super::system::{JAR_PROGRAM, JarExtractor, SystemProcessRunner};
use super::*;
use crate::tests::support::MockRunner;

fn resolve_binary(candidates: &[&str]) -> PathBuf {
    for candidate in candidates {
        let path = Path::new(candidate);
        if path.exists() {
            return path.to_path_buf();
        }
    }
    panic!("no candidate binary found in {candidates:?}");
}

#[test]
fn command_line_display_joins_with_single_spaces() {
    let command = CommandLine::new("/opt/netbeans/bin/netbeans")
        .args(["--locale", "en"])
        .arg("--nogui");
    assert_eq!(
        command.to_string(),
        "/opt/netbeans/bin/netbeans --locale en --nogui"
    );
    assert_eq!(command.cwd(), None);
}

#[test]
fn command_line_records_working_directory() {
    let command = CommandLine::new("jar").current_dir("/tmp/unpack");
    assert_eq!(command.cwd(), Some(Path::new("/tmp/unpack")));
    assert!(command.get_args().is_empty());
}

#[rstest]
#[case(200, true)]
#[case(204, true)]
#[case(299, true)]
#[case(301, false)]
#[case(404, false)]
#[case(500, false)]
fn http_response_success_covers_2xx(#[case] status: u16, #[case] expected: bool) {
    let response = HttpResponse::new(status, Box::new(Cursor::new(Vec::new())));
    assert_eq!(response.is_success(), expected);
    assert_eq!(response.status(), status);
}

#[test]
fn http_response_body_is_readable_after_consuming() {
    let response = HttpResponse::new(404, Box::new(Cursor::new(b"not found".to_vec())));
    let mut body = String::new();
    response
        .into_body()
        .read_to_string(&mut body)
        .expect("in-memory body");
    assert_eq!(body, "not found");
}

#[test]
fn jar_extractor_runs_jar_in_destination() {
    let mut runner = MockRunner::new();
    runner
        .expect_retcode()
        .once()
        .withf(|command: &CommandLine| {
            command.program() == Path::new(JAR_PROGRAM)
                && command.get_args()
                    == [
                        OsString::from("-xf"),
                        OsString::from("/opt/nb/nb/core/locale/core_nb.jar"),
                        OsString::from("org/netbeans/core/startup/Bundle_nb.properties"),
                    ]
                && command.cwd() == Some(Path::new("/tmp/unpack"))
        })
        .return_const(Ok(0));

    let extractor = JarExtractor::new(runner);
    let status = extractor
        .extract(
            Path::new("/opt/nb/nb/core/locale/core_nb.jar"),
            "org/netbeans/core/startup/Bundle_nb.properties",
            Path::new("/tmp/unpack"),
        )
        .expect("extraction runs");
    assert_eq!(status, 0);
}

#[test]
fn system_runner_reports_exit_codes() {
    let runner = SystemProcessRunner;
    let truthy = CommandLine::new(resolve_binary(&["/bin/true", "/usr/bin/true"]));
    let falsy = CommandLine::new(resolve_binary(&["/bin/false", "/usr/bin/false"]));
    assert_eq!(runner.retcode(&truthy).expect("true runs"), 0);
    assert_eq!(runner.retcode(&falsy).expect("false runs"), 1);
}

#[test]
fn system_runner_captures_stdout() {
    let runner = SystemProcessRunner;
    let echo = CommandLine::new(resolve_binary(&["/bin/echo", "/usr/bin/echo"])).arg("modules");
    assert_eq!(runner.output(&echo).expect("echo runs"), "modules\n");
}

#[test]
fn system_runner_reports_spawn_failures() {
    let runner = SystemProcessRunner;
    let missing = CommandLine::new("/nonexistent/bin/netbeans").arg("--nogui");
    let error = runner.retcode(&missing).expect_err("spawn must fail");
    match error {
        HostError::Spawn { command, .. } => {
            assert_eq!(command, "/nonexistent/bin/netbeans --nogui");
        }
        other => panic!("expected Spawn, got {other:?}"),
    }
}

#[test]
#[cfg(target_os = "linux")]
fn procfs_table_lists_current_process() {
    let table = system::ProcfsTable;
    let processes = table.processes().expect("proc is readable");
    let own = std::process::id();
    assert!(
        processes.iter().any(|entry| entry.pid == own),
        "expected pid {own} in process table"
    );
}
