//! Unit tests for launching and stopping installations.

use std::ffi::OsString;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::host::{HostError, ProcessEntry};
use crate::tests::support::{CopyExtractor, FakeTree, InstallPlan, MockRunner, MockTable};

#[fixture]
fn tree() -> FakeTree {
    FakeTree::new()
}

fn locator(tree: &FakeTree) -> InstallationLocator<CopyExtractor> {
    InstallationLocator::new(CopyExtractor::default()).with_scratch_dir(tree.scratch())
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[rstest]
fn non_blocking_run_spawns_nothing(tree: FakeTree) {
    tree.install("opt/netbeans", &InstallPlan::valid("8.2"));
    let locator = locator(&tree);
    let runner = MockRunner::new();
    let table = MockTable::new();

    let outcome = ProcessController::new(&locator, &runner, &table)
        .run(
            "8.2",
            &args(&["--help"]),
            RunOptions {
                headless: true,
                wait: false,
            },
            tree.root(),
        )
        .expect("non-blocking run is accepted");
    assert_eq!(outcome, RunOutcome::Unsupported);
    assert_eq!(outcome.code(), NON_BLOCKING_SENTINEL);
    assert!(
        locator.extractor().destinations().is_empty(),
        "a non-blocking run must not scan"
    );
}

#[rstest]
#[case::headless(true, &["--nosplash", HEADLESS_ARG])]
#[case::windowed(false, &["--nosplash"])]
fn run_passes_arguments_in_order(
    tree: FakeTree,
    #[case] headless: bool,
    #[case] expected: &'static [&'static str],
) {
    let install = tree.install("opt/netbeans", &InstallPlan::valid("8.2"));
    let locator = locator(&tree);
    let mut runner = MockRunner::new();
    runner
        .expect_retcode()
        .once()
        .withf(move |command: &CommandLine| {
            command.program() == install.join("bin/netbeans")
                && command.get_args()
                    == expected.iter().map(OsString::from).collect::<Vec<_>>().as_slice()
        })
        .return_const(Ok(0));
    let table = MockTable::new();

    let outcome = ProcessController::new(&locator, &runner, &table)
        .run(
            "8.2",
            &args(&["--nosplash"]),
            RunOptions {
                headless,
                wait: true,
            },
            tree.root(),
        )
        .expect("run succeeds");
    assert_eq!(outcome, RunOutcome::Exited(0));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(42)]
#[case(-1)]
fn run_reports_exit_code_verbatim(tree: FakeTree, #[case] code: i32) {
    tree.install("opt/netbeans", &InstallPlan::valid("8.2"));
    let locator = locator(&tree);
    let mut runner = MockRunner::new();
    runner.expect_retcode().once().return_const(Ok(code));
    let table = MockTable::new();

    let outcome = ProcessController::new(&locator, &runner, &table)
        .run("8.2", &[], RunOptions::default(), tree.root())
        .expect("run succeeds");
    assert_eq!(outcome.code(), code);
}

#[rstest]
fn run_without_installation_spawns_nothing(tree: FakeTree) {
    let locator = locator(&tree);
    let runner = MockRunner::new();
    let table = MockTable::new();

    let error = ProcessController::new(&locator, &runner, &table)
        .run("8.2", &[], RunOptions::default(), tree.root())
        .expect_err("no installation exists");
    assert!(matches!(error, NetBeansError::NoInstallationFound { .. }));
}

#[rstest]
fn stop_signals_only_matching_processes(tree: FakeTree) {
    let install = tree.install("opt/netbeans", &InstallPlan::valid("8.2"));
    let locator = locator(&tree);
    let runner = MockRunner::new();
    let libraries = install.join("platform/lib");
    let own_pid = std::process::id();

    let mut table = MockTable::new();
    let listing = vec![
        ProcessEntry {
            pid: 4101,
            cmdline: format!("java -Djava.library.path={} org.netbeans.Main", libraries.display()),
        },
        ProcessEntry {
            pid: 4102,
            cmdline: String::from("java -jar /opt/other/platform/lib/boot.jar"),
        },
        ProcessEntry {
            pid: own_pid,
            cmdline: format!("nbctl stop 8.2 {}", libraries.display()),
        },
        ProcessEntry {
            pid: 4103,
            cmdline: format!("{}/nbexec --jdkhome /usr/lib/jvm", libraries.display()),
        },
    ];
    table.expect_processes().once().return_const(Ok(listing));
    table
        .expect_terminate()
        .with(eq(4101))
        .once()
        .return_const(Ok(()));
    table
        .expect_terminate()
        .with(eq(4103))
        .once()
        .return_const(Err(HostError::ProcessTable {
            message: String::from("operation not permitted"),
        }));

    let report = ProcessController::new(&locator, &runner, &table)
        .stop("8.2", tree.root())
        .expect("stop succeeds");
    assert_eq!(report.signature, libraries);
    assert_eq!(report.terminated, [4101]);
    assert_eq!(
        report.failures,
        [StopFailure {
            pid: 4103,
            message: String::from("process table error: operation not permitted"),
        }]
    );
    assert!(!report.is_clean());
}

#[rstest]
fn stop_with_no_matches_is_clean(tree: FakeTree) {
    tree.install("opt/netbeans", &InstallPlan::valid("8.2"));
    let locator = locator(&tree);
    let runner = MockRunner::new();
    let mut table = MockTable::new();
    table.expect_processes().once().return_const(Ok(Vec::new()));
    table.expect_terminate().never();

    let report = ProcessController::new(&locator, &runner, &table)
        .stop("8.2", tree.root())
        .expect("stop succeeds");
    assert!(report.terminated.is_empty());
    assert!(report.is_clean());
}

#[rstest]
fn stop_surfaces_listing_failure(tree: FakeTree) {
    tree.install("opt/netbeans", &InstallPlan::valid("8.2"));
    let locator = locator(&tree);
    let runner = MockRunner::new();
    let mut table = MockTable::new();
    table
        .expect_processes()
        .once()
        .return_const(Err(HostError::ProcessTable {
            message: String::from("cannot read /proc"),
        }));

    let error = ProcessController::new(&locator, &runner, &table)
        .stop("8.2", tree.root())
        .expect_err("listing failure surfaces");
    assert!(matches!(error, NetBeansError::Process { .. }));
}
