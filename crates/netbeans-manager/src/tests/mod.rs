//! Crate-level fixtures, integration and BDD tests.

use crate::host::system::JarExtractor;
use crate::locator::InstallationLocator;

use self::support::{FakeTree, InstallPlan, MockRunner};

pub mod support;

#[test]
fn jar_extractor_drives_lookup_through_runner() {
    let tree = FakeTree::new();
    tree.install("opt/netbeans", &InstallPlan::valid("12.6"));

    let mut runner = MockRunner::new();
    runner.expect_retcode().times(1).return_const(Ok(1));
    let locator = InstallationLocator::new(JarExtractor::new(runner)).with_scratch_dir(tree.scratch());

    let result = locator.find_installation("12.6", tree.root());
    assert!(result.is_err(), "a failing jar run must skip the candidate");
    assert_eq!(tree.scratch_entries(), 0);
}
