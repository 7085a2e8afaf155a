//! Fixed on-disk markers that identify an installation.
//!
//! These are the relative paths and patterns the locator, inventory and
//! controller agree on. They are shared so fake trees in tests
//! and the production scan cannot drift apart.

use std::path::{Path, PathBuf};

/// Relative executable path inside an installation.
pub const EXECUTABLE: &str = "bin/netbeans";

/// Relative path of the packaged locale archive carrying the version stamp.
pub const RESOURCE_ARCHIVE: &str = "nb/core/locale/core_nb.jar";

/// Archive entry holding the splash strings, including the version stamp.
pub const RESOURCE_ENTRY: &str = "org/netbeans/core/startup/Bundle_nb.properties";

/// Pattern capturing the version token from the splash strings.
pub const VERSION_PATTERN: &str = r"^currentVersion=NetBeans IDE ([^ ]+)";

/// Subdirectory whose path appears on the command line of every process the
/// installation's launcher starts.
pub const NATIVE_LIBRARIES: &str = "platform/lib";

/// A verified installation root.
///
/// Returned by the locator and consumed by the inventory and controller.
/// It is re-derived on every call and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstallation {
    root: PathBuf,
}

impl ResolvedInstallation {
    pub(crate) const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Installation root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Launcher executable.
    #[must_use]
    pub fn executable(&self) -> PathBuf {
        self.root.join(EXECUTABLE)
    }

    /// Directory identifying this installation's processes.
    #[must_use]
    pub fn native_libraries(&self) -> PathBuf {
        self.root.join(NATIVE_LIBRARIES)
    }
}
