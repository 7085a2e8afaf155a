//! Installation discovery and version verification.
//!
//! The locator walks a directory tree, keeps directories that look like an
//! installation (launcher plus locale archive, launcher executable by its
//! owner) and confirms the version by unpacking the splash strings from the
//! archive. Every rejection along the way is a soft skip: it eliminates one
//! candidate and the walk carries on.
//!
//! The walk does not follow symlinks. It returns the first match in the
//! order the filesystem yields entries, which is not sorted; when several
//! installations of the same version coexist the result depends on that
//! order unless [`InstallationLocator::with_sorted_walk`] is enabled.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::NetBeansError;
use crate::host::ArchiveExtractor;
use crate::layout::{
    EXECUTABLE, RESOURCE_ARCHIVE, RESOURCE_ENTRY, ResolvedInstallation, VERSION_PATTERN,
};

/// Tracing target for installation scans.
const LOCATOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::locator");

/// Prefix of the per-candidate extraction directories.
pub const SCRATCH_PREFIX: &str = ".netbeans-unpack-";

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static SPLASH_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VERSION_PATTERN).expect("valid splash version regex"));

/// A directory with the structural markers of an installation.
///
/// Candidates are built per directory during a scan and discarded unless
/// they verify; they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationCandidate {
    dir: PathBuf,
    executable: PathBuf,
    archive: PathBuf,
    executable_flag: bool,
    embedded_version: Option<String>,
}

impl InstallationCandidate {
    /// Returns a candidate when both the launcher and the locale archive are
    /// regular files under `dir`.
    #[must_use]
    pub fn probe(dir: &Path) -> Option<Self> {
        let executable = dir.join(EXECUTABLE);
        let archive = dir.join(RESOURCE_ARCHIVE);
        if !executable.is_file() || !archive.is_file() {
            return None;
        }
        let executable_flag = owner_executable(&executable);
        Some(Self {
            dir: dir.to_path_buf(),
            executable,
            archive,
            executable_flag,
            embedded_version: None,
        })
    }

    /// Directory the candidate was found in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Launcher path.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Locale archive path.
    #[must_use]
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Whether the launcher has the owner-execute bit set.
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        self.executable_flag
    }

    /// Version read from the archive, once verified; `None` when extraction
    /// failed or the stamp was absent.
    #[must_use]
    pub fn embedded_version(&self) -> Option<&str> {
        self.embedded_version.as_deref()
    }
}

#[cfg(unix)]
fn owner_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o100 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn owner_executable(path: &Path) -> bool {
    path.is_file()
}

/// Finds version-verified installations beneath a root directory.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use netbeans_manager::InstallationLocator;
/// use netbeans_manager::host::system::{JarExtractor, SystemProcessRunner};
///
/// let locator = InstallationLocator::new(JarExtractor::new(SystemProcessRunner));
/// let installation = locator.find_installation("12.6", Path::new("/opt"))?;
/// println!("{}", installation.path().display());
/// # Ok::<(), netbeans_manager::NetBeansError>(())
/// ```
#[derive(Debug, Clone)]
pub struct InstallationLocator<X> {
    extractor: X,
    scratch_dir: Option<PathBuf>,
    sorted: bool,
}

impl<X> InstallationLocator<X> {
    /// Creates a locator that unpacks archives with `extractor` into the
    /// system temporary directory.
    #[must_use]
    pub const fn new(extractor: X) -> Self {
        Self {
            extractor,
            scratch_dir: None,
            sorted: false,
        }
    }

    /// Creates the per-candidate extraction directories under `dir`.
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Visits sibling directories in file-name order, making the first match
    /// deterministic.
    #[must_use]
    pub const fn with_sorted_walk(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Returns the extractor used for verification.
    #[must_use]
    pub const fn extractor(&self) -> &X {
        &self.extractor
    }

    fn scratch(&self) -> Result<TempDir, NetBeansError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let created = match self.scratch_dir.as_deref() {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        created.map_err(|source| NetBeansError::Io {
            path: self
                .scratch_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            source: Arc::new(source),
        })
    }
}

impl<X: ArchiveExtractor> InstallationLocator<X> {
    /// Returns the first directory under `root` holding `version`.
    ///
    /// `version` is compared as a string against the archive's stamp, so it
    /// must be the canonical published form (`"12.6"`, not `"12.06"`).
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::NoInstallationFound`] when the walk finds no
    /// verified directory, or [`NetBeansError::Io`] when a scratch directory
    /// cannot be created.
    pub fn find_installation(
        &self,
        version: &str,
        root: &Path,
    ) -> Result<ResolvedInstallation, NetBeansError> {
        debug!(
            target: LOCATOR_TARGET,
            version,
            root = %root.display(),
            "scanning for installation"
        );

        let mut walker = WalkDir::new(root).follow_links(false);
        if self.sorted {
            walker = walker.sort_by_file_name();
        }

        for visited in walker {
            let entry = match visited {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(target: LOCATOR_TARGET, error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(candidate) = self.verify(entry.path(), version)? {
                info!(
                    target: LOCATOR_TARGET,
                    version,
                    path = %candidate.dir().display(),
                    "installation found"
                );
                return Ok(ResolvedInstallation::new(candidate.dir));
            }
        }

        Err(NetBeansError::NoInstallationFound {
            version: version.to_owned(),
        })
    }

    /// Checks a single directory, returning the candidate when it holds
    /// `version`.
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::Io`] when a scratch directory cannot be
    /// created; every other failure is a skip.
    pub fn verify(
        &self,
        dir: &Path,
        version: &str,
    ) -> Result<Option<InstallationCandidate>, NetBeansError> {
        let Some(mut candidate) = InstallationCandidate::probe(dir) else {
            return Ok(None);
        };
        if !candidate.is_executable() {
            debug!(
                target: LOCATOR_TARGET,
                candidate = %dir.display(),
                "skipping candidate: launcher is not executable"
            );
            return Ok(None);
        }

        candidate.embedded_version = self.embedded_version(&candidate)?;
        match candidate.embedded_version() {
            Some(found) if found == version => Ok(Some(candidate)),
            found => {
                debug!(
                    target: LOCATOR_TARGET,
                    candidate = %dir.display(),
                    expected = version,
                    found = found.unwrap_or("<none>"),
                    "skipping candidate: version mismatch"
                );
                Ok(None)
            }
        }
    }

    /// Unpacks the splash strings into a scratch directory and reads the
    /// version stamp. The scratch directory is removed when this returns,
    /// whatever the outcome.
    fn embedded_version(
        &self,
        candidate: &InstallationCandidate,
    ) -> Result<Option<String>, NetBeansError> {
        let scratch = self.scratch()?;
        let status = match self
            .extractor
            .extract(candidate.archive(), RESOURCE_ENTRY, scratch.path())
        {
            Ok(status) => status,
            Err(err) => {
                warn!(
                    target: LOCATOR_TARGET,
                    candidate = %candidate.dir().display(),
                    error = %err,
                    "archive extractor unavailable"
                );
                return Ok(None);
            }
        };
        if status != 0 {
            debug!(
                target: LOCATOR_TARGET,
                candidate = %candidate.dir().display(),
                status,
                "skipping candidate: archive extraction failed"
            );
            return Ok(None);
        }

        Ok(read_version_stamp(&scratch.path().join(RESOURCE_ENTRY)))
    }
}

/// Returns the first version stamp in the splash strings file, or `None`
/// when the file is missing, unreadable or carries no stamp.
fn read_version_stamp(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        // Properties files are ISO-8859-1; the stamp itself is ASCII.
        let decoded = String::from_utf8_lossy(&buffer);
        let line = decoded.trim_end_matches(['\r', '\n']);
        if let Some(captures) = SPLASH_VERSION.captures(line) {
            return captures.get(1).map(|token| token.as_str().to_owned());
        }
    }
}
