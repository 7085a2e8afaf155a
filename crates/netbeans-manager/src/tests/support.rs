//! Shared fixtures: fake installation trees and archive extractors.

use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use mockall::mock;
use tempfile::TempDir;

use crate::host::{
    ArchiveExtractor, CommandLine, HostError, HttpFetcher, HttpResponse, ProcessEntry,
    ProcessRunner, ProcessTable,
};
use crate::layout::{EXECUTABLE, RESOURCE_ARCHIVE};

/// Archive body that makes [`CopyExtractor`] report a non-zero status.
pub const CORRUPT_ARCHIVE: &str = "CORRUPT";

/// Archive body that makes [`CopyExtractor`] succeed without writing the
/// entry, as `jar` does when the entry is absent.
pub const EMPTY_ARCHIVE: &str = "EMPTY";

mock! {
    pub Runner {}
    impl ProcessRunner for Runner {
        fn retcode(&self, command: &CommandLine) -> Result<i32, HostError>;
        fn output(&self, command: &CommandLine) -> Result<String, HostError>;
    }
}

mock! {
    pub Table {}
    impl ProcessTable for Table {
        fn processes(&self) -> Result<Vec<ProcessEntry>, HostError>;
        fn terminate(&self, pid: u32) -> Result<(), HostError>;
    }
}

/// How a fake installation is laid out.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub executable: bool,
    pub launcher_mode: u32,
    pub archive: Option<String>,
}

impl InstallPlan {
    /// A well-formed installation stamped with `version`.
    pub fn valid(version: &str) -> Self {
        Self {
            executable: true,
            launcher_mode: 0o755,
            archive: Some(splash_strings(version)),
        }
    }

    pub fn without_archive(mut self) -> Self {
        self.archive = None;
        self
    }

    pub fn without_executable(mut self) -> Self {
        self.executable = false;
        self
    }

    pub fn with_launcher_mode(mut self, mode: u32) -> Self {
        self.launcher_mode = mode;
        self
    }

    pub fn with_archive_body(mut self, body: &str) -> Self {
        self.archive = Some(body.to_owned());
        self
    }
}

/// Splash strings as shipped in the locale bundle.
pub fn splash_strings(version: &str) -> String {
    format!(
        "# Localised splash strings\n\
         LBL_splash_window_title=Starting NetBeans IDE\n\
         currentVersion=NetBeans IDE {version} (Build 201912112222)\n\
         currentVersion=NetBeans IDE 0.0 (shadowed)\n"
    )
}

/// A temporary directory tree holding fake installations.
pub struct FakeTree {
    temp_dir: TempDir,
    scratch: TempDir,
}

impl FakeTree {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to allocate tree directory");
        let scratch = TempDir::new().expect("failed to allocate scratch directory");
        Self { temp_dir, scratch }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Parent directory for the locator's extraction directories.
    pub fn scratch(&self) -> &Path {
        self.scratch.path()
    }

    /// Number of entries currently in the scratch parent.
    pub fn scratch_entries(&self) -> usize {
        fs::read_dir(self.scratch())
            .expect("scratch directory is readable")
            .count()
    }

    /// Creates an installation at `relative` under the root.
    pub fn install(&self, relative: &str, plan: &InstallPlan) -> PathBuf {
        let dir = self.root().join(relative);
        fs::create_dir_all(&dir).expect("create installation directory");
        if plan.executable {
            write_file(&dir.join(EXECUTABLE), "#!/bin/sh\nexit 0\n");
            set_mode(&dir.join(EXECUTABLE), plan.launcher_mode);
        }
        if let Some(body) = plan.archive.as_deref() {
            write_file(&dir.join(RESOURCE_ARCHIVE), body);
        }
        dir
    }

    /// Creates an empty directory at `relative` under the root.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let dir = self.root().join(relative);
        fs::create_dir_all(&dir).expect("create directory");
        dir
    }
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(path, contents)
        .unwrap_or_else(|error| panic!("failed to write fixture {path:?}: {error}"));
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("set launcher mode");
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}

/// Treats the "archive" as the entry itself: copies its body to the
/// destination unless it carries one of the marker bodies.
#[derive(Debug, Default)]
pub struct CopyExtractor {
    destinations: RefCell<Vec<PathBuf>>,
}

impl CopyExtractor {
    /// Destinations handed to the extractor so far.
    pub fn destinations(&self) -> Vec<PathBuf> {
        self.destinations.borrow().clone()
    }
}

impl ArchiveExtractor for CopyExtractor {
    fn extract(&self, archive: &Path, entry: &str, destination: &Path) -> Result<i32, HostError> {
        self.destinations.borrow_mut().push(destination.to_path_buf());
        let body = fs::read_to_string(archive).expect("fake archive is readable");
        match body.as_str() {
            CORRUPT_ARCHIVE => Ok(1),
            EMPTY_ARCHIVE => Ok(0),
            _ => {
                write_file(&destination.join(entry), &body);
                Ok(0)
            }
        }
    }
}

/// An extractor whose program cannot be spawned.
#[derive(Debug, Default, Clone, Copy)]
pub struct MissingExtractor;

impl ArchiveExtractor for MissingExtractor {
    fn extract(&self, _archive: &Path, _entry: &str, _destination: &Path) -> Result<i32, HostError> {
        Err(HostError::Spawn {
            command: String::from("jar -xf"),
            source: std::sync::Arc::new(std::io::Error::from(std::io::ErrorKind::NotFound)),
        })
    }
}

/// An extractor that panics mid-verification.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanickingExtractor;

impl ArchiveExtractor for PanickingExtractor {
    fn extract(&self, _archive: &Path, _entry: &str, destination: &Path) -> Result<i32, HostError> {
        panic!("extractor blew up in {}", destination.display());
    }
}

/// Index page as served by the download site.
pub const INDEX_PAGE: &str = "\
<html><head><title>Index of /netbeans</title></head><body>
<a href=\"../\">Parent Directory</a>
  <a href=\"8.2/\">8.2/</a>   27-Sep-2016 10:12    -
<A HREF='8.1/'>8.1/</A>   04-Nov-2015 14:38    -
<a href=\"latest/\">latest/</a>
<p>generated</p>
</body></html>
";

/// Answers every request with the same status and body, recording URLs.
#[derive(Debug)]
pub struct StaticFetcher {
    status: u16,
    body: Vec<u8>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpFetcher for StaticFetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, HostError> {
        self.requests.borrow_mut().push(url.to_owned());
        Ok(HttpResponse::new(
            self.status,
            Box::new(Cursor::new(self.body.clone())),
        ))
    }
}

/// A fetcher that never gets a response.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableFetcher;

impl HttpFetcher for UnreachableFetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, HostError> {
        Err(HostError::Transport {
            url: url.to_owned(),
            message: String::from("connection refused"),
        })
    }
}
