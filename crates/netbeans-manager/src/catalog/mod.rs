//! Remote version catalog and installer downloads.
//!
//! The download site publishes one directory per release. Its index page is
//! scanned line by line for anchors whose target is a version directory;
//! aliases such as `latest/` and parent links never match.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info};

use crate::error::NetBeansError;
use crate::host::{HostError, HttpFetcher, HttpResponse};

/// Tracing target for catalog requests.
const CATALOG_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::catalog");

/// Pattern matching a version directory link in the index page.
pub const VERSION_LINK_PATTERN: &str =
    r#"^\s*<[Aa]\s*[hH][rR][eE][fF]\s*=\s*['"]([0-9][.0-9]*)/?['"].*>.*"#;

/// Path between a release directory and its installer bundles.
const BUNDLES_PATH: &str = "final/bundles";

/// Platform suffix of the installer file name.
const PLATFORM_SUFFIX: &str = "-linux.sh";

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static VERSION_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VERSION_LINK_PATTERN).expect("valid version link regex"));

/// Returns the installer file name for `version`, optionally restricted to
/// a feature bundle such as `cpp` or `php`.
#[must_use]
pub fn installer_filename(version: &str, features: Option<&str>) -> String {
    match features.filter(|bundle| !bundle.is_empty()) {
        Some(bundle) => format!("netbeans-{version}-{bundle}{PLATFORM_SUFFIX}"),
        None => format!("netbeans-{version}{PLATFORM_SUFFIX}"),
    }
}

/// Returns the download URL of the installer for `version` under
/// `base_url`.
///
/// # Example
///
/// ```
/// use netbeans_manager::catalog::installer_url;
///
/// assert_eq!(
///     installer_url("8.2", Some("php"), "http://download.netbeans.org/netbeans/"),
///     "http://download.netbeans.org/netbeans/8.2/final/bundles/netbeans-8.2-php-linux.sh",
/// );
/// ```
#[must_use]
pub fn installer_url(version: &str, features: Option<&str>, base_url: &str) -> String {
    format!(
        "{}/{version}/{BUNDLES_PATH}/{}",
        base_url.trim_end_matches('/'),
        installer_filename(version, features)
    )
}

/// Extracts version directory names from an index page, in document order.
///
/// Lines that cannot be decoded or do not hold a version link are skipped.
///
/// # Errors
///
/// Returns the underlying I/O error when the body cannot be read.
pub fn parse_index(body: impl Read) -> io::Result<Vec<String>> {
    let mut reader = BufReader::new(body);
    let mut buffer = Vec::new();
    let mut versions = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(versions);
        }
        let decoded = String::from_utf8_lossy(&buffer);
        let line = decoded.trim_end_matches(['\r', '\n']);
        if let Some(version) = VERSION_LINK
            .captures(line)
            .and_then(|captures| captures.get(1))
        {
            versions.push(version.as_str().to_owned());
        }
    }
}

/// Lists and downloads releases from a catalog site.
#[derive(Debug)]
pub struct VersionCatalog<'a, F> {
    fetcher: &'a F,
}

impl<'a, F> VersionCatalog<'a, F> {
    /// Creates a catalog issuing requests through `fetcher`.
    #[must_use]
    pub const fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }
}

impl<F: HttpFetcher> VersionCatalog<'_, F> {
    fn fetch(&self, url: &str) -> Result<HttpResponse, NetBeansError> {
        let response = self.fetcher.get(url).map_err(|err| transport_error(url, err))?;
        if !response.is_success() {
            debug!(
                target: CATALOG_TARGET,
                url,
                status = response.status(),
                "catalog request rejected"
            );
            return Err(NetBeansError::Fetch {
                url: url.to_owned(),
                status: response.status(),
            });
        }
        Ok(response)
    }

    /// Lists the versions published at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::Fetch`] on a non-success status and
    /// [`NetBeansError::Transport`] when no response arrives or the body
    /// cannot be read.
    pub fn list_versions(&self, url: &str) -> Result<Vec<String>, NetBeansError> {
        let response = self.fetch(url)?;
        let versions =
            parse_index(response.into_body()).map_err(|err| NetBeansError::Transport {
                url: url.to_owned(),
                message: err.to_string(),
            })?;
        debug!(target: CATALOG_TARGET, url, count = versions.len(), "listed versions");
        Ok(versions)
    }

    /// Downloads the installer for `version` into `dest_dir` and marks it
    /// executable. Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::Fetch`] or [`NetBeansError::Transport`] when
    /// the request fails, and [`NetBeansError::Io`] when the file cannot be
    /// written.
    pub fn download_installer(
        &self,
        version: &str,
        features: Option<&str>,
        base_url: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, NetBeansError> {
        let url = installer_url(version, features, base_url);
        let response = self.fetch(&url)?;
        let path = dest_dir.join(installer_filename(version, features));

        let mut body = response.into_body();
        let written = File::create(&path)
            .and_then(|mut file| io::copy(&mut body, &mut file))
            .map_err(|source| io_error(&path, source))?;
        make_executable(&path)?;

        info!(
            target: CATALOG_TARGET,
            url = %url,
            path = %path.display(),
            bytes = written,
            "installer downloaded"
        );
        Ok(path)
    }
}

fn transport_error(url: &str, error: HostError) -> NetBeansError {
    match error {
        HostError::Transport {
            url: requested,
            message,
        } => NetBeansError::Transport {
            url: requested,
            message,
        },
        other => NetBeansError::Transport {
            url: url.to_owned(),
            message: other.to_string(),
        },
    }
}

fn io_error(path: &Path, source: io::Error) -> NetBeansError {
    NetBeansError::Io {
        path: path.to_path_buf(),
        source: Arc::new(source),
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), NetBeansError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|source| io_error(path, source))
}

#[cfg(not(unix))]
fn make_executable(path: &Path) -> Result<(), NetBeansError> {
    fs::metadata(path)
        .map(drop)
        .map_err(|source| io_error(path, source))
}
