//! Facade owning the host collaborators.
//!
//! [`NetBeansManager`] is the entry point an orchestrator holds on to. It
//! owns one instance of each collaborator plus the defaults that a caller
//! may omit per call: the search root and the catalog URL. Every call
//! re-scans; nothing is cached between calls.

use std::path::{Path, PathBuf};

use netbeans_config::{Config, DEFAULT_CATALOG_URL, DEFAULT_SEARCH_ROOT};

use crate::catalog::{self, VersionCatalog};
use crate::control::{ProcessController, RunOptions, RunOutcome, StopReport};
use crate::error::NetBeansError;
use crate::host::system::{JarExtractor, ProcfsTable, SystemProcessRunner, UreqFetcher};
use crate::host::{ArchiveExtractor, HttpFetcher, ProcessRunner, ProcessTable};
use crate::inventory::{PluginInventory, PluginRecord, PluginStatus};
use crate::layout::ResolvedInstallation;
use crate::locator::InstallationLocator;
use crate::version;

/// Manager wired to the production collaborators.
pub type SystemManager =
    NetBeansManager<SystemProcessRunner, JarExtractor<SystemProcessRunner>, UreqFetcher, ProcfsTable>;

/// Installation manager over injected collaborators.
///
/// # Example
///
/// ```rust,no_run
/// use netbeans_config::Config;
/// use netbeans_manager::NetBeansManager;
///
/// let manager = NetBeansManager::system(&Config::default());
/// let latest = manager.latest_version()?;
/// let installation = manager.find_installation(&latest, None)?;
/// println!("{latest} at {}", installation.path().display());
/// # Ok::<(), netbeans_manager::NetBeansError>(())
/// ```
#[derive(Debug)]
pub struct NetBeansManager<R, X, F, P> {
    runner: R,
    locator: InstallationLocator<X>,
    fetcher: F,
    table: P,
    search_root: PathBuf,
    catalog_url: String,
}

impl SystemManager {
    /// Builds a manager from the production collaborators and `config`.
    #[must_use]
    pub fn system(config: &Config) -> Self {
        let mut locator = InstallationLocator::new(JarExtractor::new(SystemProcessRunner))
            .with_sorted_walk(config.sorted_scan());
        if let Some(dir) = config.scratch_dir() {
            locator = locator.with_scratch_dir(dir);
        }
        NetBeansManager::new(SystemProcessRunner, locator, UreqFetcher, ProcfsTable)
            .with_search_root(config.search_root())
            .with_catalog_url(config.catalog_url())
    }
}

impl<R, X, F, P> NetBeansManager<R, X, F, P> {
    /// Creates a manager searching `/` and listing the public catalog.
    #[must_use]
    pub fn new(runner: R, locator: InstallationLocator<X>, fetcher: F, table: P) -> Self {
        Self {
            runner,
            locator,
            fetcher,
            table,
            search_root: PathBuf::from(DEFAULT_SEARCH_ROOT),
            catalog_url: DEFAULT_CATALOG_URL.to_owned(),
        }
    }

    /// Sets the root searched when a call passes no root.
    #[must_use]
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = root.into();
        self
    }

    /// Sets the catalog used when a call passes no URL.
    #[must_use]
    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    /// Default search root.
    #[must_use]
    pub fn search_root(&self) -> &Path {
        &self.search_root
    }

    /// Default catalog URL.
    #[must_use]
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// Installation locator in use.
    #[must_use]
    pub const fn locator(&self) -> &InstallationLocator<X> {
        &self.locator
    }

    /// Returns the highest of `versions`. See [`version::pick_latest`].
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::EmptyInput`] or
    /// [`NetBeansError::MalformedVersion`].
    pub fn pick_latest<I, S>(versions: I) -> Result<String, NetBeansError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        version::pick_latest(versions)
    }

    /// Installer URL for `version` under the configured catalog.
    #[must_use]
    pub fn installer_url(&self, version: &str, features: Option<&str>) -> String {
        catalog::installer_url(version, features, &self.catalog_url)
    }

    fn root<'a>(&'a self, root: Option<&'a Path>) -> &'a Path {
        root.unwrap_or(&self.search_root)
    }
}

impl<R, X, F, P> NetBeansManager<R, X, F, P>
where
    F: HttpFetcher,
{
    /// Lists published versions at `url`, or at the configured catalog.
    ///
    /// # Errors
    ///
    /// See [`VersionCatalog::list_versions`].
    pub fn list_versions(&self, url: Option<&str>) -> Result<Vec<String>, NetBeansError> {
        VersionCatalog::new(&self.fetcher).list_versions(url.unwrap_or(&self.catalog_url))
    }

    /// Lists the configured catalog and returns its highest version.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::list_versions`], plus
    /// [`NetBeansError::EmptyInput`] when the catalog lists nothing.
    pub fn latest_version(&self) -> Result<String, NetBeansError> {
        version::pick_latest(self.list_versions(None)?)
    }

    /// Downloads the installer for `version` into `dest_dir`, or into the
    /// system temporary directory.
    ///
    /// # Errors
    ///
    /// See [`VersionCatalog::download_installer`].
    pub fn download_installer(
        &self,
        version: &str,
        features: Option<&str>,
        dest_dir: Option<&Path>,
    ) -> Result<PathBuf, NetBeansError> {
        let dest = dest_dir.map_or_else(std::env::temp_dir, Path::to_path_buf);
        VersionCatalog::new(&self.fetcher).download_installer(
            version,
            features,
            &self.catalog_url,
            &dest,
        )
    }
}

impl<R, X, F, P> NetBeansManager<R, X, F, P>
where
    X: ArchiveExtractor,
{
    /// Locates the installation of `version` under `root`, or under the
    /// configured search root.
    ///
    /// # Errors
    ///
    /// See [`InstallationLocator::find_installation`].
    pub fn find_installation(
        &self,
        version: &str,
        root: Option<&Path>,
    ) -> Result<ResolvedInstallation, NetBeansError> {
        self.locator.find_installation(version, self.root(root))
    }
}

impl<R, X, F, P> NetBeansManager<R, X, F, P>
where
    R: ProcessRunner,
    X: ArchiveExtractor,
{
    /// Lists every module of the installation of `version`.
    ///
    /// # Errors
    ///
    /// See [`PluginInventory::list_plugins`].
    pub fn list_plugins(
        &self,
        version: &str,
        root: Option<&Path>,
    ) -> Result<Vec<PluginRecord>, NetBeansError> {
        PluginInventory::new(&self.locator, &self.runner).list_plugins(version, self.root(root))
    }

    /// Resolves the state of `plugin` in the installation of `version`.
    ///
    /// # Errors
    ///
    /// See [`PluginInventory::find_plugin`].
    pub fn find_plugin(
        &self,
        plugin: &str,
        version: &str,
        root: Option<&Path>,
    ) -> Result<PluginStatus, NetBeansError> {
        PluginInventory::new(&self.locator, &self.runner).find_plugin(
            plugin,
            version,
            self.root(root),
        )
    }
}

impl<R, X, F, P> NetBeansManager<R, X, F, P>
where
    R: ProcessRunner,
    X: ArchiveExtractor,
    P: ProcessTable,
{
    fn controller(&self) -> ProcessController<'_, X, R, P> {
        ProcessController::new(&self.locator, &self.runner, &self.table)
    }

    /// Runs the launcher of `version`.
    ///
    /// # Errors
    ///
    /// See [`ProcessController::run`].
    pub fn run(
        &self,
        version: &str,
        args: &[String],
        options: RunOptions,
        root: Option<&Path>,
    ) -> Result<RunOutcome, NetBeansError> {
        self.controller()
            .run(version, args, options, self.root(root))
    }

    /// Terminates the running processes of `version`.
    ///
    /// # Errors
    ///
    /// See [`ProcessController::stop`].
    pub fn stop(&self, version: &str, root: Option<&Path>) -> Result<StopReport, NetBeansError> {
        self.controller().stop(version, self.root(root))
    }
}
