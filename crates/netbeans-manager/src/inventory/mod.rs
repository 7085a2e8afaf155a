//! Plugin enumeration and state classification.
//!
//! The launcher lists its modules when started with
//! `--locale en --nogui --modules --list`. Its output is free text with no
//! stability guarantee, so parsing lives in [`parse_listing`] and
//! classification in [`classify`]. Neither can fail: lines that do not fit
//! the grammar are dropped and unrecognised states become
//! [`PluginState::Unknown`].

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{NetBeansError, process_error};
use crate::host::{ArchiveExtractor, CommandLine, ProcessRunner};
use crate::locator::InstallationLocator;

/// Tracing target for plugin enumeration.
const INVENTORY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::inventory");

/// Arguments that make the launcher print its module table and exit.
pub const LIST_MODULES_ARGS: [&str; 5] = ["--locale", "en", "--nogui", "--modules", "--list"];

const UPGRADE_PREFIX: &str = "upgrade to ";

/// Lifecycle state of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginState {
    /// Installed and active.
    Enabled,
    /// Installed but not active.
    Installed,
    /// Installed with a newer version available.
    Update,
    /// Offered by an update centre but not installed.
    Available,
    /// Listed, but the state text was not recognised.
    Unknown,
}

impl PluginState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Installed => "installed",
            Self::Update => "update",
            Self::Available => "available",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a pending plugin upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upgrade {
    /// Version the plugin can be upgraded to.
    pub target: String,
    /// Any text following the target version, lower-cased.
    pub detail: String,
}

/// Result of classifying a raw state string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Classified state.
    pub state: PluginState,
    /// Upgrade details; present only for [`PluginState::Update`].
    pub upgrade: Option<Upgrade>,
}

/// Classifies a raw state string. Total: every input yields a state.
///
/// # Example
///
/// ```
/// use netbeans_manager::inventory::{PluginState, classify};
///
/// let upgrade = classify("Upgrade to 15.0 (critical)");
/// assert_eq!(upgrade.state, PluginState::Update);
/// let target = upgrade.upgrade.unwrap();
/// assert_eq!((target.target.as_str(), target.detail.as_str()), ("15.0", "(critical)"));
///
/// assert_eq!(classify("Enabled").state, PluginState::Enabled);
/// assert_eq!(classify("pending restart").state, PluginState::Unknown);
/// ```
#[must_use]
pub fn classify(raw: &str) -> Classification {
    let normalised = raw.trim().to_lowercase();
    if let Some(payload) = normalised.strip_prefix(UPGRADE_PREFIX) {
        let remainder = payload.trim();
        let (target, detail) = remainder
            .split_once(char::is_whitespace)
            .unwrap_or((remainder, ""));
        return Classification {
            state: PluginState::Update,
            upgrade: Some(Upgrade {
                target: target.to_owned(),
                detail: detail.trim().to_owned(),
            }),
        };
    }
    let state = match normalised.as_str() {
        "available" => PluginState::Available,
        "enabled" => PluginState::Enabled,
        "installed" => PluginState::Installed,
        _ => PluginState::Unknown,
    };
    Classification {
        state,
        upgrade: None,
    }
}

/// One row of the module table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRecord {
    /// Module code name.
    pub name: String,
    /// Installed (or offered) version as printed.
    pub version: String,
    /// State text as printed, inner whitespace preserved.
    pub raw_state: String,
}

impl PluginRecord {
    /// Classifies this record's state text.
    #[must_use]
    pub fn classify(&self) -> Classification {
        classify(&self.raw_state)
    }
}

/// A plugin's resolved state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginStatus {
    /// Module code name.
    pub name: String,
    /// Version field of the module table row.
    pub version: String,
    /// Classified state.
    pub state: PluginState,
    /// Upgrade details; present only for [`PluginState::Update`].
    pub upgrade: Option<Upgrade>,
}

impl From<&PluginRecord> for PluginStatus {
    fn from(record: &PluginRecord) -> Self {
        let Classification { state, upgrade } = record.classify();
        Self {
            name: record.name.clone(),
            version: record.version.clone(),
            state,
            upgrade,
        }
    }
}

/// Parses the launcher's module table.
///
/// Grammar: trailing whitespace is stripped and the output is split on
/// `\n`; the first two lines (title and column rule) and the last line
/// (footer) are discarded. Each remaining line holds three fields
/// separated by runs of whitespace: name, version, and the state text,
/// which keeps any internal whitespace. Lines with fewer than three fields
/// are dropped.
///
/// `output` is the launcher's standard output only. The launcher prints the
/// table there; its standard error carries JVM diagnostics and is logged by
/// the runner instead of being merged into the table.
///
/// # Example
///
/// ```
/// use netbeans_manager::inventory::parse_listing;
///
/// let records = parse_listing("Code Name Version State\n---\nalpha 1.0 enabled\nTotal 1 module\n");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].name, "alpha");
/// ```
#[must_use]
pub fn parse_listing(output: &str) -> Vec<PluginRecord> {
    let lines: Vec<&str> = output.trim_end().split('\n').collect();
    let body = lines
        .get(2..lines.len().saturating_sub(1))
        .unwrap_or_default();
    body.iter().filter_map(|line| parse_row(line)).collect()
}

fn parse_row(line: &str) -> Option<PluginRecord> {
    let (name, rest) = line.trim_start().split_once(char::is_whitespace)?;
    let (version, tail) = rest.trim_start().split_once(char::is_whitespace)?;
    let state = tail.trim_start();
    if state.trim_end().is_empty() {
        return None;
    }
    Some(PluginRecord {
        name: name.to_owned(),
        version: version.to_owned(),
        raw_state: state.to_owned(),
    })
}

/// Queries an installation's plugins.
#[derive(Debug)]
pub struct PluginInventory<'a, X, R> {
    locator: &'a InstallationLocator<X>,
    runner: &'a R,
}

impl<'a, X, R> PluginInventory<'a, X, R> {
    /// Creates an inventory resolving installations with `locator` and
    /// invoking launchers with `runner`.
    #[must_use]
    pub const fn new(locator: &'a InstallationLocator<X>, runner: &'a R) -> Self {
        Self { locator, runner }
    }
}

impl<X: ArchiveExtractor, R: ProcessRunner> PluginInventory<'_, X, R> {
    /// Lists every module the installation of `version` reports.
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::NoInstallationFound`] when the installation
    /// cannot be located, or [`NetBeansError::Process`] when the launcher
    /// cannot be started.
    pub fn list_plugins(
        &self,
        version: &str,
        root: &Path,
    ) -> Result<Vec<PluginRecord>, NetBeansError> {
        let installation = self.locator.find_installation(version, root)?;
        let command = CommandLine::new(installation.executable()).args(LIST_MODULES_ARGS);
        let output = self
            .runner
            .output(&command)
            .map_err(|err| process_error(&command, err))?;
        let records = parse_listing(&output);
        debug!(
            target: INVENTORY_TARGET,
            version,
            modules = records.len(),
            "parsed module listing"
        );
        Ok(records)
    }

    /// Finds `plugin` in the installation of `version` and classifies it.
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::NoPluginFound`] when the listing has no row
    /// named `plugin`, plus every error of [`Self::list_plugins`].
    pub fn find_plugin(
        &self,
        plugin: &str,
        version: &str,
        root: &Path,
    ) -> Result<PluginStatus, NetBeansError> {
        self.list_plugins(version, root)?
            .iter()
            .find(|record| record.name == plugin)
            .map(PluginStatus::from)
            .ok_or_else(|| NetBeansError::NoPluginFound {
                plugin: plugin.to_owned(),
                version: version.to_owned(),
            })
    }
}
