//! Shared configuration for the NetBeans installation manager.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then a
//! TOML file (`--config-path` or `NETBEANS_CONFIG_PATH`), then `NETBEANS_*`
//! environment variables, then command-line flags. Every field is optional
//! on disk; accessors apply the defaults from [`defaults`] so callers never
//! see an unset value.

use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_CATALOG_URL, DEFAULT_LOG_FILTER, DEFAULT_SEARCH_ROOT, default_catalog_url,
    default_log_filter, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the CLI and library callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "NETBEANS")]
pub struct Config {
    /// Root of the tree scanned for installations.
    pub search_root: Option<Utf8PathBuf>,
    /// Directory listing that publishes the released versions.
    pub catalog_url: Option<String>,
    /// Parent directory for temporary archive extraction.
    pub scratch_dir: Option<Utf8PathBuf>,
    /// Visit directories in file-name order instead of filesystem order.
    pub sorted_scan: Option<bool>,
    /// Tracing filter expression applied by the binaries.
    pub log_filter: Option<String>,
    /// Output format for log records.
    pub log_format: Option<LogFormat>,
}

impl Config {
    /// Loads configuration from every supported layer, reading command-line
    /// flags from `args` (program name first), then validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when any layer fails to parse, or the
    /// error of [`Config::validate`].
    pub fn load_validated_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = Self::load_from_iter(args).map_err(ConfigError::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that every layer accepted syntactically but that the
    /// manager cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCatalogUrl`] when the catalog URL does
    /// not parse, or [`ConfigError::RelativeSearchRoot`] when the search root
    /// is not absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(raw) = self.catalog_url.as_deref() {
            Url::parse(raw).map_err(|source| ConfigError::InvalidCatalogUrl {
                url: raw.to_owned(),
                source,
            })?;
        }
        match self.search_root.as_deref() {
            Some(root) if root.is_relative() => Err(ConfigError::RelativeSearchRoot {
                path: root.to_owned(),
            }),
            _ => Ok(()),
        }
    }

    /// Root of the tree scanned for installations.
    #[must_use]
    pub fn search_root(&self) -> &Path {
        self.search_root
            .as_deref()
            .unwrap_or_else(|| Utf8Path::new(DEFAULT_SEARCH_ROOT))
            .as_std_path()
    }

    /// Release catalog URL.
    #[must_use]
    pub fn catalog_url(&self) -> &str {
        self.catalog_url.as_deref().unwrap_or(DEFAULT_CATALOG_URL)
    }

    /// Parent directory for temporary extraction, when one is configured.
    #[must_use]
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch_dir.as_deref().map(Utf8Path::as_std_path)
    }

    /// Whether the installation scan visits directories in sorted order.
    #[must_use]
    pub fn sorted_scan(&self) -> bool {
        self.sorted_scan.unwrap_or(false)
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Output format for log records.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(default_log_format)
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more configuration layers failed to load.
    #[error("failed to load configuration: {0}")]
    Load(#[source] Arc<OrthoError>),
    /// The catalog URL is not a valid absolute URL.
    #[error("catalog url '{url}' is invalid: {source}")]
    InvalidCatalogUrl {
        /// Offending value.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The search root must be absolute so scans do not depend on the cwd.
    #[error("search root '{path}' must be an absolute path")]
    RelativeSearchRoot {
        /// Offending value.
        path: Utf8PathBuf,
    },
}
