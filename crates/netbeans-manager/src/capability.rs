//! Host capability probe.
//!
//! The manager only works on Linux hosts with the JDK's `jar` tool on
//! `PATH`. Callers probe once at startup and decide whether to expose the
//! manager at all; nothing is checked implicitly.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::NetBeansError;
use crate::host::system::JAR_PROGRAM;

const CAPABILITY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::capability");

/// What the host offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    platform_supported: bool,
    archive_tool: Option<PathBuf>,
}

impl Capabilities {
    /// Probes the running host.
    #[must_use]
    pub fn probe() -> Self {
        let archive_tool = which::which(JAR_PROGRAM).ok();
        let capabilities = Self::new(cfg!(target_os = "linux"), archive_tool);
        debug!(
            target: CAPABILITY_TARGET,
            platform_supported = capabilities.platform_supported,
            archive_tool = ?capabilities.archive_tool,
            "probed host capabilities"
        );
        capabilities
    }

    /// Builds a capability set from known facts.
    #[must_use]
    pub const fn new(platform_supported: bool, archive_tool: Option<PathBuf>) -> Self {
        Self {
            platform_supported,
            archive_tool,
        }
    }

    /// Whether the operating system is supported.
    #[must_use]
    pub const fn platform_supported(&self) -> bool {
        self.platform_supported
    }

    /// Resolved path of the archive tool, when present.
    #[must_use]
    pub fn archive_tool(&self) -> Option<&Path> {
        self.archive_tool.as_deref()
    }

    /// Whether every requirement is met.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.platform_supported && self.archive_tool.is_some()
    }

    /// Fails when a requirement is missing.
    ///
    /// # Errors
    ///
    /// Returns [`NetBeansError::Unsupported`] naming the first missing
    /// requirement.
    pub fn ensure(&self) -> Result<(), NetBeansError> {
        if !self.platform_supported {
            return Err(NetBeansError::Unsupported {
                reason: format!("{} is not a supported platform", std::env::consts::OS),
            });
        }
        if self.archive_tool.is_none() {
            return Err(NetBeansError::Unsupported {
                reason: format!("'{JAR_PROGRAM}' was not found on PATH"),
            });
        }
        Ok(())
    }
}
