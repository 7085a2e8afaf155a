//! Error types for the CLI runtime.

use std::io;

use netbeans_config::ConfigError;
use netbeans_manager::NetBeansError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    Configuration(#[from] ConfigError),
    #[error("{0}")]
    Telemetry(#[from] TelemetryError),
    #[error("{0}")]
    Manager(#[from] NetBeansError),
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] io::Error),
}
