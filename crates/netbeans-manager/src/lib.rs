//! Locating, inspecting and driving NetBeans IDE installations.
//!
//! The crate answers four questions for an orchestrator: which releases are
//! published ([`catalog`]), where a given release is installed
//! ([`locator`]), which plugins an installation carries and in what state
//! ([`inventory`]), and how to launch or stop it ([`control`]).
//!
//! Every interaction with the host goes through a collaborator trait in
//! [`host`]: running commands, unpacking archives, fetching URLs and
//! signalling processes. [`NetBeansManager`] owns one of each and exposes
//! the operations with per-call defaults. [`Capabilities::probe`] tells the
//! caller whether the host can support the manager at all.
//!
//! # Example
//!
//! ```rust,no_run
//! use netbeans_config::Config;
//! use netbeans_manager::{Capabilities, NetBeansManager, PluginState};
//!
//! Capabilities::probe().ensure()?;
//! let manager = NetBeansManager::system(&Config::default());
//! let status = manager.find_plugin("org.netbeans.modules.php", "8.2", None)?;
//! if status.state == PluginState::Update {
//!     println!("upgrade available");
//! }
//! # Ok::<(), netbeans_manager::NetBeansError>(())
//! ```

pub mod capability;
pub mod catalog;
pub mod control;
pub mod error;
pub mod host;
pub mod inventory;
pub mod layout;
pub mod locator;
pub mod manager;
pub mod version;

#[cfg(test)]
mod tests;

pub use self::capability::Capabilities;
pub use self::catalog::VersionCatalog;
pub use self::control::{ProcessController, RunOptions, RunOutcome, StopFailure, StopReport};
pub use self::error::NetBeansError;
pub use self::inventory::{PluginInventory, PluginRecord, PluginState, PluginStatus, Upgrade};
pub use self::layout::ResolvedInstallation;
pub use self::locator::{InstallationCandidate, InstallationLocator};
pub use self::manager::{NetBeansManager, SystemManager};
pub use self::version::{Version, pick_latest};
