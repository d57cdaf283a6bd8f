//! Manager configuration
//!
//! Passed explicitly at construction. Every field has a default, so a JSON
//! document only needs to name what it overrides.

use biosconf_api::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default persistence directory
pub const DEFAULT_PERSIST_DIR: &str = "/var/lib/bios-settings-manager";
/// Default persisted file name
pub const DEFAULT_PERSIST_FILE: &str = "biosData";
/// Default object path of the manager
pub const DEFAULT_OBJECT_PATH: &str = "/xyz/openbmc_project/bios_config/manager";
/// Default path prefix under which boot options are exposed
pub const DEFAULT_BOOT_OPTIONS_PATH: &str = "/xyz/openbmc_project/bios_config/bootOptions";

/// What writing the boot order does to the pending boot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootOrderPolicy {
    /// The pending order becomes a copy of the new order
    CopyToPending,
    /// The pending order is emptied
    ClearPending,
}

impl Default for BootOrderPolicy {
    fn default() -> Self {
        if cfg!(feature = "clear-pending-boot-order") {
            Self::ClearPending
        } else {
            Self::CopyToPending
        }
    }
}

/// Manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Directory holding the persisted file; created by the host
    pub persist_dir: PathBuf,
    /// Persisted file name
    pub persist_file: String,
    /// Object path reported with property change events
    pub object_path: String,
    /// Path prefix for exposed boot options
    pub boot_options_path: String,
    /// Boot order write side effect
    pub boot_order_policy: BootOrderPolicy,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            persist_dir: PathBuf::from(DEFAULT_PERSIST_DIR),
            persist_file: DEFAULT_PERSIST_FILE.to_string(),
            object_path: DEFAULT_OBJECT_PATH.to_string(),
            boot_options_path: DEFAULT_BOOT_OPTIONS_PATH.to_string(),
            boot_order_policy: BootOrderPolicy::default(),
        }
    }
}

impl ManagerConfig {
    /// Default configuration persisting into `dir`
    pub fn with_persist_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            persist_dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn with_boot_order_policy(mut self, policy: BootOrderPolicy) -> Self {
        self.boot_order_policy = policy;
        self
    }

    /// Full path of the persisted file
    pub fn persist_path(&self) -> PathBuf {
        self.persist_dir.join(&self.persist_file)
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidArgument(format!("Malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        log::debug!("Loading manager configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.persist_file.is_empty() {
            return Err(Error::InvalidArgument("persist_file must not be empty".to_string()));
        }
        if !self.boot_options_path.starts_with('/') {
            return Err(Error::InvalidArgument(format!(
                "boot_options_path {} is not absolute",
                self.boot_options_path
            )));
        }
        Ok(())
    }
}
