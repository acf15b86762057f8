//! XDG path resolution for acu configuration and data directories.

use anyhow::Result;
use std::path::PathBuf;

use super::types::Config;

impl Config {
    /// Returns the platform-specific configuration directory for acu.
    ///
    /// Returns `~/.config/acu/` on Linux (`XDG_CONFIG_HOME/acu`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the platform-specific data directory for acu.
    ///
    /// Returns `~/.local/share/acu/` on Linux (`XDG_DATA_HOME/acu`).
    /// Holds the optimization history.
    pub fn data_dir() -> Result<PathBuf> {
        let dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the full path to the acu configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(crate::constants::CONFIG_FILENAME))
    }

    /// Returns the full path to the history file.
    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(crate::constants::HISTORY_FILENAME))
    }
}
