//! Session configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base filename for autosave snapshots. `/tmp` is assumed to be
/// persistent between application restarts within one boot.
pub const DEFAULT_BASE_FILENAME: &str = "/tmp/FaCurrentSession.tmp";

/// Recognized session options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Whether every queue mutation writes a snapshot file.
    pub autosave_enabled: bool,

    /// Path prefix for autosave snapshot files.
    #[serde(rename = "autosave_base_filename")]
    pub base_filename: PathBuf,

    /// How many autosave snapshots to keep live.
    #[serde(rename = "autosave_retain_count")]
    pub retain_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave_enabled: false,
            base_filename: PathBuf::from(DEFAULT_BASE_FILENAME),
            retain_count: 2,
        }
    }
}
