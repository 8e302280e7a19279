//! Run configuration.
//!
//! Loaded once from the credentials file (`apikey.json`) and handed to each
//! provider at construction. Only `steam_api_key` and `user_id` are required:
//!
//! ```json
//! {
//!     "steam_api_key": "XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX",
//!     "user_id": "76561197960287930",
//!     "timeout_secs": 10,
//!     "output_path": "steam_library.csv"
//! }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LibraryStatsError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "apikey.json";

/// `EnvFilter` directive used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "steam_library_stats=info";

fn default_timeout_secs() -> u64 {
    10
}

fn default_output_path() -> PathBuf {
    PathBuf::from("steam_library.csv")
}

/// Base URLs of the remote services
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub steam_api: String,
    pub steam_store: String,
    pub howlongtobeat: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            steam_api: "https://api.steampowered.com".to_string(),
            steam_store: "https://store.steampowered.com".to_string(),
            howlongtobeat: "https://howlongtobeat.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub steam_api_key: String,

    /// SteamID64 of the profile whose library is exported
    pub user_id: String,

    /// Per-request timeout for every external call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LibraryStatsError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.steam_api_key.trim().is_empty() {
            return Err(LibraryStatsError::Config("steam_api_key is empty".to_string()));
        }
        if self.user_id.trim().is_empty() {
            return Err(LibraryStatsError::Config("user_id is empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(LibraryStatsError::Config(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
