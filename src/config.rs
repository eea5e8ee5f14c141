//! Server Configuration
//!
//! Loaded from a TOML file; every field has a default.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::location::LocationCorrections;
use crate::lookup::BuildOptions;
use crate::vendor::overrides::VendorOverrides;
use crate::vendor::resolver::{DEFAULT_NEST_HANDLER_SLOTS, ResolverLimits};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Game-data export directory (`sheets/`, `layers/`)
    pub data_dir: PathBuf,
    pub bind: SocketAddr,
    /// Interval between data source readiness checks
    pub poll_interval_ms: u64,
    /// CustomTalk nest-handler slots paged per dialogue
    pub nest_handler_slots: u32,
    /// Inclusive `[first, last]` SpecialShop ids accepted from dialogue script
    /// arguments. Derived from the SpecialShop sheet when unset.
    pub special_shop_id_range: Option<[u32; 2]>,
    /// Replaces the built-in vendor override table
    pub overrides_file: Option<PathBuf>,
    /// Replaces the built-in location correction table
    pub corrections_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/export"),
            bind: SocketAddr::from(([0, 0, 0, 0], 2567)),
            poll_interval_ms: 500,
            nest_handler_slots: DEFAULT_NEST_HANDLER_SLOTS,
            special_shop_id_range: None,
            overrides_file: None,
            corrections_file: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            warn!("Config file does not exist: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        let config: Self = toml::from_str(&contents).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn limits(&self) -> ResolverLimits {
        ResolverLimits {
            nest_handler_slots: self.nest_handler_slots,
            special_shop_ids: self.special_shop_id_range.map(|[first, last]| first..=last),
        }
    }

    /// Build options with the configured tables, or the built-in ones
    pub fn build_options(&self) -> Result<BuildOptions, String> {
        let overrides = match &self.overrides_file {
            Some(path) => VendorOverrides::load_from_file(path)?,
            None => VendorOverrides::builtin()?,
        };
        let corrections = match &self.corrections_file {
            Some(path) => LocationCorrections::load_from_file(path)?,
            None => LocationCorrections::builtin()?,
        };

        Ok(BuildOptions {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            limits: self.limits(),
            overrides,
            corrections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig::load(&temp_dir.path().join("missing.toml")).unwrap();

        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.nest_handler_slots, 31);
        assert_eq!(config.limits().special_shop_ids, None);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/export\"\nbind = \"127.0.0.1:8080\"\nspecial_shop_id_range = [1769472, 1770999]\n",
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/export"));
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.limits().special_shop_ids, Some(1769472..=1770999));
    }

    #[test]
    fn test_build_options_from_table_files() {
        let temp_dir = TempDir::new().unwrap();
        let overrides = temp_dir.path().join("overrides.toml");
        std::fs::write(&overrides, "[[vendor]]\nnpc = 7\ngil_shops = [262144]\n").unwrap();

        let config = ServerConfig {
            overrides_file: Some(overrides),
            poll_interval_ms: 50,
            ..Default::default()
        };
        let options = config.build_options().unwrap();

        assert_eq!(options.poll_interval, Duration::from_millis(50));
        assert_eq!(options.overrides.len(), 1);
        assert!(options.corrections.len() > 100);

        let broken = ServerConfig {
            corrections_file: Some(temp_dir.path().join("missing.toml")),
            ..Default::default()
        };
        assert!(broken.build_options().is_err());
    }
}
