//! Layered configuration loading.
//!
//! Precedence, lowest to highest: built-in defaults, the XDG config file
//! (`~/.config/quantizer/config.toml`), a project-local `quantizer.toml`
//! or `.quantizer.toml`, and finally an explicit `--config` path.

use super::file_config::FileConfig;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the merged configuration, optionally forcing one file on top
    pub fn load(explicit: Option<&Path>) -> FileConfig {
        let mut figment = Figment::from(Serialized::defaults(FileConfig::default()));

        if let Some(path) = Self::xdg_config_path() {
            if path.exists() {
                debug!("Merging config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        for name in ["quantizer.toml", ".quantizer.toml"] {
            let path = PathBuf::from(name);
            if path.exists() {
                debug!("Merging project config {}", name);
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                warn!("Config parse failed, falling back to defaults: {}", e);
                FileConfig::default()
            }
        }
    }

    fn xdg_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("quantizer").join("config.toml"))
    }
}
