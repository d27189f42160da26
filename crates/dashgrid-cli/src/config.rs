//! On-disk configuration: the default layout and the module catalog.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use dashgrid_layout::{LayoutDefaults, ModuleKey, Slot};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Contents of a `dashgrid.json` config file. Missing fields keep the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashgridConfig {
    /// Layout shown when nothing usable is stored.
    pub default_layout: Vec<Slot>,
    /// Every module a user may add.
    pub catalog: Vec<ModuleKey>,
}

impl Default for DashgridConfig {
    fn default() -> Self {
        let LayoutDefaults {
            default_layout,
            catalog,
        } = LayoutDefaults::default();
        Self {
            default_layout,
            catalog,
        }
    }
}

impl DashgridConfig {
    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(error) => return Err(error.into()),
        };
        serde_json::from_str(&raw).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Look up `name` in the catalog.
    pub fn resolve_module(&self, name: &str) -> Result<ModuleKey> {
        self.catalog
            .iter()
            .find(|key| key.as_str() == name)
            .cloned()
            .ok_or_else(|| CliError::UnknownModule {
                name: name.to_string(),
                known: self
                    .catalog
                    .iter()
                    .map(ModuleKey::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl From<DashgridConfig> for LayoutDefaults {
    fn from(config: DashgridConfig) -> Self {
        LayoutDefaults::new(config.default_layout, config.catalog)
    }
}
