//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/lineage/lineage.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `LINEAGE_*` prefix, `__` as section separator
//!    (e.g. `LINEAGE_TRAVERSAL__TYPE=depth-first`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::TraversalOptions;

/// Unified configuration for lineage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Defaults for ancestor/descendant queries
    pub traversal: TraversalOptions,
}

/// Get the XDG config directory for lineage.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lineage").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("lineage.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            debug!("global config: {}", global_path.display());
            builder = builder.add_source(File::from(global_path).required(false));
        }

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("LINEAGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    /// Load a single TOML file over the compiled defaults.
    #[instrument(level = "debug")]
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()
            .and_then(Config::try_deserialize::<Settings>)
            .map_err(config_err)
    }

    /// Render as TOML, as shown by `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Order;

    #[test]
    fn given_defaults_when_rendering_then_breadth_first_inclusive() {
        let settings = Settings::default();
        assert_eq!(settings.traversal.order, Order::BreadthFirst);
        assert!(!settings.traversal.exclude_self);

        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("type = \"breadth-first\""), "{rendered}");
        assert!(rendered.contains("exclude-self = false"), "{rendered}");
    }
}
