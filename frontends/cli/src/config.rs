use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use pgtree::DEFAULT_CTE_NAME;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "PGTREE_CONFIG";

/// Settings read from `config.yaml`. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CTE that rewritten queries are moved into
    pub cte_name: String,
    /// Column that receives the row count
    pub count_column: String,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cte_name: DEFAULT_CTE_NAME.to_string(),
            count_column: "row_count".to_string(),
            pretty: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e)
        })?;

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config YAML {}: {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Resolve and load the configuration.
    ///
    /// An explicit path wins, then `PGTREE_CONFIG`, then
    /// `~/.config/pgtree/config.yaml` if it exists. Explicitly named files must
    /// exist.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::resolve_from(explicit, env_path.as_deref(), default_config_path().as_deref())
    }

    fn resolve_from(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        default_path: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = explicit.or(from_env) {
            tracing::debug!(path = %path.display(), "Loading config");
            return Self::load_from_file(path);
        }
        match default_path {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading default config");
                Self::load_from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `~/.config/pgtree/config.yaml`
fn default_config_path() -> Option<PathBuf> {
    let mut path = PathBuf::from(std::env::var_os("HOME")?);
    path.push(".config");
    path.push("pgtree");
    path.push("config.yaml");
    Some(path)
}
