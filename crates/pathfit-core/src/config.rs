//! pathfit configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::builtin_catalog;
use crate::model::Catalog;
use crate::parser::{parse_catalog, validate_catalog};
use crate::recommend::{NarrativeRules, DEFAULT_IMPROVEMENT_THRESHOLD, DEFAULT_STRENGTH_THRESHOLD};

/// Top-level pathfit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathfitConfig {
    /// TOML catalog to score against; the built-in catalog when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Output directory for saved reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Max concurrent sessions in batch scoring.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Facet percentage at or above which a strength is reported.
    #[serde(default = "default_strength_threshold")]
    pub strength_threshold: f64,
    /// Facet percentage below which an improvement is reported.
    #[serde(default = "default_improvement_threshold")]
    pub improvement_threshold: f64,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./pathfit-results")
}
fn default_parallelism() -> usize {
    4
}
fn default_strength_threshold() -> f64 {
    DEFAULT_STRENGTH_THRESHOLD
}
fn default_improvement_threshold() -> f64 {
    DEFAULT_IMPROVEMENT_THRESHOLD
}

impl Default for PathfitConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            output_dir: default_output_dir(),
            parallelism: default_parallelism(),
            strength_threshold: default_strength_threshold(),
            improvement_threshold: default_improvement_threshold(),
        }
    }
}

impl PathfitConfig {
    /// Narrative rules using the configured thresholds.
    pub fn narrative_rules(&self) -> NarrativeRules {
        NarrativeRules::with_thresholds(self.strength_threshold, self.improvement_threshold)
    }

    /// Load the catalog named by `override_path`, else the configured one,
    /// else the built-in catalog.
    ///
    /// Validation warnings are logged; scoring still proceeds.
    pub fn load_catalog(&self, override_path: Option<&Path>) -> Result<Catalog> {
        let catalog = match override_path.or(self.catalog.as_deref()) {
            Some(path) => parse_catalog(path)?,
            None => return Ok(builtin_catalog()),
        };
        for warning in validate_catalog(&catalog) {
            match &warning.question_id {
                Some(id) => tracing::warn!("catalog '{}': {}: {}", catalog.id, id, warning.message),
                None => tracing::warn!("catalog '{}': {}", catalog.id, warning.message),
            }
        }
        Ok(catalog)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `pathfit.toml` in the current directory
/// 2. `~/.config/pathfit/config.toml`
///
/// Environment variable override: `PATHFIT_CATALOG`.
pub fn load_config() -> Result<PathfitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PathfitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("pathfit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<PathfitConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => PathfitConfig::default(),
    };

    if let Ok(catalog) = std::env::var("PATHFIT_CATALOG") {
        if !catalog.is_empty() {
            config.catalog = Some(PathBuf::from(catalog));
        }
    }

    config.catalog = config.catalog.as_deref().map(resolve_path);
    config.output_dir = resolve_path(&config.output_dir);

    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("pathfit"))
}
