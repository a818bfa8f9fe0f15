//! Overlay settings loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use altar_mods::ModCatalog;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::weights::TierTable;

/// Altar settings, loaded from altar.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltarConfig {
    /// How long cached validity/weights stay fresh
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Catalog file (relative to the config file); built-in catalog when unset
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Tier overrides, keyed by `Target|id` or a bare id
    #[serde(default)]
    pub weights: BTreeMap<String, i32>,

    /// Optional decision gates
    #[serde(default)]
    pub decision: DecisionConfig,
}

/// Opt-in decision gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Disqualify sides whose upside weight is below `min_weight_threshold`
    pub min_weight_threshold_enabled: bool,

    #[serde(default = "default_min_weight_threshold")]
    pub min_weight_threshold: i32,

    /// Let the other side win when one side's upside weight is at most
    /// `unvaluable_upside_threshold`
    pub unvaluable_upside_enabled: bool,

    #[serde(default = "default_unvaluable_upside_threshold")]
    pub unvaluable_upside_threshold: i32,
}

fn default_cache_ttl_ms() -> u64 {
    1000
}
fn default_min_weight_threshold() -> i32 {
    15
}
fn default_unvaluable_upside_threshold() -> i32 {
    1
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            min_weight_threshold_enabled: false,
            min_weight_threshold: default_min_weight_threshold(),
            unvaluable_upside_enabled: false,
            unvaluable_upside_threshold: default_unvaluable_upside_threshold(),
        }
    }
}

impl Default for AltarConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: default_cache_ttl_ms(),
            catalog: None,
            weights: BTreeMap::new(),
            decision: DecisionConfig::default(),
        }
    }
}

impl AltarConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        if let (Some(catalog), Some(dir)) = (config.catalog.as_mut(), path.parent()) {
            if catalog.is_relative() {
                *catalog = dir.join(&*catalog);
            }
        }
        Ok(config)
    }

    /// Load from a directory (looks for altar.yaml), falling back to defaults
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join("altar.yaml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// The configured catalog, or the built-in one
    pub fn load_catalog(&self) -> Result<ModCatalog> {
        match &self.catalog {
            Some(path) => ModCatalog::load(path),
            None => Ok(ModCatalog::builtin()),
        }
    }

    /// Catalog default tiers overlaid with the configured overrides
    pub fn tier_table(&self, catalog: &ModCatalog) -> TierTable {
        TierTable::from_catalog(catalog).with_overrides(&self.weights)
    }
}
