use crate::error::{ConfigError, Result};
use browse_protocol::BrowseOptionId;
use browse_shelf_key::ShelvingAlgorithm;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Built-in options every tenant starts with.
const SYSTEM_DEFAULTS: [(&str, ShelvingAlgorithm); 6] = [
    (BrowseOptionId::ALL, ShelvingAlgorithm::Generic),
    ("LC", ShelvingAlgorithm::Lc),
    ("DEWEY", ShelvingAlgorithm::Dewey),
    ("NLM", ShelvingAlgorithm::Nlm),
    ("SUDOC", ShelvingAlgorithm::Sudoc),
    ("OTHER", ShelvingAlgorithm::Local),
];

/// A named browse option: which shelving algorithm orders it and which
/// classification types belong to it (empty = every type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrowseConfig {
    pub id: BrowseOptionId,
    pub shelving_algorithm: ShelvingAlgorithm,
    #[serde(default)]
    pub type_ids: BTreeSet<String>,
}

impl BrowseConfig {
    pub fn new(id: BrowseOptionId, shelving_algorithm: ShelvingAlgorithm) -> Self {
        Self {
            id,
            shelving_algorithm,
            type_ids: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_type_ids<I, S>(mut self, type_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_ids = type_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn system_default(id: &BrowseOptionId) -> Option<Self> {
        SYSTEM_DEFAULTS
            .iter()
            .find(|(name, _)| *name == id.as_str())
            .map(|(_, algorithm)| Self::new(id.clone(), *algorithm))
    }

    pub fn system_defaults() -> Vec<Self> {
        SYSTEM_DEFAULTS
            .iter()
            .map(|(name, algorithm)| Self::new(BrowseOptionId::new(name), *algorithm))
            .collect()
    }

    /// Whether results must be narrowed to `type_ids`.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        !self.id.is_all() && !self.type_ids.is_empty()
    }

    #[must_use]
    pub fn accepts_type(&self, type_id: &str) -> bool {
        self.type_ids.is_empty() || self.type_ids.contains(type_id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "browse option id must not be empty".to_string(),
            ));
        }
        if self.id.is_all() && self.shelving_algorithm != ShelvingAlgorithm::Generic {
            return Err(ConfigError::InvalidConfig(format!(
                "option ALL must use GENERIC shelving, got {}",
                self.shelving_algorithm
            )));
        }
        if self.type_ids.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidConfig(format!(
                "option {} has a blank type id",
                self.id
            )));
        }
        Ok(())
    }
}

/// Tenant-level feature toggles that influence browse post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum FeatureFlag {
    #[serde(rename = "browse.cn.intermediate.values")]
    IntermediateValues,
    #[serde(rename = "browse.cn.intermediate.remove.duplicates")]
    RemoveDuplicates,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 2] = [Self::IntermediateValues, Self::RemoveDuplicates];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::IntermediateValues => "browse.cn.intermediate.values",
            Self::RemoveDuplicates => "browse.cn.intermediate.remove.duplicates",
        }
    }

    #[must_use]
    pub const fn default_enabled(self) -> bool {
        match self {
            Self::IntermediateValues => false,
            Self::RemoveDuplicates => true,
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FeatureFlag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.key() == s.trim())
            .ok_or_else(|| format!("unknown feature '{s}'"))
    }
}

/// Everything stored for one tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TenantSettings {
    #[serde(default)]
    pub options: BTreeMap<BrowseOptionId, BrowseConfig>,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

impl TenantSettings {
    pub fn resolve(&self, id: &BrowseOptionId) -> Result<BrowseConfig> {
        if let Some(config) = self.options.get(id) {
            return Ok(config.clone());
        }
        BrowseConfig::system_default(id)
            .ok_or_else(|| ConfigError::UnknownBrowseOption(id.to_string()))
    }

    pub fn upsert(&mut self, config: BrowseConfig) -> Result<()> {
        config.validate()?;
        self.options.insert(config.id.clone(), config);
        Ok(())
    }

    /// System defaults overlaid with stored options, ordered by id.
    pub fn effective(&self) -> Vec<BrowseConfig> {
        let mut merged: BTreeMap<BrowseOptionId, BrowseConfig> = BrowseConfig::system_defaults()
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        for (id, config) in &self.options {
            merged.insert(id.clone(), config.clone());
        }
        merged.into_values().collect()
    }

    #[must_use]
    pub fn feature(&self, flag: FeatureFlag) -> bool {
        self.features
            .get(flag.key())
            .copied()
            .unwrap_or_else(|| flag.default_enabled())
    }

    pub fn set_feature(&mut self, flag: FeatureFlag, enabled: bool) {
        self.features.insert(flag.key().to_string(), enabled);
    }
}
