//! Propagation configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;

/// Supported configuration file versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Settings consumed by the call-edge transfer function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationConfig {
    pub version: u32,

    /// Frames at or beyond this distance stop propagating
    pub maximum_source_sink_distance: u32,

    /// Keep anomaly records in the propagation context (they are logged
    /// either way)
    pub collect_diagnostics: bool,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

/// On-disk YAML form; every field but `version` is optional
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PropagationConfigFile {
    version: Option<u32>,
    #[serde(default)]
    preset: Option<Preset>,
    maximum_source_sink_distance: Option<u32>,
    collect_diagnostics: Option<bool>,
}

impl PropagationConfig {
    pub fn preset(preset: Preset) -> Self {
        Self {
            version: 1,
            maximum_source_sink_distance: preset.maximum_source_sink_distance(),
            collect_diagnostics: true,
        }
    }

    pub fn maximum_source_sink_distance(mut self, distance: u32) -> Self {
        self.maximum_source_sink_distance = distance;
        self
    }

    pub fn collect_diagnostics(mut self, collect: bool) -> Self {
        self.collect_diagnostics = collect;
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: PropagationConfigFile = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::preset(file.preset.unwrap_or_default());
        config.version = version;
        if let Some(distance) = file.maximum_source_sink_distance {
            config.maximum_source_sink_distance = distance;
        }
        if let Some(collect) = file.collect_diagnostics {
            config.collect_diagnostics = collect;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Validatable for PropagationConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }
        if !(1..=100).contains(&self.maximum_source_sink_distance) {
            return Err(ConfigError::range_with_hint(
                "maximum_source_sink_distance",
                self.maximum_source_sink_distance,
                1,
                100,
                "Frames at distance 0 could never propagate; large values rarely find more flows",
            ));
        }
        Ok(())
    }
}
