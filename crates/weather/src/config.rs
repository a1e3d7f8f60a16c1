use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::profile::ParticleProfile;
use crate::state::Precipitation;

/// Overlay configuration: one particle profile per precipitation kind.
///
/// Missing kinds fall back to the built-in profiles, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub rain: ParticleProfile,
    pub snow: ParticleProfile,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            rain: ParticleProfile::rain(),
            snow: ParticleProfile::snow(),
        }
    }
}

impl OverlayConfig {
    pub fn profile(&self, kind: Precipitation) -> &ParticleProfile {
        match kind {
            Precipitation::Rain => &self.rain,
            Precipitation::Snow => &self.snow,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in Precipitation::ALL {
            self.profile(kind).validate().map_err(|e| match e {
                ConfigError::Invalid(msg) => ConfigError::Invalid(format!("{kind}: {msg}")),
                other => other,
            })?;
        }
        Ok(())
    }
}
