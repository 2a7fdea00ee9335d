use std::path::Path;

use serde::{Deserialize, Serialize};

use deed_types::limits::{DEFAULT_MAX_PROPERTIES, DEFAULT_REGISTRATION_FEE};
use deed_types::{BlockHeight, Principal};

use crate::error::{RegistryError, Result};

/// Registry configuration, usually loaded from TOML.
///
/// Missing keys take their default values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum number of properties the registry accepts.
    pub max_properties: u64,
    /// Fee charged per registration until changed.
    pub registration_fee: u64,
    /// Principal that can never become the authority.
    pub burn_principal: Principal,
    /// When `true`, only the authority itself may change the fee. Off by
    /// default, in which case any caller may change it once an authority
    /// exists.
    pub restrict_fee_to_authority: bool,
    /// Block height a fresh registry starts at.
    pub initial_block_height: BlockHeight,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_properties: DEFAULT_MAX_PROPERTIES,
            registration_fee: DEFAULT_REGISTRATION_FEE,
            burn_principal: Principal::burn(),
            restrict_fee_to_authority: false,
            initial_block_height: BlockHeight::zero(),
        }
    }
}

impl RegistryConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RegistryError::Config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| RegistryError::Config(e.to_string()))
    }
}
