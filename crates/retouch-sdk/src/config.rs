use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use retouch_descriptor::DeliveryConfig;
use retouch_ledger::{InMemoryCreditLedger, DEFAULT_STARTING_BALANCE};
use retouch_registry::{TransformationTypeRegistry, DEFAULT_FEE};
use retouch_types::TransformationType;

/// Engine-wide settings, usually read from a `retouch.toml`.
///
/// Every field has a default, so an empty document is a valid config.
///
/// ```toml
/// debounce_window_ms = 1000
/// default_fee = 1
/// starting_balance = 20
///
/// [fee_overrides]
/// fill = 2
///
/// [delivery]
/// base_url = "https://res.cloudinary.com"
/// cloud_name = "demo"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiescence period before a staged edit reaches the pending delta.
    pub debounce_window_ms: u64,
    /// Credit cost of a commit for every type without an override.
    pub default_fee: i64,
    /// Per-type fees, keyed by wire key (`"fill"`, `"recolor"`, ...).
    pub fee_overrides: BTreeMap<String, i64>,
    /// Balance granted to a newly opened account.
    pub starting_balance: i64,
    pub delivery: DeliveryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: 1000,
            default_fee: DEFAULT_FEE,
            fee_overrides: BTreeMap::new(),
            starting_balance: DEFAULT_STARTING_BALANCE,
            delivery: DeliveryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for key in self.fee_overrides.keys() {
            key.parse::<TransformationType>()
                .map_err(|_| ConfigError::UnknownType(key.clone()))?;
        }
        if self.delivery.cloud_name.trim().is_empty() {
            return Err(ConfigError::Invalid("delivery.cloud_name must not be empty".into()));
        }
        if self.delivery.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("delivery.base_url must not be empty".into()));
        }
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    /// An in-memory ledger that opens accounts at `starting_balance`.
    pub fn ledger(&self) -> InMemoryCreditLedger {
        InMemoryCreditLedger::new(self.starting_balance)
    }

    /// The standard registry with this config's fees applied.
    pub fn registry(&self) -> Result<TransformationTypeRegistry, ConfigError> {
        let mut registry = TransformationTypeRegistry::standard().with_default_fee(self.default_fee);
        for (key, fee) in &self.fee_overrides {
            let ty = key
                .parse::<TransformationType>()
                .map_err(|_| ConfigError::UnknownType(key.clone()))?;
            registry = registry.with_fee(ty, *fee);
        }
        Ok(registry)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown transformation type in fee_overrides: {0}")]
    UnknownType(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
