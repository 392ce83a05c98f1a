//! # Runtime Configuration
//!
//! Which contract the runtime serves and how it treats callers. Every
//! field has a default and an `LC_*` environment override.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LC_CONTRACT` | `erc20` | `erc20` or a record preset name |
//! | `LC_CONTRACT_VERSION` | `1.0.0` | Reported by `getVersion` |
//! | `LC_PROBE_ARGUMENT` | `Xooa Test` | Lone argument that marks a probe call |
//! | `LC_EVENT_CHANNEL_CAPACITY` | `1000` | Event bus buffer per subscriber |
//! | `LC_IDENTITY_MODE` | `certificate-digest` | `certificate-digest` or `public-key` |
//! | `LC_DUMP_METRICS` | `false` | Print Prometheus metrics to stderr on shutdown |

use lc_02_token_ledger::CONTRACT_NAME as TOKEN_CONTRACT;
use lc_03_record_contracts::ContractPreset;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use std::fmt;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `LC_CONTRACT` names no known contract.
    #[error("Unknown contract {0:?}")]
    UnknownContract(String),

    /// `LC_IDENTITY_MODE` names no known mode.
    #[error("Unknown identity mode {0:?}")]
    UnknownIdentityMode(String),

    /// A numeric variable did not parse.
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A value parsed but is not usable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The contract a runtime instance serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractSelection {
    Token,
    Record(ContractPreset),
}

impl ContractSelection {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        if name == TOKEN_CONTRACT {
            return Ok(Self::Token);
        }
        ContractPreset::from_name(name)
            .map(Self::Record)
            .ok_or_else(|| ConfigError::UnknownContract(name.to_string()))
    }

    /// Contract name used in logs, metrics, events and `getVersion`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Token => TOKEN_CONTRACT,
            Self::Record(preset) => preset.name(),
        }
    }
}

impl fmt::Display for ContractSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How caller credentials become identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityMode {
    /// Hex SHA-256 over MSP id and certificate.
    #[default]
    CertificateDigest,
    /// The certificate bytes are the caller's public key string.
    PublicKey,
}

impl IdentityMode {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "certificate-digest" => Ok(Self::CertificateDigest),
            "public-key" => Ok(Self::PublicKey),
            other => Err(ConfigError::UnknownIdentityMode(other.to_string())),
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Served contract.
    pub contract: ContractSelection,
    /// Version reported by `getVersion`.
    pub contract_version: String,
    /// Argument that turns a write call into a no-op probe.
    pub probe_argument: String,
    /// Event bus capacity.
    pub event_channel_capacity: usize,
    /// Identity derivation.
    pub identity_mode: IdentityMode,
    /// Dump metrics when input ends.
    pub dump_metrics: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            contract: ContractSelection::Token,
            contract_version: "1.0.0".to_string(),
            probe_argument: "Xooa Test".to_string(),
            event_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            identity_mode: IdentityMode::CertificateDigest,
            dump_metrics: false,
        }
    }
}

impl RuntimeConfig {
    /// Defaults with a different contract.
    #[must_use]
    pub fn for_contract(contract: ContractSelection) -> Self {
        Self {
            contract,
            ..Self::default()
        }
    }

    /// Load from the process environment and validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup and validate.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("LC_CONTRACT") {
            config.contract = ContractSelection::parse(name.trim())?;
        }
        if let Some(version) = lookup("LC_CONTRACT_VERSION") {
            config.contract_version = version.trim().to_string();
        }
        if let Some(probe) = lookup("LC_PROBE_ARGUMENT") {
            config.probe_argument = probe;
        }
        if let Some(raw) = lookup("LC_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber {
                        var: "LC_EVENT_CHANNEL_CAPACITY",
                        value: raw.clone(),
                    })?;
        }
        if let Some(mode) = lookup("LC_IDENTITY_MODE") {
            config.identity_mode = IdentityMode::parse(mode.trim())?;
        }
        if let Some(raw) = lookup("LC_DUMP_METRICS") {
            config.dump_metrics = parse_flag(&raw).ok_or_else(|| {
                ConfigError::Invalid(format!("LC_DUMP_METRICS must be a boolean, got {raw:?}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contract_version.is_empty() {
            return Err(ConfigError::Invalid(
                "contract version must not be empty".to_string(),
            ));
        }
        if self.probe_argument.is_empty() {
            return Err(ConfigError::Invalid(
                "probe argument must not be empty".to_string(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event channel capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `<contract>:<version>`.
    #[must_use]
    pub fn version_label(&self) -> String {
        format!("{}:{}", self.contract.name(), self.contract_version)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
