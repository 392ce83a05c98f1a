//! # Operation Registry
//!
//! Maps wire function names to handlers for the one contract a runtime
//! serves. Built and validated once at startup: names must be unique and
//! every operation the contract promises must be present.

use std::collections::HashMap;

use lc_02_token_ledger::operations::TokenOperation;
use lc_03_record_contracts::{ContractPreset, RecordOperation};
use thiserror::Error;
use tracing::info;

use crate::config::ContractSelection;

/// Startup validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two handlers claim the same name.
    #[error("{contract}: operation {name} registered twice")]
    Duplicate { contract: String, name: String },

    /// A promised operation has no handler.
    #[error("{contract}: operation {name} has no handler")]
    Missing { contract: String, name: String },
}

/// A dispatch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    Token(TokenOperation),
    Record(RecordOperation),
}

impl Handler {
    /// Registered operation name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Token(op) => op.name(),
            Self::Record(op) => op.name,
        }
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        match self {
            Self::Token(op) => op.is_read_only(),
            Self::Record(op) => op.is_read_only(),
        }
    }

    /// Whether the caller's identity has to be resolved before running.
    #[must_use]
    pub fn requires_caller(&self) -> bool {
        match self {
            Self::Token(op) => op.requires_caller(),
            Self::Record(_) => false,
        }
    }

    /// Probe calls are a record contract convention; token operations
    /// never treat an argument as a probe.
    #[must_use]
    pub fn is_probe(&self, args: &[String], probe: &str) -> bool {
        match self {
            Self::Token(_) => false,
            Self::Record(op) => op.is_probe(args, probe),
        }
    }
}

/// Name to handler table for one contract.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    contract: String,
    handlers: HashMap<String, Handler>,
}

impl OperationRegistry {
    /// Empty registry for `contract`.
    pub fn new(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            handlers: HashMap::new(),
        }
    }

    /// Add a handler under `name`.
    pub fn register(&mut self, name: &str, handler: Handler) -> Result<(), RegistryError> {
        if self.handlers.contains_key(name) {
            return Err(RegistryError::Duplicate {
                contract: self.contract.clone(),
                name: name.to_string(),
            });
        }
        self.handlers.insert(name.to_string(), handler);
        Ok(())
    }

    /// Check that every name in `required` has a handler.
    pub fn validate(&self, required: &[&str]) -> Result<(), RegistryError> {
        match required.iter().find(|name| !self.handlers.contains_key(**name)) {
            Some(name) => Err(RegistryError::Missing {
                contract: self.contract.clone(),
                name: (*name).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// The token contract's table.
    pub fn token() -> Result<Self, RegistryError> {
        let mut registry = Self::new(ContractSelection::Token.name());
        for op in TokenOperation::ALL {
            registry.register(op.name(), Handler::Token(op))?;
        }
        let required: Vec<&str> = TokenOperation::ALL.iter().map(|op| op.name()).collect();
        registry.validate(&required)?;
        Ok(registry)
    }

    /// A record preset's table.
    pub fn record(preset: ContractPreset) -> Result<Self, RegistryError> {
        let mut registry = Self::new(preset.name());
        for op in preset.operations() {
            registry.register(op.name, Handler::Record(op.clone()))?;
        }
        registry.validate(preset.required_operations())?;
        Ok(registry)
    }

    /// Table for the configured contract.
    pub fn for_contract(selection: ContractSelection) -> Result<Self, RegistryError> {
        let registry = match selection {
            ContractSelection::Token => Self::token()?,
            ContractSelection::Record(preset) => Self::record(preset)?,
        };
        info!(
            contract = %registry.contract,
            operations = registry.len(),
            "Operation registry validated"
        );
        Ok(registry)
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    #[must_use]
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
