//! # Contract Runtime
//!
//! One invocation is one transaction:
//!
//! ```text
//! lookup ─▶ probe? ─▶ identity ─▶ begin ─▶ execute ─▶ read-only? ─▶ commit ─▶ publish
//!   404       200        403                 4xx         200          409       (bus)
//! ```
//!
//! A failed handler drops its simulation, so nothing it buffered reaches
//! the ledger. Events are published only after a successful commit.

use std::sync::Arc;
use std::time::Instant;

use ledger_telemetry::{
    log_tx_event, metric_inc, metric_observe, COMMITS, CONTRACT_ERRORS, EVENTS_PUBLISHED,
    INVOCATIONS, INVOCATION_DURATION,
};
use lc_01_world_state::Ledger;
use lc_03_record_contracts::PROBE_RESPONSE;
use shared_bus::{EventPublisher, EventTopic, InMemoryEventBus, LedgerEvent};
use shared_types::entities::{ChaincodeEvent, CommitOutcome, Identity};
use shared_types::errors::{ContractError, ContractResult};
use shared_types::invocation::{Invocation, Response};
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::{ContractSelection, RuntimeConfig};
use crate::identity::{provider_for, IdentityProvider};
use crate::registry::{Handler, OperationRegistry, RegistryError};

/// Metrics label for invocations of names nothing is registered under.
pub const UNKNOWN_OPERATION_LABEL: &str = "unknown";

/// Startup failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Dispatches invocations for one contract against a ledger.
pub struct ContractRuntime<L: Ledger> {
    ledger: L,
    registry: OperationRegistry,
    identity: Box<dyn IdentityProvider>,
    bus: Arc<InMemoryEventBus>,
    contract: ContractSelection,
    probe_argument: String,
    version_label: String,
}

impl<L: Ledger> ContractRuntime<L> {
    /// Validate `config` and build the operation registry.
    pub fn new(
        config: &RuntimeConfig,
        ledger: L,
        bus: Arc<InMemoryEventBus>,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;
        let registry = OperationRegistry::for_contract(config.contract)?;
        Ok(Self {
            ledger,
            registry,
            identity: provider_for(config.identity_mode),
            bus,
            contract: config.contract,
            probe_argument: config.probe_argument.clone(),
            version_label: config.version_label(),
        })
    }

    /// Replace the identity provider.
    #[must_use]
    pub fn with_identity_provider(mut self, provider: Box<dyn IdentityProvider>) -> Self {
        self.identity = provider;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    fn topic(&self) -> EventTopic {
        match self.contract {
            ContractSelection::Token => EventTopic::TokenLedger,
            ContractSelection::Record(_) => EventTopic::RecordContracts,
        }
    }

    /// Run one invocation to completion.
    #[instrument(skip(self, invocation), fields(contract = %self.contract, function = %invocation.function))]
    pub async fn invoke(&self, invocation: Invocation) -> Response {
        let started = Instant::now();
        let tx_id = invocation
            .tx_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let contract = self.contract.name();
        let operation = self
            .registry
            .lookup(&invocation.function)
            .map_or(UNKNOWN_OPERATION_LABEL, Handler::name);

        let response = match self.dispatch(&tx_id, &invocation).await {
            Ok(payload) => {
                log_tx_event!(debug, contract, tx_id, "Invocation succeeded", function = %invocation.function);
                Response::success(payload)
            }
            Err(err) => {
                metric_inc!(CONTRACT_ERRORS, &[contract, err.kind()]);
                log_tx_event!(
                    info,
                    contract,
                    tx_id,
                    "Invocation failed",
                    function = %invocation.function,
                    status = err.status(),
                    error = %err
                );
                Response::from_error(&err)
            }
        };

        let status = response.status.to_string();
        metric_inc!(INVOCATIONS, &[contract, operation, status.as_str()]);
        metric_observe!(
            INVOCATION_DURATION,
            &[operation],
            started.elapsed().as_secs_f64()
        );
        response
    }

    async fn dispatch(&self, tx_id: &str, invocation: &Invocation) -> ContractResult<Vec<u8>> {
        let handler = self.registry.lookup(&invocation.function).ok_or_else(|| {
            ContractError::UnknownOperation {
                name: invocation.function.clone(),
            }
        })?;
        let args = invocation.args.as_slice();

        if handler.is_probe(args, &self.probe_argument) {
            debug!(tx_id = %tx_id, "Probe call, nothing will be committed");
            return Ok(PROBE_RESPONSE.as_bytes().to_vec());
        }

        let caller: Option<Identity> = if handler.requires_caller() {
            Some(self.identity.identify(&invocation.creator)?)
        } else {
            None
        };

        let mut tx = self.ledger.begin(tx_id);
        let payload = match handler {
            Handler::Token(op) => {
                lc_02_token_ledger::handler::execute(*op, &mut tx, caller.as_ref(), args).await?
            }
            Handler::Record(op) => {
                lc_03_record_contracts::execute(op, &mut tx, args, &self.version_label).await?
            }
        };

        if handler.is_read_only() {
            return Ok(payload);
        }

        let receipt = self.ledger.commit(tx).await?;
        match receipt.outcome {
            CommitOutcome::ConflictAborted { key } => {
                metric_inc!(COMMITS, &["conflict"]);
                Err(ContractError::CommitConflict { key })
            }
            CommitOutcome::Committed { block_num } => {
                metric_inc!(COMMITS, &["committed"]);
                if let Some(event) = receipt.event {
                    self.publish(receipt.tx_id, block_num, event).await;
                }
                Ok(payload)
            }
        }
    }

    async fn publish(&self, tx_id: String, block_num: u64, event: ChaincodeEvent) {
        metric_inc!(EVENTS_PUBLISHED, &[event.topic.as_str()]);
        let receivers = self
            .bus
            .publish(LedgerEvent {
                tx_id,
                block_num,
                contract: self.contract.name().to_string(),
                topic: self.topic(),
                event,
            })
            .await;
        debug!(receivers, "Committed event handed to bus");
    }
}
