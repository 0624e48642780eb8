//! Transaction execution state machine
//!
//! Drives one directive at a time through deploy/call, a single gas-limit
//! retry, revert-tolerant confirmation polling, and trace collection.
//! Constructor traces trail one constructor behind the directive cursor:
//! trace data for a deployment is only available once mining is confirmed,
//! so it is collected at the next constructor (or at the end of the run)
//! and spliced back into the deployment's original position.

use primitive_types::{H160, H256};

use solrig_client::abi::ContractArtifact;
use solrig_client::{FailureKind, LedgerClient, MethodCall, TraceProvider};
use solrig_types::hex::format_h160;
use solrig_types::{BlockInfo, CallStatus, Directive, DirectiveKind, StructLog, TraceRecord};

use crate::assembler::{RunLedger, RunOutput};
use crate::queue::DirectiveQueue;
use crate::RunnerError;

/// Bounded confirmation-polling attempts after an ambiguous submission
const MAX_CONFIRM_ATTEMPTS: usize = 10;

/// Safety margin added to the deployment gas estimate
const DEPLOY_GAS_MARGIN: u64 = 1;

/// Mutable execution context, owned by the run loop
#[derive(Debug, Default)]
struct RunState {
    /// Address of the active contract instance
    deployed: Option<H160>,
    /// Deployment whose trace has not been collected yet
    pending_constructor: Option<PendingConstructor>,
    /// Last fetched call trace, for duplicate detection
    last_trace: Option<Vec<StructLog>>,
}

#[derive(Debug)]
struct PendingConstructor {
    position: usize,
    transaction_hash: H256,
}

/// A method-call directive resolved to a traceable transaction
struct ResolvedCall {
    transaction_hash: H256,
    status: CallStatus,
}

/// Sequential test-execution harness.
///
/// Deploys the contract, replays every directive in order against the
/// deployed instance, and produces two directive-order-aligned output
/// sequences: execution traces and status markers.
pub struct Runner {
    client: LedgerClient,
    artifact: ContractArtifact,
}

impl Runner {
    /// Create a runner for one contract artifact
    pub fn new(client: LedgerClient, artifact: ContractArtifact) -> Self {
        Self { client, artifact }
    }

    /// Execute every directive in order.
    ///
    /// Recoverable conditions (out of gas, reverts, ambiguous replies) are
    /// handled locally; anything else aborts the run with the causing
    /// error. On success the output sequences are exactly as long as the
    /// directive queue.
    pub async fn run(&self, queue: &DirectiveQueue) -> Result<RunOutput, RunnerError> {
        let mut state = RunState::default();
        let mut ledger = RunLedger::new();

        for (index, directive) in queue.iter().enumerate() {
            let snapshot = self.client.latest_block().await?;
            tracing::info!(
                "calling {}({:?}) from {} with value {:?}",
                directive.name,
                directive.input_args,
                format_h160(&directive.from_account),
                directive.value
            );

            match directive.kind() {
                DirectiveKind::Constructor => {
                    self.deploy_directive(index, directive, &mut state, &mut ledger)
                        .await?;
                }
                DirectiveKind::PassTime => {
                    self.client.advance_time(&directive.input_args);
                    ledger.append(
                        TraceRecord::Marker(directive.name.clone()),
                        CallStatus::Marker(directive.name.clone()),
                    );
                }
                DirectiveKind::PassBlocks => {
                    self.client.mine_block();
                    ledger.append(
                        TraceRecord::Marker(directive.name.clone()),
                        CallStatus::Marker(directive.name.clone()),
                    );
                }
                DirectiveKind::Call => {
                    self.call_directive(index, directive, &snapshot, &mut state, &mut ledger)
                        .await?;
                }
            }
        }

        // A constructor deployed last never gets spliced inside the loop
        self.splice_constructor(&mut state, &mut ledger).await?;

        Ok(ledger.into_output())
    }

    /// Deploy a fresh contract instance.
    ///
    /// Any outstanding constructor trace is spliced first; this
    /// deployment's own trace is deferred in turn.
    async fn deploy_directive(
        &self,
        index: usize,
        directive: &Directive,
        state: &mut RunState,
        ledger: &mut RunLedger,
    ) -> Result<(), RunnerError> {
        self.splice_constructor(state, ledger).await?;

        let data = self
            .artifact
            .abi
            .encode_constructor(&self.artifact.bytecode, &directive.input_args)?;
        let estimate = self
            .client
            .estimate_deploy_gas(&directive.from_account, &data)
            .await?;
        let pending = self
            .client
            .deploy(&directive.from_account, &data, estimate + DEPLOY_GAS_MARGIN)
            .await?;
        let address = self.client.confirm_deploy(&pending).await?;
        tracing::debug!("deployed contract instance at {}", format_h160(&address));

        state.deployed = Some(address);
        state.pending_constructor = Some(PendingConstructor {
            position: index,
            transaction_hash: pending.transaction_hash,
        });
        Ok(())
    }

    /// Fetch and splice the outstanding constructor trace, if any
    async fn splice_constructor(
        &self,
        state: &mut RunState,
        ledger: &mut RunLedger,
    ) -> Result<(), RunnerError> {
        if let Some(pending) = state.pending_constructor.take() {
            let trace = self
                .client
                .transaction_trace(&pending.transaction_hash)
                .await?;
            ledger.insert_at(
                pending.position,
                TraceRecord::Steps(trace.struct_logs),
                CallStatus::None,
            )?;
        }
        Ok(())
    }

    /// Dispatch one method-call directive and record its result
    async fn call_directive(
        &self,
        index: usize,
        directive: &Directive,
        snapshot: &BlockInfo,
        state: &mut RunState,
        ledger: &mut RunLedger,
    ) -> Result<(), RunnerError> {
        let to = state.deployed.ok_or_else(|| RunnerError::NoContract {
            method: directive.name.clone(),
        })?;

        let data = self
            .artifact
            .abi
            .encode_call(&directive.name, &directive.input_args)?;
        let request = MethodCall {
            from: directive.from_account,
            to,
            data,
            value: directive.value.clone(),
            gas: None,
        };

        let resolved = match self.client.call(&request).await {
            Ok(outcome) => ResolvedCall {
                transaction_hash: outcome.transaction_hash,
                status: CallStatus::Success,
            },
            Err(err) => match err.failure_kind() {
                FailureKind::InsufficientFunds => {
                    tracing::warn!(
                        "balance of {} is below the value required for {}; skipping",
                        format_h160(&directive.from_account),
                        directive.name
                    );
                    ledger.append(
                        TraceRecord::Marker("Out of Ether".to_string()),
                        CallStatus::OutOfEther,
                    );
                    return Ok(());
                }
                FailureKind::OutOfGas => {
                    self.retry_with_block_gas(&request, snapshot).await?
                }
                FailureKind::Revert | FailureKind::InvalidResponse => {
                    self.reconcile(snapshot).await?
                }
                FailureKind::Fatal => return Err(RunnerError::Unrecoverable(err)),
            },
        };

        let trace = self
            .client
            .transaction_trace(&resolved.transaction_hash)
            .await?;
        if state.last_trace.as_ref() == Some(&trace.struct_logs) {
            return Err(RunnerError::DuplicateTrace { index });
        }
        state.last_trace = Some(trace.struct_logs.clone());
        ledger.append(TraceRecord::Steps(trace.struct_logs), resolved.status);
        Ok(())
    }

    /// Exactly one retry, resubmitting at the snapshot block's gas limit
    async fn retry_with_block_gas(
        &self,
        request: &MethodCall,
        snapshot: &BlockInfo,
    ) -> Result<ResolvedCall, RunnerError> {
        let gas = snapshot.gas_limit;
        tracing::info!("call ran out of gas, retrying with the block gas limit: {}", gas);

        match self.client.call(&request.with_gas(gas)).await {
            Ok(outcome) => Ok(ResolvedCall {
                transaction_hash: outcome.transaction_hash,
                status: CallStatus::Success,
            }),
            Err(err) => match err.failure_kind() {
                FailureKind::Revert | FailureKind::InvalidResponse => {
                    tracing::info!("call failed again at the block gas limit");
                    self.reconcile(snapshot).await
                }
                _ => Err(RunnerError::Unrecoverable(err)),
            },
        }
    }

    /// Confirmation polling.
    ///
    /// The submission failed in a way that does not rule out the
    /// transaction having been mined. Wait for the chain head to move past
    /// the pre-dispatch snapshot, bounded to [`MAX_CONFIRM_ATTEMPTS`]
    /// round-trips, then take the newest block's last transaction as the
    /// one that carries this call.
    async fn reconcile(&self, snapshot: &BlockInfo) -> Result<ResolvedCall, RunnerError> {
        let mut latest = self.client.latest_block().await?;
        let mut attempt = 0;
        while latest.number == snapshot.number && attempt < MAX_CONFIRM_ATTEMPTS {
            tracing::debug!(
                "waiting for the block to be processed, trying {} more times",
                MAX_CONFIRM_ATTEMPTS - attempt - 1
            );
            latest = self.client.latest_block().await?;
            attempt += 1;
        }

        let transaction_hash = latest
            .transactions
            .last()
            .copied()
            .ok_or(RunnerError::ConfirmationFailed {
                block: latest.number,
            })?;
        Ok(ResolvedCall {
            transaction_hash,
            status: CallStatus::Reverted,
        })
    }
}
