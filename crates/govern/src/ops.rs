//! The workflow engine behind every governance driver: persist first, read
//! the chain, then take exactly the one step the lifecycle calls for.

use alloy_provider::Provider;
use alloy_transport::Transport;
use op_ledger::{LedgerEntry, OperationLedger};
use safe_multisig::{ExecuteOutcome, SafeExecutor};
use timelock::{
    OperationState, OperationStatus, ScheduleOutcome, TimelockError, TimelockManager,
    TimelockOperation,
};
use tracing::info;

/// The single next step for an operation, derived purely from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressAction {
    Schedule,
    Wait { ready_at: Option<u64> },
    Execute,
    AlreadyDone,
}

/// Maps an on-chain snapshot to the one action that advances the lifecycle.
/// Re-running a driver against any state is safe: each state has exactly one
/// answer and `AlreadyDone` is a no-op.
pub fn next_action(state: &OperationState) -> ProgressAction {
    match state.status() {
        OperationStatus::Unknown => ProgressAction::Schedule,
        OperationStatus::Pending => ProgressAction::Wait {
            ready_at: state.ready_at,
        },
        OperationStatus::Ready => ProgressAction::Execute,
        OperationStatus::Done => ProgressAction::AlreadyDone,
    }
}

/// What `ensure_operation` did on this pass.
#[derive(Debug)]
pub enum EnsureOutcome {
    /// The schedule transaction went through the Safe.
    Scheduled,
    /// Scheduled but not yet ready; execution must wait for `ready_at`.
    Waiting { ready_at: Option<u64> },
    /// The execute transaction landed and the ledger records it.
    Executed,
    /// A submission is in flight in the mempool; nothing recorded as final.
    InFlight,
    /// The timelock already marks the operation done.
    AlreadyDone,
}

/// Advances `op` one step through schedule -> wait -> execute.
///
/// The ledger entry is written before anything touches the chain, so a crash
/// between persist and submit leaves a resumable record rather than an
/// orphaned on-chain operation.
pub async fn ensure_operation<T, P>(
    manager: &TimelockManager,
    executor: &SafeExecutor,
    ledger: &mut OperationLedger,
    op: &TimelockOperation,
    description: &str,
    network: &str,
    provider: &P,
) -> eyre::Result<EnsureOutcome>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let id = op.id();
    ledger.save(LedgerEntry::new(op, description.to_string(), network.to_string()))?;

    let state = manager.status(id, provider).await?;
    match next_action(&state) {
        ProgressAction::Schedule => {
            match manager.schedule(op, executor, provider).await? {
                ScheduleOutcome::Scheduled(ExecuteOutcome::Executed(receipt)) => {
                    info!(%id, tx = %receipt.transaction_hash, "operation scheduled");
                    ledger.set_status(id, OperationStatus::Pending)?;
                    Ok(EnsureOutcome::Scheduled)
                }
                ScheduleOutcome::Scheduled(ExecuteOutcome::AlreadyInFlight) => {
                    // The mempool may still drop it; leave the ledger alone.
                    Ok(EnsureOutcome::InFlight)
                }
                ScheduleOutcome::AlreadyExists(status) => {
                    ledger.set_status(id, status)?;
                    match status {
                        OperationStatus::Done => Ok(EnsureOutcome::AlreadyDone),
                        _ => Ok(EnsureOutcome::Waiting {
                            ready_at: state.ready_at,
                        }),
                    }
                }
            }
        }
        ProgressAction::Wait { ready_at } => {
            ledger.set_status(id, OperationStatus::Pending)?;
            Ok(EnsureOutcome::Waiting { ready_at })
        }
        ProgressAction::Execute => match manager.execute(op, executor, provider).await {
            Ok(ExecuteOutcome::Executed(receipt)) => {
                info!(%id, tx = %receipt.transaction_hash, "operation executed");
                ledger.mark_executed(id)?;
                Ok(EnsureOutcome::Executed)
            }
            Ok(ExecuteOutcome::AlreadyInFlight) => Ok(EnsureOutcome::InFlight),
            // Lost the race against another executor or a reorg; report it
            // as a wait rather than a failure.
            Err(TimelockError::NotReady { status, .. }) => {
                ledger.set_status(id, status)?;
                Ok(EnsureOutcome::Waiting {
                    ready_at: state.ready_at,
                })
            }
            Err(e) => Err(e.into()),
        },
        ProgressAction::AlreadyDone => {
            ledger.mark_executed(id)?;
            Ok(EnsureOutcome::AlreadyDone)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(exists: bool, pending: bool, ready: bool, done: bool, ready_at: Option<u64>) -> OperationState {
        OperationState {
            exists,
            pending,
            ready,
            done,
            ready_at,
        }
    }

    #[test]
    fn unknown_operations_get_scheduled() {
        assert_eq!(
            next_action(&state(false, false, false, false, None)),
            ProgressAction::Schedule
        );
    }

    #[test]
    fn pending_operations_wait_with_the_ready_timestamp() {
        assert_eq!(
            next_action(&state(true, true, false, false, Some(1_900_000_000))),
            ProgressAction::Wait {
                ready_at: Some(1_900_000_000)
            }
        );
    }

    #[test]
    fn ready_operations_get_executed() {
        assert_eq!(
            next_action(&state(true, true, true, false, Some(1_900_000_000))),
            ProgressAction::Execute
        );
    }

    #[test]
    fn done_operations_are_a_no_op() {
        assert_eq!(
            next_action(&state(true, false, false, true, None)),
            ProgressAction::AlreadyDone
        );
    }

    #[test]
    fn repeated_evaluation_is_stable() {
        // Same state in, same action out; drivers can be re-run freely.
        let s = state(true, true, false, false, Some(42));
        assert_eq!(next_action(&s), next_action(&s));
    }
}
