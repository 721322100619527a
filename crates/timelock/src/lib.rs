//! Lifecycle management for timelocked governance operations: deterministic
//! operation ids, on-chain status tracking, and schedule/execute routed
//! through the Safe multisig (only the Safe holds the proposer and executor
//! roles).

use std::time::{Duration, Instant};

use alloy_primitives::{Address, B256, U256};
use alloy_provider::Provider;
use alloy_transport::Transport;
use safe_multisig::{ExecuteOutcome, SafeError, SafeExecutor};
use tracing::{debug, info, warn};

pub mod calls;

mod contracts;
mod operation;

pub use operation::{compute_operation_id, derive_salt, OperationStatus, TimelockOperation};

#[derive(Debug, thiserror::Error)]
pub enum TimelockError {
    /// The timelock refuses execution right now; a normal negative outcome,
    /// not a fault.
    #[error("operation {id} is not ready to execute (status: {status})")]
    NotReady { id: B256, status: OperationStatus },

    #[error("timelock chain read failed: {0}")]
    Chain(String),

    #[error(transparent)]
    Safe(#[from] SafeError),
}

/// Snapshot of an operation's on-chain state.
#[derive(Debug, Clone, Copy)]
pub struct OperationState {
    pub exists: bool,
    pub pending: bool,
    pub ready: bool,
    pub done: bool,
    /// Unix timestamp at which the timelock will consider the operation
    /// ready; `None` once done or while unknown.
    pub ready_at: Option<u64>,
}

impl OperationState {
    pub fn status(&self) -> OperationStatus {
        if self.done {
            OperationStatus::Done
        } else if self.ready {
            OperationStatus::Ready
        } else if self.pending {
            OperationStatus::Pending
        } else {
            OperationStatus::Unknown
        }
    }
}

/// Outcome of a scheduling attempt.
#[derive(Debug)]
pub enum ScheduleOutcome {
    /// The schedule call went through the Safe.
    Scheduled(ExecuteOutcome),
    /// The id already exists on-chain; scheduling again would revert, so the
    /// caller should branch on the reported status instead.
    AlreadyExists(OperationStatus),
}

/// Outcome of a bounded readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    /// `max_wait` elapsed; the caller decides whether to keep waiting later.
    TimedOut { waited: Duration },
}

/// Drives operations through the timelock at `address`.
pub struct TimelockManager {
    timelock: Address,
}

impl TimelockManager {
    pub fn new(timelock: Address) -> Self {
        Self { timelock }
    }

    pub fn address(&self) -> Address {
        self.timelock
    }

    /// Read-only status snapshot; no side effects.
    pub async fn status<T, P>(&self, id: B256, provider: &P) -> Result<OperationState, TimelockError>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let exists = calls::is_operation(id, self.timelock, provider)
            .await
            .map_err(chain_err)?;
        if !exists {
            return Ok(OperationState {
                exists: false,
                pending: false,
                ready: false,
                done: false,
                ready_at: None,
            });
        }

        let pending = calls::is_operation_pending(id, self.timelock, provider)
            .await
            .map_err(chain_err)?;
        let ready = calls::is_operation_ready(id, self.timelock, provider)
            .await
            .map_err(chain_err)?;
        let done = calls::is_operation_done(id, self.timelock, provider)
            .await
            .map_err(chain_err)?;
        let ready_at = if done {
            None
        } else {
            let timestamp = calls::get_timestamp(id, self.timelock, provider)
                .await
                .map_err(chain_err)?;
            Some(timestamp.to::<u64>())
        };

        Ok(OperationState {
            exists,
            pending,
            ready,
            done,
            ready_at,
        })
    }

    /// The contract-enforced minimum delay in seconds.
    pub async fn min_delay<T, P>(&self, provider: &P) -> Result<u64, TimelockError>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let delay = calls::get_min_delay(self.timelock, provider)
            .await
            .map_err(chain_err)?;
        Ok(delay.to::<u64>())
    }

    /// Schedules `op` through the Safe, skipping the submission entirely if
    /// the id already exists on-chain (the timelock would reject it).
    pub async fn schedule<T, P>(
        &self,
        op: &TimelockOperation,
        executor: &SafeExecutor,
        provider: &P,
    ) -> Result<ScheduleOutcome, TimelockError>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let id = op.id();
        let state = self.status(id, provider).await?;
        if let Some(status) = existing_status(&state) {
            debug!(%id, %status, "operation already known to the timelock");
            return Ok(ScheduleOutcome::AlreadyExists(status));
        }

        // Never ask for less than the contract would accept.
        let min_delay = self.min_delay(provider).await?;
        let delay = op.delay.max(min_delay);
        if delay > op.delay {
            warn!(
                requested = op.delay,
                enforced = delay,
                "requested delay below the timelock minimum, raising it",
            );
        }

        let calldata = calls::schedule_calldata(op, delay);
        info!(%id, target = %op.target, delay, "scheduling operation through the safe");
        let outcome = executor
            .execute(self.timelock, U256::ZERO, calldata, provider)
            .await?;

        Ok(ScheduleOutcome::Scheduled(outcome))
    }

    /// Executes a ready operation through the Safe.
    ///
    /// Readiness is re-verified immediately before submission; state may
    /// have changed since the caller last looked.
    pub async fn execute<T, P>(
        &self,
        op: &TimelockOperation,
        executor: &SafeExecutor,
        provider: &P,
    ) -> Result<ExecuteOutcome, TimelockError>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let id = op.id();
        let state = self.status(id, provider).await?;
        ensure_ready(id, &state)?;

        let calldata = calls::execute_calldata(op);
        info!(%id, target = %op.target, "executing operation through the safe");
        let outcome = executor
            .execute(self.timelock, op.value, calldata, provider)
            .await?;

        Ok(outcome)
    }

    /// Polls for readiness on a fixed interval, giving up after `max_wait`.
    pub async fn wait_until_ready<T, P>(
        &self,
        id: B256,
        max_wait: Duration,
        poll_interval: Duration,
        provider: &P,
    ) -> Result<WaitOutcome, TimelockError>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let started = Instant::now();
        loop {
            let state = self.status(id, provider).await?;
            if state.ready || state.done {
                return Ok(WaitOutcome::Ready);
            }

            let waited = started.elapsed();
            if waited >= max_wait {
                return Ok(WaitOutcome::TimedOut { waited });
            }
            if let Some(ready_at) = state.ready_at {
                debug!(%id, ready_at, "operation not ready yet");
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}

fn chain_err(err: eyre::Report) -> TimelockError {
    TimelockError::Chain(err.to_string())
}

/// The status to branch on when the id is already on-chain; `None` means
/// scheduling may proceed.
fn existing_status(state: &OperationState) -> Option<OperationStatus> {
    state.exists.then(|| state.status())
}

/// Refuses execution unless the timelock reports the operation ready and
/// not yet done.
fn ensure_ready(id: B256, state: &OperationState) -> Result<(), TimelockError> {
    if !state.ready || state.done {
        return Err(TimelockError::NotReady {
            id,
            status: state.status(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(exists: bool, pending: bool, ready: bool, done: bool) -> OperationState {
        OperationState {
            exists,
            pending,
            ready,
            done,
            ready_at: None,
        }
    }

    #[test]
    fn status_mapping_follows_the_lifecycle() {
        assert_eq!(state(false, false, false, false).status(), OperationStatus::Unknown);
        assert_eq!(state(true, true, false, false).status(), OperationStatus::Pending);
        assert_eq!(state(true, true, true, false).status(), OperationStatus::Ready);
        assert_eq!(state(true, false, false, true).status(), OperationStatus::Done);
    }

    #[test]
    fn scheduling_skips_ids_already_on_chain() {
        // Unknown ids may be scheduled; anything on-chain short-circuits
        // to its reported status instead of a duplicate schedule attempt.
        assert_eq!(existing_status(&state(false, false, false, false)), None);
        assert_eq!(
            existing_status(&state(true, true, false, false)),
            Some(OperationStatus::Pending)
        );
        assert_eq!(
            existing_status(&state(true, true, true, false)),
            Some(OperationStatus::Ready)
        );
        assert_eq!(
            existing_status(&state(true, false, false, true)),
            Some(OperationStatus::Done)
        );
    }

    #[test]
    fn execution_is_refused_until_ready() {
        let id = B256::repeat_byte(0x07);

        assert!(matches!(
            ensure_ready(id, &state(true, true, false, false)),
            Err(TimelockError::NotReady {
                status: OperationStatus::Pending,
                ..
            })
        ));
        assert!(matches!(
            ensure_ready(id, &state(true, false, false, true)),
            Err(TimelockError::NotReady {
                status: OperationStatus::Done,
                ..
            })
        ));
        assert!(ensure_ready(id, &state(true, true, true, false)).is_ok());
    }
}
