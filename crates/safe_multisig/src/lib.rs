//! Threshold execution of governance calls through a Safe multisig:
//! collect co-signatures over a typed Safe transaction, aggregate them in
//! owner-address order, and submit `execTransaction` on-chain.

use std::time::Duration;

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::Transport;
use tracing::{debug, warn};

pub mod calls;
pub mod transaction_data;

mod contracts;
mod error;
mod signing;

pub use error::SafeError;
pub use signing::{
    aggregate_signatures, fallback_domain_separator, sign_transaction, transaction_digest,
    SafeSignature, DOMAIN_TYPEHASH_MINIMAL, SAFE_TX_TYPEHASH,
};

use transaction_data::SafeTransactionData;

/// Grace period after the node reports a duplicate broadcast; the
/// transaction cannot be un-sent, so we wait and report optimistically.
const ALREADY_KNOWN_GRACE: Duration = Duration::from_secs(30);

/// Headroom added on top of the node's gas estimate.
const GAS_HEADROOM_PERCENT: u64 = 30;

/// How long to wait for a submitted transaction to be included.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(180);

/// Result of an execution attempt.
#[derive(Debug)]
pub enum ExecuteOutcome {
    /// The transaction was included and succeeded.
    Executed(Box<TransactionReceipt>),
    /// The node already knew the transaction; assumed in flight after the
    /// grace period. This is a documented fallback, not a proven success.
    AlreadyInFlight,
}

/// Aggregates threshold-many co-signatures and submits the aggregated call
/// to the Safe's `execTransaction` entry point.
///
/// The first signer doubles as the submitting account: the provider passed
/// to [`SafeExecutor::execute`] must carry that signer's wallet.
pub struct SafeExecutor {
    safe: Address,
    signers: Vec<PrivateKeySigner>,
    fallback_threshold: u64,
}

impl SafeExecutor {
    pub fn new(
        safe: Address,
        signers: Vec<PrivateKeySigner>,
        fallback_threshold: u64,
    ) -> Result<Self, SafeError> {
        if signers.is_empty() {
            return Err(SafeError::Configuration(
                "no signing keys configured".to_string(),
            ));
        }
        if fallback_threshold == 0 {
            return Err(SafeError::Configuration(
                "configured approval threshold must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            safe,
            signers,
            fallback_threshold,
        })
    }

    pub fn safe_address(&self) -> Address {
        self.safe
    }

    pub fn submitter(&self) -> Address {
        self.signers[0].address()
    }

    /// Ensures enough keys are available before any signature is produced.
    pub fn check_threshold(&self, threshold: u64) -> Result<(), SafeError> {
        if (self.signers.len() as u64) < threshold {
            return Err(SafeError::Configuration(format!(
                "safe {} requires {} signatures but only {} signing keys are configured",
                self.safe,
                threshold,
                self.signers.len()
            )));
        }
        Ok(())
    }

    /// Executes `data` against `to` through the Safe.
    ///
    /// Fails fast on missing bytecode, an unfunded Safe, or an unreachable
    /// threshold before any signature is collected. Falls back to the
    /// configured threshold and a locally derived domain separator when the
    /// corresponding chain reads fail; the nonce is always read from chain,
    /// a stale nonce cannot be papered over.
    pub async fn execute<T, P>(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        provider: &P,
    ) -> Result<ExecuteOutcome, SafeError>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let code = provider
            .get_code_at(self.safe)
            .await
            .map_err(|e| SafeError::Transient(format!("code check failed: {e}")))?;
        if code.is_empty() {
            return Err(SafeError::Configuration(format!(
                "no contract code at safe address {}",
                self.safe
            )));
        }

        let balance = provider
            .get_balance(self.safe)
            .await
            .map_err(|e| SafeError::Transient(format!("balance check failed: {e}")))?;
        if balance.is_zero() {
            return Err(SafeError::Configuration(format!(
                "safe {} holds no native currency to pay execution gas",
                self.safe
            )));
        }

        let nonce = calls::get_nonce(self.safe, provider)
            .await
            .map_err(|e| SafeError::Transient(format!("nonce read failed: {e}")))?;

        let threshold = match calls::get_threshold(self.safe, provider).await {
            Ok(threshold) => threshold.to::<u64>(),
            Err(err) => {
                warn!(
                    safe = %self.safe,
                    %err,
                    "threshold read failed, falling back to configured threshold",
                );
                self.fallback_threshold
            }
        };
        self.check_threshold(threshold)?;

        // A key that is not an owner would produce a signature the Safe
        // rejects; catch the misconfiguration before signing.
        match calls::get_owners(self.safe, provider).await {
            Ok(owners) => {
                for signer in &self.signers[..threshold as usize] {
                    if !owners.contains(&signer.address()) {
                        return Err(SafeError::Configuration(format!(
                            "signing key {} is not an owner of safe {}",
                            signer.address(),
                            self.safe
                        )));
                    }
                }
            }
            Err(err) => {
                warn!(safe = %self.safe, %err, "owners read failed, skipping the owner check");
            }
        }

        let domain_separator = match calls::get_domain_separator(self.safe, provider).await {
            Ok(separator) => separator,
            Err(err) => {
                warn!(
                    safe = %self.safe,
                    %err,
                    "domainSeparator read failed, deriving minimal domain locally",
                );
                fallback_domain_separator(self.safe)
            }
        };

        let safe_tx = SafeTransactionData::call(to, value, data, nonce);
        let signatures = self
            .collect_signatures(&safe_tx, domain_separator, threshold)
            .await?;
        let calldata = calls::exec_transaction_calldata(&safe_tx, signatures);

        self.submit(to, calldata, provider).await
    }

    /// Signs with the first `threshold` keys, strictly in configured order.
    async fn collect_signatures(
        &self,
        safe_tx: &SafeTransactionData,
        domain_separator: B256,
        threshold: u64,
    ) -> Result<Bytes, SafeError> {
        let mut collected = Vec::with_capacity(threshold as usize);
        for signer in &self.signers[..threshold as usize] {
            let signature = sign_transaction(signer, safe_tx, domain_separator).await?;
            debug!(signer = %signature.signer, nonce = %safe_tx.nonce, "collected signature");
            collected.push(signature);
        }
        Ok(aggregate_signatures(collected))
    }

    async fn submit<T, P>(
        &self,
        target: Address,
        calldata: Bytes,
        provider: &P,
    ) -> Result<ExecuteOutcome, SafeError>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let mut req = TransactionRequest::default().to(self.safe);
        req.set_from(self.submitter());
        req.set_input(calldata);

        // Explicit gas and fee parameters; provider defaults have stalled
        // underpriced governance transactions before.
        let gas = provider
            .estimate_gas(&req)
            .await
            .map_err(|e| SafeError::Transient(format!("gas estimation failed: {e}")))?;
        req.set_gas_limit(gas + gas * GAS_HEADROOM_PERCENT / 100);

        let fees = provider
            .estimate_eip1559_fees(None)
            .await
            .map_err(|e| SafeError::Transient(format!("fee estimation failed: {e}")))?;
        req.set_max_fee_per_gas(fees.max_fee_per_gas);
        req.set_max_priority_fee_per_gas(fees.max_priority_fee_per_gas);

        let pending = match provider.send_transaction(req.clone()).await {
            Ok(pending) => pending,
            Err(err) if is_already_known(&err.to_string()) => {
                warn!(
                    safe = %self.safe,
                    "node reports transaction already known; waiting out the grace period",
                );
                tokio::time::sleep(ALREADY_KNOWN_GRACE).await;
                return Ok(ExecuteOutcome::AlreadyInFlight);
            }
            Err(err) => return Err(SafeError::Transient(format!("broadcast failed: {err}"))),
        };

        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, safe = %self.safe, "awaiting inclusion");

        let receipt = pending
            .with_timeout(Some(RECEIPT_TIMEOUT))
            .get_receipt()
            .await
            .map_err(|e| {
                // The transaction may still land; retrying the wait is safe,
                // resubmitting with the same nonce is not.
                SafeError::Transient(format!("timed out awaiting receipt for {tx_hash}: {e}"))
            })?;

        if !receipt.status() {
            let reason = revert_reason(&req, provider)
                .await
                .unwrap_or_else(|| "reverted without reason".to_string());
            return Err(SafeError::Execution { target, reason });
        }

        Ok(ExecuteOutcome::Executed(Box::new(receipt)))
    }
}

/// Replays the failed call to surface the node's revert reason, if any.
async fn revert_reason<T, P>(req: &TransactionRequest, provider: &P) -> Option<String>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    match provider.call(req).await {
        Err(err) => Some(err.to_string()),
        Ok(_) => None,
    }
}

/// Fragile node-version-dependent heuristic for a duplicate broadcast;
/// treated as "likely in flight", never as confirmed success.
fn is_already_known(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("already known")
        || message.contains("alreadyknown")
        || message.contains("already_exists")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn executor(signer_count: usize, fallback_threshold: u64) -> Result<SafeExecutor, SafeError> {
        let signers = std::iter::repeat_with(|| PrivateKeySigner::from_str(KEY_0).unwrap())
            .take(signer_count)
            .collect();
        SafeExecutor::new(Address::repeat_byte(0x5a), signers, fallback_threshold)
    }

    #[test]
    fn rejects_empty_signer_set() {
        assert!(matches!(
            executor(0, 2),
            Err(SafeError::Configuration(_))
        ));
    }

    #[test]
    fn threshold_enforced_before_any_submission() {
        let exec = executor(1, 2).unwrap();
        assert!(matches!(
            exec.check_threshold(2),
            Err(SafeError::Configuration(_))
        ));
        assert!(exec.check_threshold(1).is_ok());
    }

    #[test]
    fn already_known_matches_node_phrasings() {
        assert!(is_already_known("transaction already known"));
        assert!(is_already_known("ALREADY_EXISTS: tx already in mempool"));
        assert!(!is_already_known("nonce too low"));
    }
}
