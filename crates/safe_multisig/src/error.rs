use alloy_primitives::Address;

/// Failure taxonomy for multisig execution.
///
/// `Configuration` and `Signing` are fatal and never retried. `Transient`
/// failures are safe to retry from the caller. `Execution` is an on-chain
/// revert and must not be resubmitted automatically.
#[derive(Debug, thiserror::Error)]
pub enum SafeError {
    #[error("configuration: {0}")]
    Configuration(String),

    #[error("signer {signer} failed to produce a signature: {source}")]
    Signing {
        signer: Address,
        #[source]
        source: alloy_signer::Error,
    },

    #[error("transient chain error: {0}")]
    Transient(String),

    #[error("execution reverted at {target}: {reason}")]
    Execution { target: Address, reason: String },
}
