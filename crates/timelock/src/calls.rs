//! Read-only timelock queries and calldata builders for its mutating entry
//! points. All mutations are routed through the Safe, never called directly.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;

use crate::{contracts::Timelock, operation::TimelockOperation};

pub async fn is_operation<T, P>(id: B256, timelock: Address, provider: &P) -> eyre::Result<bool>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Timelock::isOperationCall::new((id,));

    let Timelock::isOperationReturn { _0: exists } =
        call_and_decode(call, timelock, provider).await?;

    Ok(exists)
}

pub async fn is_operation_pending<T, P>(
    id: B256,
    timelock: Address,
    provider: &P,
) -> eyre::Result<bool>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Timelock::isOperationPendingCall::new((id,));

    let Timelock::isOperationPendingReturn { _0: pending } =
        call_and_decode(call, timelock, provider).await?;

    Ok(pending)
}

pub async fn is_operation_ready<T, P>(
    id: B256,
    timelock: Address,
    provider: &P,
) -> eyre::Result<bool>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Timelock::isOperationReadyCall::new((id,));

    let Timelock::isOperationReadyReturn { _0: ready } =
        call_and_decode(call, timelock, provider).await?;

    Ok(ready)
}

pub async fn is_operation_done<T, P>(
    id: B256,
    timelock: Address,
    provider: &P,
) -> eyre::Result<bool>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Timelock::isOperationDoneCall::new((id,));

    let Timelock::isOperationDoneReturn { _0: done } =
        call_and_decode(call, timelock, provider).await?;

    Ok(done)
}

/// The timestamp at which the operation becomes ready (1 once done).
pub async fn get_timestamp<T, P>(id: B256, timelock: Address, provider: &P) -> eyre::Result<U256>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Timelock::getTimestampCall::new((id,));

    let Timelock::getTimestampReturn { _0: timestamp } =
        call_and_decode(call, timelock, provider).await?;

    Ok(timestamp)
}

pub async fn get_min_delay<T, P>(timelock: Address, provider: &P) -> eyre::Result<U256>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Timelock::getMinDelayCall::new(());

    let Timelock::getMinDelayReturn { _0: delay } =
        call_and_decode(call, timelock, provider).await?;

    Ok(delay)
}

/// Builds the `schedule` calldata for an operation with the given delay.
pub fn schedule_calldata(op: &TimelockOperation, delay: u64) -> Bytes {
    let call = Timelock::scheduleCall::new((
        op.target,
        op.value,
        op.data.clone(),
        op.predecessor,
        op.salt,
        U256::from(delay),
    ));

    call.abi_encode().into()
}

/// Builds the `execute` calldata for a ready operation.
pub fn execute_calldata(op: &TimelockOperation) -> Bytes {
    let call = Timelock::executeCall::new((
        op.target,
        op.value,
        op.data.clone(),
        op.predecessor,
        op.salt,
    ));

    call.abi_encode().into()
}

/// Private function to make a contract call and decode the response
async fn call_and_decode<C: SolCall, T, P>(
    call: C,
    to: Address,
    provider: &P,
) -> eyre::Result<C::Return>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call_data: Vec<u8> = call.abi_encode();

    let mut req = TransactionRequest::default().to(to);
    req.set_input(call_data);

    let data = provider.call(&req).await?;
    let data = C::abi_decode_returns(data.as_ref(), true)?;

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;
    use crate::operation::derive_salt;

    fn sample() -> TimelockOperation {
        TimelockOperation::new(
            Address::repeat_byte(0x42),
            U256::ZERO,
            Bytes::from_static(&[0x84, 0x56, 0xcb, 0x59]),
            derive_salt("pause", 1_700_000_000),
            3600,
        )
    }

    #[test]
    fn schedule_calldata_starts_with_selector() {
        let calldata = schedule_calldata(&sample(), 3600);
        let selector = &keccak256("schedule(address,uint256,bytes,bytes32,bytes32,uint256)")[..4];
        assert_eq!(&calldata[..4], selector);
    }

    #[test]
    fn execute_calldata_starts_with_selector() {
        let calldata = execute_calldata(&sample());
        let selector = &keccak256("execute(address,uint256,bytes,bytes32,bytes32)")[..4];
        assert_eq!(&calldata[..4], selector);
    }
}
