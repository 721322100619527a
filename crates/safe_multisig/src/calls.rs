//! View reads against the Safe contract and execTransaction calldata
//! construction.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use alloy_transport::Transport;

use crate::{contracts::safe::Safe, transaction_data::SafeTransactionData};

pub async fn get_nonce<T, P>(safe: Address, provider: &P) -> eyre::Result<U256>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Safe::nonceCall::new(());

    let Safe::nonceReturn { _0: nonce } = call_and_decode(call, safe, provider).await?;

    Ok(nonce)
}

pub async fn get_threshold<T, P>(safe: Address, provider: &P) -> eyre::Result<U256>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Safe::getThresholdCall::new(());

    let Safe::getThresholdReturn { _0: threshold } = call_and_decode(call, safe, provider).await?;

    Ok(threshold)
}

pub async fn get_owners<T, P>(safe: Address, provider: &P) -> eyre::Result<Vec<Address>>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Safe::getOwnersCall::new(());

    let Safe::getOwnersReturn { _0: owners } = call_and_decode(call, safe, provider).await?;

    Ok(owners)
}

pub async fn get_domain_separator<T, P>(safe: Address, provider: &P) -> eyre::Result<B256>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let call = Safe::domainSeparatorCall::new(());

    let Safe::domainSeparatorReturn { _0: separator } =
        call_and_decode(call, safe, provider).await?;

    Ok(separator)
}

/// Builds the `execTransaction` calldata for an aggregated signature blob.
pub fn exec_transaction_calldata(safe_tx: &SafeTransactionData, signatures: Bytes) -> Bytes {
    let call = Safe::execTransactionCall::new((
        safe_tx.to,
        safe_tx.value,
        safe_tx.data.clone(),
        safe_tx.operation,
        safe_tx.safe_tx_gas,
        safe_tx.base_gas,
        safe_tx.gas_price,
        safe_tx.gas_token,
        safe_tx.refund_receiver,
        signatures,
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

    #[test]
    fn exec_transaction_calldata_starts_with_selector() {
        let tx = SafeTransactionData::call(
            Address::repeat_byte(0x22),
            U256::ZERO,
            Bytes::new(),
            U256::ZERO,
        );
        let calldata = exec_transaction_calldata(&tx, Bytes::new());

        let selector = &keccak256(
            "execTransaction(address,uint256,bytes,uint8,uint256,uint256,uint256,address,address,bytes)",
        )[..4];
        assert_eq!(&calldata[..4], selector);
    }
}
