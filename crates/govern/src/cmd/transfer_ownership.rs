use alloy_primitives::{Address, U256};
use clap::Parser;
use govern_cli_runner::CliContext;

use crate::{
    cmd::utils::{run_operation, GovernanceOpts},
    common::NetworkConfig,
    contracts::{sig, ContractRole},
    encode::encode_call,
};

#[derive(Debug, Parser)]
#[clap(about = "Transfer ownership of a governed contract through the timelock.")]
pub struct TransferOwnershipCommand {
    #[arg(value_enum, value_name = "CONTRACT", help = "The contract to transfer.")]
    contract: ContractRole,

    #[arg(value_name = "NEW_OWNER", help = "The new owner address.")]
    new_owner: Address,

    #[clap(flatten)]
    opts: GovernanceOpts,
}

impl TransferOwnershipCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = NetworkConfig::load(&self.opts.dirs, &self.opts.network)?;
        let target = config.address_for(self.contract);
        let calldata = encode_call(sig::TRANSFER_OWNERSHIP, &[self.new_owner.to_string()])?;

        run_operation(
            &self.opts,
            &config,
            &format!(
                "transfer-ownership:{}:{}",
                self.contract.as_str(),
                self.new_owner
            ),
            target,
            calldata,
            U256::ZERO,
            &format!(
                "Transfer ownership of {} to {}",
                self.contract.as_str(),
                self.new_owner
            ),
        )
        .await
    }
}
