use alloy_primitives::U256;
use clap::Parser;
use govern_cli_runner::CliContext;

use crate::{
    cmd::utils::{run_operation, GovernanceOpts},
    common::NetworkConfig,
    contracts::{sig, ContractRole},
    encode::encode_call,
};

#[derive(Debug, Parser)]
#[clap(about = "Unpause a governed contract through the timelock.")]
pub struct UnpauseCommand {
    #[arg(value_enum, value_name = "CONTRACT", help = "The contract to unpause.")]
    contract: ContractRole,

    #[clap(flatten)]
    opts: GovernanceOpts,
}

impl UnpauseCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = NetworkConfig::load(&self.opts.dirs, &self.opts.network)?;
        let target = config.address_for(self.contract);
        let calldata = encode_call(sig::UNPAUSE, &[])?;

        run_operation(
            &self.opts,
            &config,
            &format!("unpause:{}", self.contract.as_str()),
            target,
            calldata,
            U256::ZERO,
            &format!("Unpause the {} contract", self.contract.as_str()),
        )
        .await
    }
}
