use alloy_primitives::U256;
use clap::Parser;
use govern_cli_runner::CliContext;

use crate::{
    cmd::utils::{run_operation, GovernanceOpts},
    common::NetworkConfig,
    contracts::sig,
    encode::encode_call,
};

#[derive(Debug, Parser)]
#[clap(about = "Finalize the sale contract through the timelock. Irreversible.")]
pub struct FinalizeSaleCommand {
    #[clap(flatten)]
    opts: GovernanceOpts,
}

impl FinalizeSaleCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = NetworkConfig::load(&self.opts.dirs, &self.opts.network)?;
        let calldata = encode_call(sig::FINALIZE, &[])?;

        run_operation(
            &self.opts,
            &config,
            "finalize-sale",
            config.sale,
            calldata,
            U256::ZERO,
            "Finalize the sale contract",
        )
        .await
    }
}
