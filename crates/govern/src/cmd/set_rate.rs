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
#[clap(about = "Change the sale contract's exchange rate through the timelock.")]
pub struct SetRateCommand {
    #[arg(value_name = "RATE", help = "The new token/ether exchange rate.")]
    rate: U256,

    #[clap(flatten)]
    opts: GovernanceOpts,
}

impl SetRateCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = NetworkConfig::load(&self.opts.dirs, &self.opts.network)?;

        // Refuse out-of-bounds rates before anything is recorded or signed.
        if let Some(bounds) = &config.rate_bounds {
            if !bounds.contains(self.rate) {
                eyre::bail!(
                    "rate {} is outside the configured bounds [{}, {}]",
                    self.rate,
                    bounds.min,
                    bounds.max
                );
            }
        }

        let calldata = encode_call(sig::SET_RATE, &[self.rate.to_string()])?;

        run_operation(
            &self.opts,
            &config,
            &format!("set-rate:{}", self.rate),
            config.sale,
            calldata,
            U256::ZERO,
            &format!("Set the sale rate to {}", self.rate),
        )
        .await
    }
}
