use alloy_primitives::{Address, U256};
use clap::Parser;
use govern_cli_runner::CliContext;

use crate::{
    cmd::utils::{run_operation, GovernanceOpts},
    common::NetworkConfig,
    contracts::sig,
    encode::encode_call,
};

#[derive(Debug, Parser)]
#[clap(about = "Withdraw unsold tokens from the sale contract through the timelock.")]
pub struct WithdrawTokensCommand {
    #[arg(value_name = "TO", help = "The address receiving the tokens.")]
    to: Address,

    #[arg(value_name = "AMOUNT", help = "The token amount to withdraw, in base units.")]
    amount: U256,

    #[clap(flatten)]
    opts: GovernanceOpts,
}

impl WithdrawTokensCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = NetworkConfig::load(&self.opts.dirs, &self.opts.network)?;
        let calldata = encode_call(
            sig::WITHDRAW_TOKENS,
            &[self.to.to_string(), self.amount.to_string()],
        )?;

        run_operation(
            &self.opts,
            &config,
            &format!("withdraw-tokens:{}:{}", self.to, self.amount),
            config.sale,
            calldata,
            U256::ZERO,
            &format!("Withdraw {} tokens from the sale to {}", self.amount, self.to),
        )
        .await
    }
}
