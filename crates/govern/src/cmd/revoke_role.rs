use alloy_primitives::{Address, U256};
use clap::Parser;
use govern_cli_runner::CliContext;

use crate::{
    cmd::utils::{run_operation, GovernanceOpts},
    common::NetworkConfig,
    contracts::{sig, ContractRole, RoleName},
    encode::encode_call,
};

#[derive(Debug, Parser)]
#[clap(about = "Revoke an access-control role on a governed contract through the timelock.")]
pub struct RevokeRoleCommand {
    #[arg(value_enum, value_name = "ROLE", help = "The role to revoke.")]
    role: RoleName,

    #[arg(value_name = "ACCOUNT", help = "The account losing the role.")]
    account: Address,

    #[arg(value_enum, value_name = "CONTRACT", help = "The contract holding the role.")]
    contract: ContractRole,

    #[clap(flatten)]
    opts: GovernanceOpts,
}

impl RevokeRoleCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = NetworkConfig::load(&self.opts.dirs, &self.opts.network)?;
        let target = config.address_for(self.contract);
        let calldata = encode_call(
            sig::REVOKE_ROLE,
            &[self.role.hash().to_string(), self.account.to_string()],
        )?;

        run_operation(
            &self.opts,
            &config,
            &format!(
                "revoke-role:{}:{}:{}",
                self.role.as_str(),
                self.account,
                self.contract.as_str()
            ),
            target,
            calldata,
            U256::ZERO,
            &format!(
                "Revoke the {} role on {} from {}",
                self.role.as_str(),
                self.contract.as_str(),
                self.account
            ),
        )
        .await
    }
}
