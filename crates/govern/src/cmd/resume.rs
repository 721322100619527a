use alloy_primitives::B256;
use clap::Parser;
use govern_cli_runner::CliContext;
use op_ledger::OperationLedger;

use crate::{
    cmd::utils::{drive_operation, GovernanceOpts},
    common::NetworkConfig,
};

#[derive(Debug, Parser)]
#[clap(about = "Resume a previously recorded operation from where it left off.")]
pub struct ResumeCommand {
    #[arg(value_name = "OPERATION_ID", help = "The operation id to resume.")]
    id: B256,

    #[clap(flatten)]
    opts: GovernanceOpts,
}

impl ResumeCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = NetworkConfig::load(&self.opts.dirs, &self.opts.network)?;

        let ledger = OperationLedger::open_or_create(self.opts.dirs.network_dir(&self.opts.network))?;
        let entry = ledger
            .get_by_id(&self.id)
            .ok_or_else(|| eyre::eyre!("no ledger entry for operation {}", self.id))?;
        let op = entry.operation();
        let description = entry.description.clone();
        drop(ledger);

        drive_operation(&self.opts, &config, &op, &description).await
    }
}
