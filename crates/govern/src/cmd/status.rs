use alloy_primitives::B256;
use chrono::DateTime;
use clap::Parser;
use colored::Colorize;
use govern_cli_runner::CliContext;
use op_ledger::OperationLedger;
use timelock::TimelockManager;

use crate::{
    common::{DirsCliArgs, NetworkConfig},
    utils::get_provider,
};

#[derive(Debug, Parser)]
#[clap(about = "Show the on-chain and ledger state of an operation.")]
pub struct StatusCommand {
    #[arg(value_name = "OPERATION_ID", help = "The operation id to look up.")]
    id: B256,

    #[arg(long, value_name = "NETWORK", help = "The target network name.")]
    network: String,

    #[clap(flatten)]
    dirs: DirsCliArgs,
}

impl StatusCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let config = NetworkConfig::load(&self.dirs, &self.network)?;
        let provider = get_provider(&config.rpc_url)?;
        let manager = TimelockManager::new(config.timelock);

        let state = manager.status(self.id, &provider).await?;
        println!("{}", format!("Operation {}", self.id).bright_cyan().bold());
        println!("  on-chain status: {}", state.status().to_string().bold());
        if let Some(ready_at) = state.ready_at {
            match DateTime::from_timestamp(ready_at as i64, 0) {
                Some(ts) => println!("  ready at:        {} ({})", ready_at, ts),
                None => println!("  ready at:        {}", ready_at),
            }
        }

        let ledger = OperationLedger::open_or_create(self.dirs.network_dir(&self.network))?;
        match ledger.get_by_id(&self.id) {
            Some(entry) => {
                println!("  description:     {}", entry.description);
                println!("  target:          {}", entry.target);
                println!("  created at:      {}", entry.created_at);
                if let Some(scheduled_at) = entry.scheduled_at {
                    println!("  scheduled at:    {}", scheduled_at);
                }
                if let Some(executed_at) = entry.executed_at {
                    println!("  executed at:     {}", executed_at);
                }
            }
            None => println!("  (no ledger entry on this machine)"),
        }

        Ok(())
    }
}
