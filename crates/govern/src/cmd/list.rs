use clap::Parser;
use colored::Colorize;
use govern_cli_runner::CliContext;
use op_ledger::OperationLedger;

use crate::common::DirsCliArgs;

#[derive(Debug, Parser)]
#[clap(about = "List the operations recorded in the local ledger.")]
pub struct ListCommand {
    #[arg(long, value_name = "NETWORK", help = "The target network name.")]
    network: String,

    #[clap(flatten)]
    dirs: DirsCliArgs,
}

impl ListCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let ledger = OperationLedger::open_or_create(self.dirs.network_dir(&self.network))?;
        let entries = ledger.list(Some(&self.network));

        if entries.is_empty() {
            println!("No operations recorded for {}.", self.network);
            return Ok(());
        }

        for entry in entries {
            let status = if entry.executed {
                "executed".bright_green()
            } else {
                entry.status.to_string().yellow()
            };
            println!(
                "{}  {}  {}",
                entry.id,
                format!("{:<9}", status),
                entry.description
            );
        }

        Ok(())
    }
}
