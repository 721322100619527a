//! Shared plumbing for the governance drivers: flag surface, wiring, and the
//! common schedule/wait/execute loop every mutating command runs through.

use std::time::Duration;

use account_utils::SignerDefinitions;
use alloy_primitives::{Address, Bytes, B256, U256};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use op_ledger::OperationLedger;
use safe_multisig::SafeExecutor;
use timelock::{derive_salt, TimelockManager, TimelockOperation, WaitOutcome};

use crate::{
    common::{DirsCliArgs, NetworkConfig},
    ops::{ensure_operation, EnsureOutcome},
    utils::{confirm, get_signing_provider, print_success_message},
};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Flags shared by every operation-driving command.
#[derive(Debug, Parser, Clone)]
pub struct GovernanceOpts {
    #[arg(long, value_name = "NETWORK", help = "The target network name.")]
    pub network: String,

    #[clap(flatten)]
    pub dirs: DirsCliArgs,

    #[arg(long, help = "Skip the confirmation prompt.")]
    pub yes: bool,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Keep polling for readiness up to this many seconds, executing once ready."
    )]
    pub max_wait: Option<u64>,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_POLL_INTERVAL_SECS,
        help = "Seconds between readiness polls when --max-wait is set."
    )]
    pub poll_interval: u64,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Requested timelock delay. Raised to the contract minimum if lower."
    )]
    pub delay: Option<u64>,

    #[arg(
        long,
        value_name = "SALT",
        help = "Explicit operation salt. Defaults to a salt derived from the action and current time."
    )]
    pub salt: Option<B256>,
}

/// Runs one governance action end to end: persist the ledger entry, take the
/// next lifecycle step, optionally wait for readiness and execute.
pub async fn run_operation(
    opts: &GovernanceOpts,
    config: &NetworkConfig,
    action: &str,
    target: Address,
    calldata: Bytes,
    value: U256,
    description: &str,
) -> eyre::Result<()> {
    let salt = opts
        .salt
        .unwrap_or_else(|| derive_salt(action, Utc::now().timestamp()));
    let op = TimelockOperation::new(target, value, calldata, salt, opts.delay.unwrap_or(0));
    drive_operation(opts, config, &op, description).await
}

/// Drives an already-built operation; `resume` re-enters here with an
/// operation rebuilt from its ledger entry.
pub async fn drive_operation(
    opts: &GovernanceOpts,
    config: &NetworkConfig,
    op: &TimelockOperation,
    description: &str,
) -> eyre::Result<()> {
    let network_dir = opts.dirs.network_dir(&opts.network);
    govern_primitives::dirs::ensure_dir_exists(&network_dir)?;

    let definitions = SignerDefinitions::open(&network_dir)?;
    let keys = definitions.signing_keys()?;
    let executor = SafeExecutor::new(config.safe, keys.clone(), definitions.threshold)?;

    let submitter = keys
        .first()
        .ok_or_else(|| eyre::eyre!("no enabled signing keys in {}", network_dir.display()))?
        .clone();
    let provider = get_signing_provider(&config.rpc_url, submitter)?;

    let manager = TimelockManager::new(config.timelock);
    let mut ledger = OperationLedger::open_or_create(&network_dir)?;

    let id = op.id();

    println!("{}", description.bright_cyan().bold());
    println!("  operation id: {}", id);
    println!("  target:       {}", op.target);
    println!("  safe:         {}", config.safe);
    println!("  timelock:     {}", config.timelock);

    if !confirm("Proceed?", opts.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let outcome = ensure_operation(
        &manager,
        &executor,
        &mut ledger,
        op,
        description,
        &opts.network,
        &provider,
    )
    .await?;
    report_outcome(&outcome, id);

    let should_wait = matches!(
        outcome,
        EnsureOutcome::Scheduled | EnsureOutcome::Waiting { .. }
    );
    if let (Some(max_wait), true) = (opts.max_wait, should_wait) {
        println!("Waiting up to {}s for readiness...", max_wait);
        let waited = manager
            .wait_until_ready(
                id,
                Duration::from_secs(max_wait),
                Duration::from_secs(opts.poll_interval),
                &provider,
            )
            .await?;
        match waited {
            WaitOutcome::Ready => {
                let outcome = ensure_operation(
                    &manager,
                    &executor,
                    &mut ledger,
                    op,
                    description,
                    &opts.network,
                    &provider,
                )
                .await?;
                report_outcome(&outcome, id);
            }
            WaitOutcome::TimedOut { waited } => {
                // Record the last observed chain state before giving up, so
                // the local ledger stays aligned for a later resume.
                let state = manager.status(id, &provider).await?;
                ledger.set_status(id, state.status())?;
                println!(
                    "Not ready after {}s. Re-run this command (or `govern resume {}`) later.",
                    waited.as_secs(),
                    id
                );
            }
        }
    }

    Ok(())
}

fn report_outcome(outcome: &EnsureOutcome, id: B256) {
    match outcome {
        EnsureOutcome::Scheduled => {
            print_success_message(&format!("Operation {} scheduled.", id));
        }
        EnsureOutcome::Waiting { ready_at } => match ready_at {
            Some(ts) => println!("Operation {} is pending; ready at unix time {}.", id, ts),
            None => println!("Operation {} is pending.", id),
        },
        EnsureOutcome::Executed => {
            print_success_message(&format!("Operation {} executed.", id));
        }
        EnsureOutcome::InFlight => {
            println!(
                "A transaction for operation {} is already in the mempool; check `govern status` shortly.",
                id
            );
        }
        EnsureOutcome::AlreadyDone => {
            println!("Operation {} has already been executed.", id);
        }
    }
}
