use clap::{
    builder::{styling::AnsiColor, Styles},
    ArgAction, Parser, Subcommand,
};
use govern::cmd::{
    finalize_sale::FinalizeSaleCommand, grant_role::GrantRoleCommand, list::ListCommand,
    pause::PauseCommand, resume::ResumeCommand, revoke_role::RevokeRoleCommand,
    set_rate::SetRateCommand, status::StatusCommand, transfer_ownership::TransferOwnershipCommand,
    unpause::UnpauseCommand, withdraw_tokens::WithdrawTokensCommand,
};
use govern_cli_runner::CliRunner;
use govern_version::SHORT_VERSION;

/// The verbosity level.
pub type Verbosity = u8;

#[derive(Debug, Parser)]
#[command(
    name = "govern",
    about = "Multisig and timelock lifecycle driver for governed contract operations.",
    version = SHORT_VERSION.as_str(),
    term_width = 80,
    styles = get_color_style()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    /// Verbosity level of the log messages.
    ///
    /// Pass multiple times to increase the verbosity (e.g. -v, -vv, -vvv).
    #[arg(help_heading = "Display options", global = true, short, long, verbatim_doc_comment, action = ArgAction::Count)]
    verbosity: Verbosity,
}

impl Cli {
    pub fn run(self) -> eyre::Result<()> {
        self.init_tracing();
        tracing::debug!(version = %govern_version::version_with_platform(), "starting govern");

        let runner = CliRunner::default();
        match self.command {
            Commands::Pause(pause) => runner.run_command_until_exit(|ctx| pause.execute(ctx)),
            Commands::Unpause(unpause) => runner.run_command_until_exit(|ctx| unpause.execute(ctx)),
            Commands::SetRate(set_rate) => {
                runner.run_command_until_exit(|ctx| set_rate.execute(ctx))
            }
            Commands::GrantRole(grant_role) => {
                runner.run_command_until_exit(|ctx| grant_role.execute(ctx))
            }
            Commands::RevokeRole(revoke_role) => {
                runner.run_command_until_exit(|ctx| revoke_role.execute(ctx))
            }
            Commands::TransferOwnership(transfer_ownership) => {
                runner.run_command_until_exit(|ctx| transfer_ownership.execute(ctx))
            }
            Commands::WithdrawTokens(withdraw_tokens) => {
                runner.run_command_until_exit(|ctx| withdraw_tokens.execute(ctx))
            }
            Commands::FinalizeSale(finalize_sale) => {
                runner.run_command_until_exit(|ctx| finalize_sale.execute(ctx))
            }
            Commands::Status(status) => runner.run_command_until_exit(|ctx| status.execute(ctx)),
            Commands::List(list) => runner.run_command_until_exit(|ctx| list.execute(ctx)),
            Commands::Resume(resume) => runner.run_command_until_exit(|ctx| resume.execute(ctx)),
        }
    }

    fn init_tracing(&self) {
        let level = if self.debug || self.verbosity > 1 {
            "debug"
        } else if self.verbosity == 1 {
            "info"
        } else {
            "warn"
        };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "pause")]
    Pause(PauseCommand),

    #[command(name = "unpause")]
    Unpause(UnpauseCommand),

    #[command(name = "set-rate")]
    SetRate(SetRateCommand),

    #[command(name = "grant-role")]
    GrantRole(GrantRoleCommand),

    #[command(name = "revoke-role")]
    RevokeRole(RevokeRoleCommand),

    #[command(name = "transfer-ownership")]
    TransferOwnership(TransferOwnershipCommand),

    #[command(name = "withdraw-tokens")]
    WithdrawTokens(WithdrawTokensCommand),

    #[command(name = "finalize-sale")]
    FinalizeSale(FinalizeSaleCommand),

    #[command(name = "status")]
    Status(StatusCommand),

    #[command(name = "list")]
    List(ListCommand),

    #[command(name = "resume")]
    Resume(ResumeCommand),
}

fn get_color_style() -> Styles {
    Styles::styled()
        .usage(AnsiColor::Green.on_default().bold().underline())
        .header(AnsiColor::Yellow.on_default().bold().underline())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}
