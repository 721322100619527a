//! Entrypoint plumbing for CLI commands: a dedicated tokio runtime per
//! invocation, with ctrl-c terminating the command cleanly.

use std::future::Future;

use tracing::trace;

/// Context passed to every command's `execute`.
///
/// Created once per process invocation and passed by reference through the
/// command tree; commands must not stash global state elsewhere.
#[derive(Debug, Default)]
pub struct CliContext;

/// Runs commands to completion on a multi-threaded tokio runtime.
#[derive(Debug, Default)]
pub struct CliRunner;

impl CliRunner {
    /// Executes `command` until it finishes or ctrl-c is received.
    pub fn run_command_until_exit<F, E>(
        &self,
        command: impl FnOnce(CliContext) -> F,
    ) -> Result<(), E>
    where
        F: Future<Output = Result<(), E>>,
        E: Send + Sync + From<std::io::Error> + 'static,
    {
        let runtime = tokio_runtime().map_err(E::from)?;
        let out = runtime.block_on(run_until_ctrl_c(command(CliContext)));

        // Drop the runtime on a separate thread so lingering blocking tasks
        // cannot stall process exit.
        std::thread::spawn(move || drop(runtime));

        out
    }
}

fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: From<std::io::Error>,
{
    tokio::select! {
        res = fut => res,
        _ = tokio::signal::ctrl_c() => {
            trace!(target: "govern::cli", "received ctrl-c, shutting down");
            Ok(())
        }
    }
}
