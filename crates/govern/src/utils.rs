use alloy_network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::{Client, Http};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use eyre::WrapErr;

/// Builds a filler-equipped HTTP provider that signs with `signer`.
pub fn get_signing_provider(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> eyre::Result<impl Provider<Http<Client>> + Clone> {
    let url = rpc_url
        .parse()
        .wrap_err_with(|| format!("invalid rpc url `{rpc_url}`"))?;

    Ok(ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url))
}

/// Builds a plain read-only HTTP provider.
pub fn get_provider(rpc_url: &str) -> eyre::Result<impl Provider<Http<Client>> + Clone> {
    let url = rpc_url
        .parse()
        .wrap_err_with(|| format!("invalid rpc url `{rpc_url}`"))?;

    Ok(ProviderBuilder::new().on_http(url))
}

pub fn print_success_message(message: &str) {
    println!("{}", message.bright_green().bold());
}

/// Prompts for confirmation unless `assume_yes` was passed on the CLI.
pub fn confirm(prompt: &str, assume_yes: bool) -> eyre::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| match e {
            dialoguer::Error::IO(e) => eyre::eyre!("confirmation prompt failed: {}", e),
        })
}
