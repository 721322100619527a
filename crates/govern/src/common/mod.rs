use clap::{value_parser, Parser};

use std::path::PathBuf;

use consts::DEFAULT_ROOT_DIR;

pub mod config;
pub mod consts;

pub use config::{NetworkConfig, RateBounds};

#[derive(Debug, Parser, Clone)]
pub struct DirsCliArgs {
    #[arg(
        long,
        required = false,
        value_parser = value_parser!(PathBuf),
        help = "Used to specify a custom root data directory for govern configuration and the operation ledger. \
                    Defaults to home_dir/.govern if the home dir is available, otherwise it defaults to `.` \
                    Note: Users should specify separate custom datadirs for different networks."
    )]
    data_dir: Option<PathBuf>,
}

impl DirsCliArgs {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(DEFAULT_ROOT_DIR))
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// The per-network directory holding `config.yml`, `signers.yml` and
    /// `operations.json`.
    pub fn network_dir(&self, network: &str) -> PathBuf {
        self.data_dir().join(network)
    }
}
