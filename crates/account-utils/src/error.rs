use std::{io, path::PathBuf};

use alloy_signer_local::LocalSignerError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The signers file could not be opened.
    #[error("unable to open signer definitions: {0}")]
    UnableToOpenFile(io::Error),
    /// The signers file could not be parsed as YAML.
    #[error("unable to parse signer definitions: {0}")]
    UnableToParseFile(serde_yaml::Error),
    /// The signers file could not be serialized as YAML.
    #[error("unable to encode signer definitions: {0}")]
    UnableToEncodeFile(serde_yaml::Error),
    /// The signers file or temp file could not be written to the filesystem.
    #[error("unable to write signer definitions: {0}")]
    UnableToWriteFile(govern_primitives::fs::FsError),
    /// The signers directory could not be created.
    #[error("unable to create signers directory {0}")]
    UnableToCreateSignersDir(PathBuf),
    /// A listed signer holds key material that does not parse as a key.
    #[error("signer at index {index} holds an invalid private key: {source}")]
    InvalidPrivateKey {
        index: usize,
        source: LocalSignerError,
    },
}
