//! Network-scoped signer credentials for the governance Safe: an ordered
//! list of signing keys plus the approval threshold, stored as YAML.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

mod error;
mod signer_definitions;

pub use error::Error;
pub use signer_definitions::{
    SignerDefinition, SignerDefinitions, CONFIG_FILENAME, CONFIG_TEMP_FILENAME,
};

/// A string wrapper whose contents are wiped from memory on drop.
///
/// Used for raw private keys so they are never left behind in freed buffers.
#[derive(Clone, PartialEq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct ZeroizeString(String);

impl ZeroizeString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ZeroizeString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Debug for ZeroizeString {
    // Never reveal key material through Debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ZeroizeString(..)")
    }
}
