use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy_signer_local::PrivateKeySigner;
use govern_primitives::dirs::ensure_dir_exists;
use govern_primitives::fs::write_file_via_temporary;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ZeroizeString;

/// The file name for the serialized `SignerDefinitions` struct.
pub const CONFIG_FILENAME: &str = "signers.yml";

/// The temporary file name for the serialized `SignerDefinitions` struct.
///
/// This is used to achieve an atomic update of the contents on disk, without truncation.
pub const CONFIG_TEMP_FILENAME: &str = ".signers.yml.tmp";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerDefinition {
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
    pub private_key: ZeroizeString,
}

/// An ordered list of Safe co-signers plus the approval threshold, as a
/// serde-able configuration file.
///
/// Order matters: the first `threshold` enabled signers are the ones asked
/// to co-sign, and the order is kept stable for reproducible runs.
#[derive(Default, Serialize, Deserialize, Clone)]
pub struct SignerDefinitions {
    pub threshold: u64,
    pub signers: Vec<SignerDefinition>,
}

impl SignerDefinitions {
    /// Open an existing file or create a new, empty one if it does not exist.
    pub fn open_or_create<P: AsRef<Path>>(signers_dir: P) -> Result<Self, Error> {
        ensure_dir_exists(signers_dir.as_ref())
            .map_err(|_| Error::UnableToCreateSignersDir(PathBuf::from(signers_dir.as_ref())))?;
        let config_path = signers_dir.as_ref().join(CONFIG_FILENAME);
        if !config_path.exists() {
            let this = Self::default();
            this.save(&signers_dir)?;
        }
        Self::open(signers_dir)
    }

    /// Open an existing file, returning an error if the file does not exist.
    pub fn open<P: AsRef<Path>>(signers_dir: P) -> Result<Self, Error> {
        let config_path = signers_dir.as_ref().join(CONFIG_FILENAME);
        let file = File::options()
            .write(true)
            .read(true)
            .create_new(false)
            .open(config_path)
            .map_err(Error::UnableToOpenFile)?;
        serde_yaml::from_reader(file).map_err(Error::UnableToParseFile)
    }

    /// Encodes self as a YAML string and atomically writes it to the
    /// `CONFIG_FILENAME` file in the `signers_dir` directory.
    pub fn save<P: AsRef<Path>>(&self, signers_dir: P) -> Result<(), Error> {
        let config_path = signers_dir.as_ref().join(CONFIG_FILENAME);
        let temp_path = signers_dir.as_ref().join(CONFIG_TEMP_FILENAME);
        let bytes = serde_yaml::to_string(self).map_err(Error::UnableToEncodeFile)?;

        write_file_via_temporary(&config_path, &temp_path, bytes.as_bytes())
            .map_err(Error::UnableToWriteFile)?;

        Ok(())
    }

    pub fn push(&mut self, def: SignerDefinition) {
        self.signers.push(def);
    }

    /// Parses the enabled signers into signing keys, preserving file order.
    pub fn signing_keys(&self) -> Result<Vec<PrivateKeySigner>, Error> {
        self.signers
            .iter()
            .enumerate()
            .filter(|(_, def)| def.enabled)
            .map(|(index, def)| {
                PrivateKeySigner::from_str(def.private_key.as_str())
                    .map_err(|source| Error::InvalidPrivateKey { index, source })
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    // Well-known throwaway development keys.
    const KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn definition(key: &str) -> SignerDefinition {
        SignerDefinition {
            enabled: true,
            description: String::new(),
            private_key: ZeroizeString::from(key.to_string()),
        }
    }

    #[test]
    fn open_or_create_round_trips() {
        let dir = tempdir().unwrap();

        let mut defs = SignerDefinitions::open_or_create(dir.path()).unwrap();
        assert_eq!(defs.threshold, 0);
        assert!(defs.signers.is_empty());

        defs.threshold = 2;
        defs.push(definition(KEY_0));
        defs.push(definition(KEY_1));
        defs.save(dir.path()).unwrap();

        let reopened = SignerDefinitions::open(dir.path()).unwrap();
        assert_eq!(reopened.threshold, 2);
        assert_eq!(reopened.signers.len(), 2);
        assert_eq!(reopened.signers[0].private_key.as_str(), KEY_0);
    }

    #[test]
    fn signing_keys_preserve_order_and_skip_disabled() {
        let mut defs = SignerDefinitions {
            threshold: 1,
            signers: vec![definition(KEY_0), definition(KEY_1)],
        };
        defs.signers[0].enabled = false;

        let keys = defs.signing_keys().unwrap();
        assert_eq!(keys.len(), 1);
        // KEY_1's well-known address.
        assert_eq!(
            keys[0].address().to_string().to_lowercase(),
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
    }

    #[test]
    fn malformed_key_is_rejected_with_index() {
        let defs = SignerDefinitions {
            threshold: 1,
            signers: vec![definition(KEY_0), definition("0xnotakey")],
        };

        match defs.signing_keys() {
            Err(Error::InvalidPrivateKey { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidPrivateKey, got {other:?}"),
        }
    }
}
