//! Durable record of governance operations, independent of chain state.
//!
//! Intent is persisted before any chain interaction so a crashed run can be
//! resumed from the ledger. Entries are never deleted; failed attempts stay
//! pending/ready for retry. Single-writer is assumed (operator-invoked
//! scripts, not a server); the file is replaced atomically to avoid
//! truncation on a crash mid-write.

use std::fs::File;
use std::path::{Path, PathBuf};

use alloy_primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use govern_primitives::dirs::ensure_dir_exists;
use govern_primitives::fs::write_file_via_temporary;
use serde::{Deserialize, Serialize};
use timelock::{OperationStatus, TimelockOperation};

/// The file name for the serialized ledger.
pub const LEDGER_FILENAME: &str = "operations.json";

/// The temporary file name used for atomic ledger updates.
pub const LEDGER_TEMP_FILENAME: &str = ".operations.json.tmp";

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("unable to open ledger: {0}")]
    UnableToOpenFile(std::io::Error),
    #[error("unable to parse ledger: {0}")]
    UnableToParseFile(serde_json::Error),
    #[error("unable to encode ledger: {0}")]
    UnableToEncodeFile(serde_json::Error),
    #[error("unable to write ledger: {0}")]
    UnableToWriteFile(govern_primitives::fs::FsError),
    #[error("unable to create ledger directory {0}")]
    UnableToCreateDir(PathBuf),
    #[error("no ledger entry for operation {0}")]
    NotFound(B256),
}

/// Persisted projection of a timelock operation plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: B256,
    pub target: Address,
    pub value: U256,
    pub data: Bytes,
    pub predecessor: B256,
    pub salt: B256,
    pub delay: u64,
    pub description: String,
    pub network: String,
    pub status: OperationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub executed: bool,
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// A fresh, not-yet-scheduled record of `op`.
    pub fn new(op: &TimelockOperation, description: String, network: String) -> Self {
        Self {
            id: op.id(),
            target: op.target,
            value: op.value,
            data: op.data.clone(),
            predecessor: op.predecessor,
            salt: op.salt,
            delay: op.delay,
            description,
            network,
            status: OperationStatus::Unknown,
            created_at: Utc::now(),
            scheduled_at: None,
            executed: false,
            executed_at: None,
        }
    }

    /// Rebuilds the in-memory operation from the persisted fields.
    pub fn operation(&self) -> TimelockOperation {
        TimelockOperation::new(
            self.target,
            self.value,
            self.data.clone(),
            self.salt,
            self.delay,
        )
        .with_predecessor(self.predecessor)
    }
}

/// Append/update store of [`LedgerEntry`] records backed by one JSON file.
pub struct OperationLedger {
    path: PathBuf,
    temp_path: PathBuf,
    entries: Vec<LedgerEntry>,
}

impl OperationLedger {
    /// Open an existing ledger or create an empty one if none exists.
    pub fn open_or_create<P: AsRef<Path>>(ledger_dir: P) -> Result<Self, LedgerError> {
        ensure_dir_exists(ledger_dir.as_ref())
            .map_err(|_| LedgerError::UnableToCreateDir(PathBuf::from(ledger_dir.as_ref())))?;

        let path = ledger_dir.as_ref().join(LEDGER_FILENAME);
        let temp_path = ledger_dir.as_ref().join(LEDGER_TEMP_FILENAME);

        let entries = if path.exists() {
            let file = File::open(&path).map_err(LedgerError::UnableToOpenFile)?;
            serde_json::from_reader(file).map_err(LedgerError::UnableToParseFile)?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            temp_path,
            entries,
        })
    }

    /// Upserts `entry`, merging with any existing record for the same id.
    ///
    /// Merging preserves the original `created_at` and keeps `executed`
    /// sticky, so a crashed re-run cannot roll history backwards.
    pub fn save(&mut self, mut entry: LedgerEntry) -> Result<(), LedgerError> {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            entry.created_at = existing.created_at;
            entry.executed |= existing.executed;
            if entry.status == OperationStatus::Unknown {
                entry.status = existing.status;
            }
            if entry.scheduled_at.is_none() {
                entry.scheduled_at = existing.scheduled_at;
            }
            if entry.executed_at.is_none() {
                entry.executed_at = existing.executed_at;
            }
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
        self.persist()
    }

    pub fn get_by_id(&self, id: &B256) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Entries, optionally filtered to one network, in insertion order.
    pub fn list(&self, network: Option<&str>) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| network.map_or(true, |n| e.network == n))
            .collect()
    }

    /// Records a lifecycle transition observed on-chain.
    pub fn set_status(&mut self, id: B256, status: OperationStatus) -> Result<(), LedgerError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        entry.status = status;
        if status == OperationStatus::Pending && entry.scheduled_at.is_none() {
            entry.scheduled_at = Some(Utc::now());
        }
        self.persist()
    }

    /// Marks an operation executed, stamping the execution time once.
    pub fn mark_executed(&mut self, id: B256) -> Result<(), LedgerError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        entry.status = OperationStatus::Done;
        entry.executed = true;
        if entry.executed_at.is_none() {
            entry.executed_at = Some(Utc::now());
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), LedgerError> {
        let bytes =
            serde_json::to_vec_pretty(&self.entries).map_err(LedgerError::UnableToEncodeFile)?;
        write_file_via_temporary(&self.path, &self.temp_path, &bytes)
            .map_err(LedgerError::UnableToWriteFile)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;
    use timelock::derive_salt;

    fn sample_op() -> TimelockOperation {
        TimelockOperation::new(
            Address::repeat_byte(0x42),
            U256::ZERO,
            Bytes::from_static(&[0x84, 0x56, 0xcb, 0x59]),
            derive_salt("pause", 1_700_000_000),
            3600,
        )
    }

    fn sample_entry(network: &str) -> LedgerEntry {
        LedgerEntry::new(&sample_op(), "pause the token".to_string(), network.to_string())
    }

    #[test]
    fn survives_restart() {
        let dir = tempdir().unwrap();
        let entry = sample_entry("sepolia");
        let id = entry.id;

        let mut ledger = OperationLedger::open_or_create(dir.path()).unwrap();
        ledger.save(entry.clone()).unwrap();
        drop(ledger);

        // Fresh load from the backing store.
        let reopened = OperationLedger::open_or_create(dir.path()).unwrap();
        let restored = reopened.get_by_id(&id).unwrap();
        assert_eq!(restored.target, entry.target);
        assert_eq!(restored.data, entry.data);
        assert_eq!(restored.salt, entry.salt);
    }

    #[test]
    fn upsert_merges_instead_of_overwriting() {
        let dir = tempdir().unwrap();
        let mut ledger = OperationLedger::open_or_create(dir.path()).unwrap();

        let entry = sample_entry("sepolia");
        let id = entry.id;
        let original_created_at = entry.created_at;
        ledger.save(entry).unwrap();
        ledger.mark_executed(id).unwrap();

        // A later save of a fresh projection must not reset history.
        let resaved = sample_entry("sepolia");
        ledger.save(resaved).unwrap();

        let merged = ledger.get_by_id(&id).unwrap();
        assert_eq!(merged.created_at, original_created_at);
        assert_eq!(merged.status, OperationStatus::Done);
        assert!(merged.executed);
        assert!(merged.executed_at.is_some());
        assert_eq!(ledger.list(None).len(), 1);
    }

    #[test]
    fn list_filters_by_network() {
        let dir = tempdir().unwrap();
        let mut ledger = OperationLedger::open_or_create(dir.path()).unwrap();

        ledger.save(sample_entry("sepolia")).unwrap();

        let mut mainnet_op = sample_op();
        mainnet_op.salt = derive_salt("pause", 1_700_000_001);
        ledger
            .save(LedgerEntry::new(&mainnet_op, "pause".to_string(), "mainnet".to_string()))
            .unwrap();

        assert_eq!(ledger.list(None).len(), 2);
        assert_eq!(ledger.list(Some("sepolia")).len(), 1);
        assert_eq!(ledger.list(Some("mainnet")).len(), 1);
        assert!(ledger.list(Some("holesky")).is_empty());
    }

    #[test]
    fn lifecycle_transitions_are_recorded() {
        let dir = tempdir().unwrap();
        let mut ledger = OperationLedger::open_or_create(dir.path()).unwrap();

        let entry = sample_entry("sepolia");
        let id = entry.id;
        ledger.save(entry).unwrap();

        ledger.set_status(id, OperationStatus::Pending).unwrap();
        assert!(ledger.get_by_id(&id).unwrap().scheduled_at.is_some());

        ledger.mark_executed(id).unwrap();
        let done = ledger.get_by_id(&id).unwrap();
        assert_eq!(done.status, OperationStatus::Done);
        assert!(done.executed);

        assert!(matches!(
            ledger.set_status(B256::repeat_byte(0x99), OperationStatus::Pending),
            Err(LedgerError::NotFound(_))
        ));
    }
}
