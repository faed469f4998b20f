//! # File-Backed Ledger
//!
//! Durable `LedgerStore` that keeps the key space in memory and rewrites one
//! binary file on every mutation.
//!
//! ## File Format
//!
//! A sequence of records, little-endian lengths:
//!
//! ```text
//! [key_len: u32][key bytes][value_len: u32][value bytes] ...
//! ```
//!
//! Saves go through `<path>.tmp` followed by a rename, so a crash mid-write
//! leaves the previous file intact.

use crate::errors::LedgerError;
use crate::ports::outbound::LedgerStore;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// File-backed implementation of `LedgerStore`.
pub struct FileBackedLedger {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    path: PathBuf,
}

impl FileBackedLedger {
    /// Open the ledger at `path`, loading it if the file exists.
    ///
    /// A missing file is an empty ledger. A truncated or malformed file is an
    /// error rather than silently starting empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();

        let data = match fs::read(&path) {
            Ok(bytes) => {
                let data = decode_file(&bytes).map_err(|reason| LedgerError::Corrupted {
                    key: path.display().to_string(),
                    reason,
                })?;
                info!(path = %path.display(), keys = data.len(), "ledger loaded");
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no ledger file, starting empty");
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            data: RwLock::new(data),
            path,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, data: &HashMap<Vec<u8>, Vec<u8>>) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = encode_file(data)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "ledger saved");
        Ok(())
    }
}

impl LedgerStore for FileBackedLedger {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LedgerError> {
        let data = self.data.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(data.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), LedgerError> {
        let mut data = self.data.write().map_err(|_| LedgerError::LockPoisoned)?;
        let previous = data.insert(key.to_vec(), value.to_vec());
        if let Err(e) = self.save(&data) {
            // Keep memory in step with the file
            match previous {
                Some(old) => data.insert(key.to_vec(), old),
                None => data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), LedgerError> {
        let mut data = self.data.write().map_err(|_| LedgerError::LockPoisoned)?;
        let Some(previous) = data.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.save(&data) {
            data.insert(key.to_vec(), previous);
            return Err(e);
        }
        Ok(())
    }
}

fn encode_file(data: &HashMap<Vec<u8>, Vec<u8>>) -> Result<Vec<u8>, LedgerError> {
    // Sorted so identical key spaces produce identical files
    let mut entries: Vec<_> = data.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut bytes = Vec::new();
    for (key, value) in entries {
        write_chunk(&mut bytes, key)?;
        write_chunk(&mut bytes, value)?;
    }
    Ok(bytes)
}

fn write_chunk(out: &mut Vec<u8>, chunk: &[u8]) -> Result<(), LedgerError> {
    let len = u32::try_from(chunk.len()).map_err(|_| LedgerError::Io {
        message: format!("entry of {} bytes exceeds the file format limit", chunk.len()),
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(chunk);
    Ok(())
}

fn decode_file(bytes: &[u8]) -> Result<HashMap<Vec<u8>, Vec<u8>>, String> {
    let mut data = HashMap::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let key = read_chunk(bytes, &mut cursor)?;
        let value = read_chunk(bytes, &mut cursor)?;
        data.insert(key, value);
    }

    Ok(data)
}

fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, String> {
    let header = bytes
        .get(*cursor..*cursor + 4)
        .ok_or_else(|| format!("truncated length at offset {}", *cursor))?;
    let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
    *cursor += 4;

    let chunk = bytes
        .get(*cursor..*cursor + len)
        .ok_or_else(|| format!("truncated entry at offset {}", *cursor))?;
    *cursor += len;
    Ok(chunk.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = FileBackedLedger::open(temp_dir.path().join("ledger.bin")).unwrap();
        assert_eq!(ledger.get(b"abc").unwrap(), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("ledger.bin");

        {
            let ledger = FileBackedLedger::open(&path).unwrap();
            ledger.put(b"abc", b"100").unwrap();
            ledger.put(b"_contractindex", b"[\"meat\"]").unwrap();
            ledger.put(b"gone", b"x").unwrap();
            ledger.delete(b"gone").unwrap();
        }

        let ledger = FileBackedLedger::open(&path).unwrap();
        assert_eq!(ledger.get(b"abc").unwrap(), Some(b"100".to_vec()));
        assert_eq!(
            ledger.get(b"_contractindex").unwrap(),
            Some(b"[\"meat\"]".to_vec())
        );
        assert_eq!(ledger.get(b"gone").unwrap(), None);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_empty_value_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.bin");

        FileBackedLedger::open(&path).unwrap().put(b"k", b"").unwrap();
        let ledger = FileBackedLedger::open(&path).unwrap();
        assert_eq!(ledger.get(b"k").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.bin");
        // key_len = 3 but only two key bytes follow
        fs::write(&path, [3, 0, 0, 0, b'a', b'b']).unwrap();

        let result = FileBackedLedger::open(&path);
        assert!(matches!(result, Err(LedgerError::Corrupted { .. })));
    }

    #[test]
    fn test_file_is_deterministic() {
        let mut data = HashMap::new();
        data.insert(b"b".to_vec(), b"2".to_vec());
        data.insert(b"a".to_vec(), b"1".to_vec());

        let bytes = encode_file(&data).unwrap();
        assert_eq!(
            bytes,
            vec![1, 0, 0, 0, b'a', 1, 0, 0, 0, b'1', 1, 0, 0, 0, b'b', 1, 0, 0, 0, b'2']
        );
        assert_eq!(decode_file(&bytes).unwrap(), data);
    }
}
