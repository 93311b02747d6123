//! Append-only key-value file with an in-memory index
//!
//! Every `set` appends a record to a single data file; the newest record for
//! a key wins. The index of key to value location is rebuilt by replaying the
//! file on open. Nothing is ever removed, so the file only grows.
//!
//! Record layout: `key_len: u32 LE | value_len: u32 LE | key | value`.

use crate::error::{Result, StorageError};
use std::collections::HashMap;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{info, warn};

const DATA_FILE: &str = "data";
const HEADER_LEN: usize = 8;

/// Location of a value inside the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    offset: u64,
    len: usize,
}

struct LogState {
    file: File,
    index: HashMap<Vec<u8>, Slot>,
    end: u64,
}

/// Persistent key-value store backed by one append-only file
pub struct LogStore {
    path: PathBuf,
    state: Mutex<LogState>,
}

impl LogStore {
    /// Open the store in `dir`, creating the directory and data file if needed
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;
        let path = dir.join(DATA_FILE);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await?;

        let file_len = file.metadata().await?.len();
        let (index, end) = replay(&mut file, file_len).await?;

        if end < file_len {
            warn!(
                path = ?path,
                valid = end,
                total = file_len,
                "Discarding torn record at end of cache file"
            );
            file.set_len(end).await?;
        }

        info!(path = ?path, entries = index.len(), size = end, "Cache file opened");

        Ok(Self {
            path,
            state: Mutex::new(LogState { file, index, end }),
        })
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut state = self.state.lock().await;
        let Some(slot) = state.index.get(key.as_bytes()).copied() else {
            return Ok(None);
        };

        let mut value = vec![0u8; slot.len];
        state.file.seek(SeekFrom::Start(slot.offset)).await?;
        state.file.read_exact(&mut value).await?;
        Ok(Some(value))
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.state.lock().await.index.contains_key(key.as_bytes())
    }

    pub async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let key_len = record_len(key.len())?;
        let value_len = record_len(value.len())?;

        let mut record = Vec::with_capacity(HEADER_LEN + key.len() + value.len());
        record.extend_from_slice(&key_len.to_le_bytes());
        record.extend_from_slice(&value_len.to_le_bytes());
        record.extend_from_slice(key.as_bytes());
        record.extend_from_slice(value);

        let mut state = self.state.lock().await;
        let start = state.end;
        state.file.seek(SeekFrom::Start(start)).await?;
        state.file.write_all(&record).await?;
        state.file.flush().await?;

        let slot = Slot {
            offset: start + (HEADER_LEN + key.len()) as u64,
            len: value.len(),
        };
        state.index.insert(key.as_bytes().to_vec(), slot);
        state.end = start + record.len() as u64;
        Ok(())
    }

    /// Number of distinct keys
    pub async fn len(&self) -> usize {
        self.state.lock().await.index.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Current size of the data file on disk, as reported by the filesystem
    pub async fn disk_size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path).await?.len())
    }
}

fn record_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        StorageError::from(io::Error::new(
            io::ErrorKind::InvalidInput,
            "record field exceeds 4 GiB",
        ))
    })
}

fn read_u32(bytes: &[u8]) -> usize {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf) as usize
}

/// Rebuild the index by walking the record headers of the first `file_len`
/// bytes. Values are skipped, not read. Returns the index and the offset just
/// past the last complete record.
async fn replay(file: &mut File, file_len: u64) -> Result<(HashMap<Vec<u8>, Slot>, u64)> {
    file.seek(SeekFrom::Start(0)).await?;
    let mut reader = BufReader::new(file);
    let mut index = HashMap::new();
    let mut header = [0u8; HEADER_LEN];
    let mut pos = 0u64;

    while file_len - pos >= HEADER_LEN as u64 {
        reader.read_exact(&mut header).await?;
        let key_len = read_u32(&header[..4]);
        let value_len = read_u32(&header[4..]);
        let value_start = pos + (HEADER_LEN + key_len) as u64;
        let next = value_start + value_len as u64;
        if next > file_len {
            break;
        }

        let mut key = vec![0u8; key_len];
        reader.read_exact(&mut key).await?;
        reader.seek(SeekFrom::Current(value_len as i64)).await?;

        index.insert(
            key,
            Slot {
                offset: value_start,
                len: value_len,
            },
        );
        pos = next;
    }

    Ok((index, pos))
}
