use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use parking_lot::Mutex;

use crate::common::types::RowLocation;
use crate::storage::error::{Result, StorageError};

/// HeapFile is the random-access byte container behind a table
///
/// It knows nothing about blocks or records; it reads and writes byte ranges.
pub struct HeapFile {
    file: Mutex<File>,
}

impl HeapFile {
    /// Open the file, creating it if it does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.as_ref())?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Current file length in bytes
    pub fn len(&self) -> Result<u64> {
        let file = self.file.lock();
        Ok(file.metadata()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Read up to `max_len` bytes starting at `offset`
    ///
    /// Returns fewer bytes near the end of the file and nothing past it.
    pub fn read_chunk(&self, offset: u64, max_len: usize) -> Result<Vec<u8>> {
        let mut file = self.file.lock();
        let file_size = file.metadata()?.len();
        if offset >= file_size {
            return Ok(Vec::new());
        }

        let available = (file_size - offset).min(max_len as u64) as usize;
        let mut buffer = vec![0u8; available];
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read exactly `len` bytes starting at `offset`
    pub fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let buffer = self.read_chunk(offset, len)?;
        if buffer.len() < len {
            return Err(StorageError::InvalidLocation {
                location: offset as RowLocation,
                reason: format!("needs {} bytes, file has {}", len, buffer.len()),
            });
        }
        Ok(buffer)
    }

    /// Write `bytes` at `offset`, extending the file if needed
    pub fn write_at(&self, offset: u64, bytes: &[u8]) -> Result<()> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(())
    }

    /// Flush file contents to stable storage
    pub fn sync(&self) -> Result<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }
}
