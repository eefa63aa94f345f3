//! Dump Archive Module
//!
//! Persists the ordered chunk list of a filter dump so it can be loaded back
//! into a server later.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Magic "BKVDUMP1" (8)                    │
//! ├─────────────────────────────────────────┤
//! │ Entry 1                                 │
//! │ ┌─────────┬─────────┬────────────────┐  │
//! │ │ CRC (4) │ Len (4) │ Data (bincode) │  │
//! │ └─────────┴─────────┴────────────────┘  │
//! ├─────────────────────────────────────────┤
//! │ Entry 2 ...                             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The CRC covers `Data`. Entries are read back in the order written.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::commands::ScanChunk;
use crate::error::{Error, Result};

/// File magic, doubles as the format version
pub const MAGIC: &[u8; 8] = b"BKVDUMP1";

/// Entry header size: 4 bytes CRC + 4 bytes length
pub const HEADER_SIZE: usize = 8;

/// Maximum size of one serialized entry (512 MB)
pub const MAX_ENTRY_SIZE: u32 = 512 * 1024 * 1024;

// =============================================================================
// Entry Encoding
// =============================================================================

/// Serialize one chunk into a framed entry
pub fn encode_entry(chunk: &ScanChunk) -> Result<Vec<u8>> {
    let data = bincode::serialize(chunk).map_err(|e| Error::Serialization(e.to_string()))?;
    if data.len() > MAX_ENTRY_SIZE as usize {
        return Err(Error::Serialization(format!(
            "Entry too large: {} bytes (max {})",
            data.len(),
            MAX_ENTRY_SIZE
        )));
    }

    let mut entry = Vec::with_capacity(HEADER_SIZE + data.len());
    entry.extend_from_slice(&crc32fast::hash(&data).to_be_bytes());
    entry.extend_from_slice(&(data.len() as u32).to_be_bytes());
    entry.extend_from_slice(&data);
    Ok(entry)
}

/// Validate and deserialize an entry body against its header CRC
fn decode_body(expected_crc: u32, data: &[u8]) -> Result<ScanChunk> {
    let actual_crc = crc32fast::hash(data);
    if actual_crc != expected_crc {
        return Err(Error::Corrupt(format!(
            "CRC mismatch: expected {:08x}, got {:08x}",
            expected_crc, actual_crc
        )));
    }
    bincode::deserialize(data).map_err(|e| Error::Corrupt(format!("undecodable entry: {}", e)))
}

// =============================================================================
// Writer
// =============================================================================

/// Appends chunks to a new dump file
pub struct DumpWriter {
    writer: BufWriter<File>,
    entries: usize,
}

impl DumpWriter {
    /// Create (or truncate) a dump file and write its magic
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(MAGIC)?;
        Ok(Self { writer, entries: 0 })
    }

    /// Append one chunk
    pub fn append(&mut self, chunk: &ScanChunk) -> Result<()> {
        self.writer.write_all(&encode_entry(chunk)?)?;
        self.entries += 1;
        Ok(())
    }

    /// Flush and sync to disk; returns the number of entries written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        tracing::debug!(entries = self.entries, "dump file written");
        Ok(self.entries)
    }
}

/// Write a whole chunk list to `path`
pub fn save(path: &Path, chunks: &[ScanChunk]) -> Result<usize> {
    let mut writer = DumpWriter::create(path)?;
    for chunk in chunks {
        writer.append(chunk)?;
    }
    writer.finish()
}

// =============================================================================
// Reader
// =============================================================================

/// Reads chunks back from a dump file, in file order
pub struct DumpReader {
    reader: BufReader<File>,
    offset: u64,
}

impl DumpReader {
    /// Open a dump file and check its magic
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Error::Corrupt("file shorter than magic".to_string()),
            _ => Error::Io(e),
        })?;
        if &magic != MAGIC {
            return Err(Error::Corrupt("bad magic, not a dump file".to_string()));
        }
        Ok(Self {
            reader,
            offset: MAGIC.len() as u64,
        })
    }

    /// Read the next chunk; `None` at a clean end of file
    pub fn next_chunk(&mut self) -> Result<Option<ScanChunk>> {
        let mut header = [0u8; HEADER_SIZE];
        let read = read_full(&mut self.reader, &mut header)?;
        if read == 0 {
            return Ok(None);
        }
        if read < HEADER_SIZE {
            return Err(Error::Corrupt(format!(
                "truncated entry header at offset {}",
                self.offset
            )));
        }

        let crc = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let len = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
        if len > MAX_ENTRY_SIZE {
            return Err(Error::Corrupt(format!(
                "entry at offset {} claims {} bytes (max {})",
                self.offset, len, MAX_ENTRY_SIZE
            )));
        }

        let mut data = vec![0u8; len as usize];
        if read_full(&mut self.reader, &mut data)? < data.len() {
            return Err(Error::Corrupt(format!(
                "truncated entry body at offset {}",
                self.offset
            )));
        }

        let chunk = decode_body(crc, &data)?;
        self.offset += (HEADER_SIZE + data.len()) as u64;
        Ok(Some(chunk))
    }
}

impl Iterator for DumpReader {
    type Item = Result<ScanChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

/// Read a whole dump file
pub fn load(path: &Path) -> Result<Vec<ScanChunk>> {
    DumpReader::open(path)?.collect()
}

/// Fill `buf` as far as the stream allows; returns bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(filled)
}
