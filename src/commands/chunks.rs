//! Scan-dump / load-chunk pairing
//!
//! An iterative dump hands back `(iterator, payload)` pairs. Iterator 0 means
//! the dump is complete; every non-zero pair must be fed to load-chunk
//! verbatim and in order.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::connection::{AsyncConnection, Connection};
use crate::error::{Error, Result};
use crate::protocol::{FromReply, Reply};
use crate::request::Request;

/// One chunk of an incremental filter dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanChunk {
    /// Iterator to pass to the next scan-dump and to load-chunk; 0 = done
    pub iterator: i64,

    /// Opaque payload, never split, merged or reordered
    pub data: Bytes,
}

impl ScanChunk {
    /// Whether this chunk marks the end of the dump
    pub fn is_last(&self) -> bool {
        self.iterator == 0
    }
}

impl FromReply for ScanChunk {
    fn from_reply(reply: Reply) -> Result<Self> {
        let [iterator, data]: [Reply; 2] = reply.into_array()?.try_into().map_err(|items: Vec<Reply>| {
            Error::Decode(format!(
                "scan dump reply must have 2 elements, got {}",
                items.len()
            ))
        })?;

        let iterator = i64::from_reply(iterator)?;
        let data = match data {
            Reply::Nil => Bytes::new(),
            other => Bytes::from_reply(other)?,
        };

        Ok(Self { iterator, data })
    }
}

type ScanDump = fn(&str, i64) -> Request<ScanChunk>;
type LoadChunk = fn(&str, i64, &[u8]) -> Request<bool>;

/// Run scan-dump until the iterator returns to 0, collecting every chunk
pub(crate) fn dump<C: Connection + ?Sized>(
    conn: &mut C,
    scandump: ScanDump,
    key: &str,
) -> Result<Vec<ScanChunk>> {
    let mut chunks = Vec::new();
    let mut iterator = 0;

    loop {
        let chunk = scandump(key, iterator).query(conn)?;
        if chunk.is_last() {
            break;
        }
        iterator = chunk.iterator;
        chunks.push(chunk);
    }

    tracing::debug!(key, chunks = chunks.len(), "dump complete");
    Ok(chunks)
}

/// Feed chunks to load-chunk in order
pub(crate) fn restore<C: Connection + ?Sized>(
    conn: &mut C,
    loadchunk: LoadChunk,
    key: &str,
    chunks: &[ScanChunk],
) -> Result<()> {
    for chunk in chunks {
        let loaded = loadchunk(key, chunk.iterator, &chunk.data).query(conn)?;
        ensure_loaded(loaded, chunk)?;
    }
    Ok(())
}

pub(crate) async fn dump_async<C: AsyncConnection + ?Sized>(
    conn: &mut C,
    scandump: ScanDump,
    key: &str,
) -> Result<Vec<ScanChunk>> {
    let mut chunks = Vec::new();
    let mut iterator = 0;

    loop {
        let chunk = scandump(key, iterator).query_async(conn).await?;
        if chunk.is_last() {
            break;
        }
        iterator = chunk.iterator;
        chunks.push(chunk);
    }

    tracing::debug!(key, chunks = chunks.len(), "dump complete");
    Ok(chunks)
}

pub(crate) async fn restore_async<C: AsyncConnection + ?Sized>(
    conn: &mut C,
    loadchunk: LoadChunk,
    key: &str,
    chunks: &[ScanChunk],
) -> Result<()> {
    for chunk in chunks {
        let loaded = loadchunk(key, chunk.iterator, &chunk.data).query_async(conn).await?;
        ensure_loaded(loaded, chunk)?;
    }
    Ok(())
}

fn ensure_loaded(loaded: bool, chunk: &ScanChunk) -> Result<()> {
    if loaded {
        Ok(())
    } else {
        Err(Error::Decode(format!(
            "load chunk at iterator {} was not acknowledged",
            chunk.iterator
        )))
    }
}
