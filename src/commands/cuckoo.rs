//! Cuckoo filter commands (`CF.*`)
//!
//! ## Argument Order
//! ```text
//! CF.RESERVE   key capacity [BUCKETSIZE n] [MAXITERATIONS n] [EXPANSION n]
//! CF.INSERT    key [CAPACITY n] [NOCREATE] ITEMS item...
//! CF.INSERTNX  key [CAPACITY n] [NOCREATE] ITEMS item...
//! ```

use serde::Serialize;

use super::chunks::{self as chunk_io, ScanChunk};
use crate::connection::{AsyncConnection, Connection};
use crate::error::Result;
use crate::info::{decode_info, field, InfoRecord};
use crate::keywords::{self, labels};
use crate::protocol::{decode, decode_ok, Reply};
use crate::request::{ArgList, Request};

// =============================================================================
// Command Catalog
// =============================================================================

pub const RESERVE: &str = "CF.RESERVE";
pub const ADD: &str = "CF.ADD";
pub const ADDNX: &str = "CF.ADDNX";
pub const INSERT: &str = "CF.INSERT";
pub const INSERTNX: &str = "CF.INSERTNX";
pub const EXISTS: &str = "CF.EXISTS";
pub const DEL: &str = "CF.DEL";
pub const COUNT: &str = "CF.COUNT";
pub const SCANDUMP: &str = "CF.SCANDUMP";
pub const LOADCHUNK: &str = "CF.LOADCHUNK";
pub const INFO: &str = "CF.INFO";

// =============================================================================
// Options
// =============================================================================

/// Optional arguments of `CF.RESERVE`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReserveOptions {
    /// Items per bucket
    pub bucket_size: Option<i64>,

    /// Swap attempts before the filter is declared full
    pub max_iterations: Option<i64>,

    /// Growth factor of each additional sub-filter
    pub expansion: Option<i64>,
}

/// Optional arguments of `CF.INSERT` / `CF.INSERTNX`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOptions {
    /// Capacity of the filter if it gets created
    pub capacity: Option<i64>,

    /// Fail instead of creating a missing filter
    pub no_create: bool,
}

// =============================================================================
// Info Record
// =============================================================================

/// Result of `CF.INFO`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CuckooInfo {
    pub size: i64,
    pub number_of_buckets: i64,
    pub number_of_filters: i64,
    pub number_of_items_inserted: i64,
    pub number_of_items_deleted: i64,
    pub bucket_size: i64,
    pub expansion_rate: i64,
    pub max_iterations: i64,
}

impl InfoRecord for CuckooInfo {
    fn assign(&mut self, label: &str, value: Reply) -> Result<bool> {
        match label {
            labels::SIZE => self.size = field(label, value)?,
            labels::NUMBER_OF_BUCKETS => self.number_of_buckets = field(label, value)?,
            labels::NUMBER_OF_FILTERS => self.number_of_filters = field(label, value)?,
            labels::NUMBER_OF_ITEMS_INSERTED => self.number_of_items_inserted = field(label, value)?,
            labels::NUMBER_OF_ITEMS_DELETED => self.number_of_items_deleted = field(label, value)?,
            labels::BUCKET_SIZE | labels::BUCKET_SIZE_ALT => self.bucket_size = field(label, value)?,
            labels::EXPANSION_RATE => self.expansion_rate = field(label, value)?,
            labels::MAX_ITERATIONS | labels::MAX_ITERATIONS_ALT => {
                self.max_iterations = field(label, value)?
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Create an empty filter; true when created
pub fn reserve(key: &str, capacity: i64, options: &ReserveOptions) -> Request<bool> {
    ArgList::new(key)
        .arg(capacity)
        .opt(keywords::BUCKETSIZE, options.bucket_size)
        .opt(keywords::MAXITERATIONS, options.max_iterations)
        .opt(keywords::EXPANSION, options.expansion)
        .into_request(RESERVE, decode_ok)
}

/// Add an item, creating the filter if needed
pub fn add(key: &str, item: &str) -> Request<bool> {
    ArgList::new(key).arg(item).into_request(ADD, decode)
}

/// Add an item only if it is not already present; false when it was
pub fn add_nx(key: &str, item: &str) -> Request<bool> {
    ArgList::new(key).arg(item).into_request(ADDNX, decode)
}

fn insert_args(key: &str, options: &InsertOptions, items: &[&str]) -> ArgList {
    ArgList::new(key)
        .opt(keywords::CAPACITY, options.capacity)
        .flag(keywords::NOCREATE, options.no_create)
        .marked_items(keywords::ITEMS, items.iter().copied())
}

/// Add several items; one flag per item, true when inserted
pub fn insert(key: &str, options: &InsertOptions, items: &[&str]) -> Request<Vec<bool>> {
    insert_args(key, options, items)
        .into_request(INSERT, decode)
        .expect_len(items.len())
}

/// Add several items, skipping ones already present
pub fn insert_nx(key: &str, options: &InsertOptions, items: &[&str]) -> Request<Vec<bool>> {
    insert_args(key, options, items)
        .into_request(INSERTNX, decode)
        .expect_len(items.len())
}

/// Check one item; true when it may exist
pub fn exists(key: &str, item: &str) -> Request<bool> {
    ArgList::new(key).arg(item).into_request(EXISTS, decode)
}

/// Delete one occurrence of an item; false when not found
pub fn del(key: &str, item: &str) -> Request<bool> {
    ArgList::new(key).arg(item).into_request(DEL, decode)
}

/// Number of times an item may be in the filter
pub fn count(key: &str, item: &str) -> Request<i64> {
    ArgList::new(key).arg(item).into_request(COUNT, decode)
}

/// One step of an incremental dump; start with iterator 0
pub fn scandump(key: &str, iterator: i64) -> Request<ScanChunk> {
    ArgList::new(key).arg(iterator).into_request(SCANDUMP, decode)
}

/// Restore one chunk produced by [`scandump`]
pub fn loadchunk(key: &str, iterator: i64, data: &[u8]) -> Request<bool> {
    ArgList::new(key)
        .arg(iterator)
        .arg(data)
        .into_request(LOADCHUNK, decode_ok)
}

pub fn info(key: &str) -> Request<CuckooInfo> {
    ArgList::new(key).into_request(INFO, decode_info)
}

// =============================================================================
// Extension Traits
// =============================================================================

command_traits! {
    /// Cuckoo filter commands on any blocking connection
    sync CuckooCommands;
    /// Cuckoo filter commands on any async connection
    async AsyncCuckooCommands;

    fn cf_reserve(key: &str, capacity: i64, options: &ReserveOptions) -> bool = reserve;
    fn cf_add(key: &str, item: &str) -> bool = add;
    fn cf_add_nx(key: &str, item: &str) -> bool = add_nx;
    fn cf_insert(key: &str, options: &InsertOptions, items: &[&str]) -> Vec<bool> = insert;
    fn cf_insert_nx(key: &str, options: &InsertOptions, items: &[&str]) -> Vec<bool> = insert_nx;
    fn cf_exists(key: &str, item: &str) -> bool = exists;
    fn cf_del(key: &str, item: &str) -> bool = del;
    fn cf_count(key: &str, item: &str) -> i64 = count;
    fn cf_scandump(key: &str, iterator: i64) -> ScanChunk = scandump;
    fn cf_loadchunk(key: &str, iterator: i64, data: &[u8]) -> bool = loadchunk;
    fn cf_info(key: &str) -> CuckooInfo = info;
}

// =============================================================================
// Dump / Restore
// =============================================================================

/// Dump a whole filter as an ordered chunk list
pub fn dump<C: Connection + ?Sized>(conn: &mut C, key: &str) -> Result<Vec<ScanChunk>> {
    chunk_io::dump(conn, scandump, key)
}

/// Rebuild a filter under `key` from a chunk list produced by [`dump`]
pub fn restore<C: Connection + ?Sized>(conn: &mut C, key: &str, chunks: &[ScanChunk]) -> Result<()> {
    chunk_io::restore(conn, loadchunk, key, chunks)
}

pub async fn dump_async<C: AsyncConnection + ?Sized>(conn: &mut C, key: &str) -> Result<Vec<ScanChunk>> {
    chunk_io::dump_async(conn, scandump, key).await
}

pub async fn restore_async<C: AsyncConnection + ?Sized>(
    conn: &mut C,
    key: &str,
    chunks: &[ScanChunk],
) -> Result<()> {
    chunk_io::restore_async(conn, loadchunk, key, chunks).await
}
