//! Bloom filter commands (`BF.*`)
//!
//! ## Argument Order
//! ```text
//! BF.RESERVE  name error_rate capacity [EXPANSION n] [NONSCALING]
//! BF.INSERT   name [CAPACITY n] [ERROR e] [EXPANSION n] [NOCREATE] [NONSCALING] ITEMS item...
//! ```
//! Note the error rate comes before the capacity in `BF.RESERVE`.

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

pub const RESERVE: &str = "BF.RESERVE";
pub const ADD: &str = "BF.ADD";
pub const MADD: &str = "BF.MADD";
pub const EXISTS: &str = "BF.EXISTS";
pub const MEXISTS: &str = "BF.MEXISTS";
pub const INSERT: &str = "BF.INSERT";
pub const INFO: &str = "BF.INFO";
pub const SCANDUMP: &str = "BF.SCANDUMP";
pub const LOADCHUNK: &str = "BF.LOADCHUNK";

// =============================================================================
// Options
// =============================================================================

/// Optional arguments of `BF.RESERVE`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReserveOptions {
    /// Growth factor of each additional sub-filter
    pub expansion: Option<i64>,

    /// Never create additional sub-filters
    pub non_scaling: bool,
}

/// Optional arguments of `BF.INSERT`
///
/// The server rejects `no_create` combined with `capacity` or `error_rate`;
/// that is not checked here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertOptions {
    /// Capacity of the filter if it gets created
    pub capacity: Option<i64>,

    /// Error rate of the filter if it gets created
    pub error_rate: Option<f64>,

    /// Growth factor of each additional sub-filter
    pub expansion: Option<i64>,

    /// Fail instead of creating a missing filter
    pub no_create: bool,

    /// Never create additional sub-filters
    pub non_scaling: bool,
}

// =============================================================================
// Info Record
// =============================================================================

/// Result of `BF.INFO`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BloomInfo {
    pub capacity: i64,
    pub size: i64,
    pub number_of_filters: i64,
    pub number_of_items_inserted: i64,
    /// Absent for non-scaling filters
    pub expansion_rate: Option<i64>,
}

impl InfoRecord for BloomInfo {
    fn assign(&mut self, label: &str, value: Reply) -> Result<bool> {
        match label {
            labels::CAPACITY => self.capacity = field(label, value)?,
            labels::SIZE => self.size = field(label, value)?,
            labels::NUMBER_OF_FILTERS => self.number_of_filters = field(label, value)?,
            labels::NUMBER_OF_ITEMS_INSERTED => self.number_of_items_inserted = field(label, value)?,
            labels::EXPANSION_RATE => self.expansion_rate = field(label, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Create an empty filter; true when created
pub fn reserve(name: &str, capacity: i64, error_rate: f64, options: &ReserveOptions) -> Request<bool> {
    ArgList::new(name)
        .arg(error_rate)
        .arg(capacity)
        .opt(keywords::EXPANSION, options.expansion)
        .flag(keywords::NONSCALING, options.non_scaling)
        .into_request(RESERVE, decode_ok)
}

/// Add one item; true when it was not present before
pub fn add(name: &str, item: &str) -> Request<bool> {
    ArgList::new(name).arg(item).into_request(ADD, decode)
}

/// Add several items; one flag per item, true when newly added
pub fn madd(name: &str, items: &[&str]) -> Request<Vec<bool>> {
    ArgList::new(name)
        .items(items.iter().copied())
        .into_request(MADD, decode)
        .expect_len(items.len())
}

/// Check one item; true when it may exist
pub fn exists(name: &str, item: &str) -> Request<bool> {
    ArgList::new(name).arg(item).into_request(EXISTS, decode)
}

/// Check several items
pub fn mexists(name: &str, items: &[&str]) -> Request<Vec<bool>> {
    ArgList::new(name)
        .items(items.iter().copied())
        .into_request(MEXISTS, decode)
        .expect_len(items.len())
}

/// Add items, creating the filter unless `no_create` is set
pub fn insert(name: &str, options: &InsertOptions, items: &[&str]) -> Request<Vec<bool>> {
    ArgList::new(name)
        .opt(keywords::CAPACITY, options.capacity)
        .opt(keywords::ERROR, options.error_rate)
        .opt(keywords::EXPANSION, options.expansion)
        .flag(keywords::NOCREATE, options.no_create)
        .flag(keywords::NONSCALING, options.non_scaling)
        .marked_items(keywords::ITEMS, items.iter().copied())
        .into_request(INSERT, decode)
        .expect_len(items.len())
}

pub fn info(name: &str) -> Request<BloomInfo> {
    ArgList::new(name).into_request(INFO, decode_info)
}

/// One step of an incremental dump; start with iterator 0
pub fn scandump(name: &str, iterator: i64) -> Request<ScanChunk> {
    ArgList::new(name).arg(iterator).into_request(SCANDUMP, decode)
}

/// Restore one chunk produced by [`scandump`]
pub fn loadchunk(name: &str, iterator: i64, data: &[u8]) -> Request<bool> {
    ArgList::new(name)
        .arg(iterator)
        .arg(data)
        .into_request(LOADCHUNK, decode_ok)
}

// =============================================================================
// Extension Traits
// =============================================================================

command_traits! {
    /// Bloom filter commands on any blocking connection
    sync BloomCommands;
    /// Bloom filter commands on any async connection
    async AsyncBloomCommands;

    fn bf_reserve(name: &str, capacity: i64, error_rate: f64, options: &ReserveOptions) -> bool = reserve;
    fn bf_add(name: &str, item: &str) -> bool = add;
    fn bf_madd(name: &str, items: &[&str]) -> Vec<bool> = madd;
    fn bf_exists(name: &str, item: &str) -> bool = exists;
    fn bf_mexists(name: &str, items: &[&str]) -> Vec<bool> = mexists;
    fn bf_insert(name: &str, options: &InsertOptions, items: &[&str]) -> Vec<bool> = insert;
    fn bf_info(name: &str) -> BloomInfo = info;
    fn bf_scandump(name: &str, iterator: i64) -> ScanChunk = scandump;
    fn bf_loadchunk(name: &str, iterator: i64, data: &[u8]) -> bool = loadchunk;
}

// =============================================================================
// Dump / Restore
// =============================================================================

/// Dump a whole filter as an ordered chunk list
pub fn dump<C: Connection + ?Sized>(conn: &mut C, name: &str) -> Result<Vec<ScanChunk>> {
    chunk_io::dump(conn, scandump, name)
}

/// Rebuild a filter under `name` from a chunk list produced by [`dump`]
pub fn restore<C: Connection + ?Sized>(conn: &mut C, name: &str, chunks: &[ScanChunk]) -> Result<()> {
    chunk_io::restore(conn, loadchunk, name, chunks)
}

pub async fn dump_async<C: AsyncConnection + ?Sized>(conn: &mut C, name: &str) -> Result<Vec<ScanChunk>> {
    chunk_io::dump_async(conn, scandump, name).await
}

pub async fn restore_async<C: AsyncConnection + ?Sized>(
    conn: &mut C,
    name: &str,
    chunks: &[ScanChunk],
) -> Result<()> {
    chunk_io::restore_async(conn, loadchunk, name, chunks).await
}
