//! Top-K commands (`TOPK.*`)
//!
//! ## Argument Order
//! ```text
//! TOPK.RESERVE  key k [width depth decay]
//! TOPK.INCRBY   key item increment [item increment ...]
//! ```
//! `TOPK.RESERVE` takes its optional values positionally, without flag
//! tokens. The server expects all three or none.

use serde::Serialize;

use crate::error::Result;
use crate::info::{decode_info, field, InfoRecord};
use crate::keywords::labels;
use crate::protocol::{decode, decode_ok, decode_single, Reply};
use crate::request::{ArgList, Request};

// =============================================================================
// Command Catalog
// =============================================================================

pub const RESERVE: &str = "TOPK.RESERVE";
pub const ADD: &str = "TOPK.ADD";
pub const INCRBY: &str = "TOPK.INCRBY";
pub const QUERY: &str = "TOPK.QUERY";
pub const COUNT: &str = "TOPK.COUNT";
pub const LIST: &str = "TOPK.LIST";
pub const INFO: &str = "TOPK.INFO";

// =============================================================================
// Options
// =============================================================================

/// Optional arguments of `TOPK.RESERVE`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReserveOptions {
    /// Counters per array
    pub width: Option<i64>,

    /// Number of arrays
    pub depth: Option<i64>,

    /// Probability of decaying a counter in an occupied bucket
    pub decay: Option<f64>,
}

// =============================================================================
// Info Record
// =============================================================================

/// Result of `TOPK.INFO`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopKInfo {
    pub k: i64,
    pub width: i64,
    pub depth: i64,
    pub decay: f64,
}

impl InfoRecord for TopKInfo {
    fn assign(&mut self, label: &str, value: Reply) -> Result<bool> {
        match label {
            labels::TOP_K => self.k = field(label, value)?,
            labels::WIDTH => self.width = field(label, value)?,
            labels::DEPTH => self.depth = field(label, value)?,
            labels::DECAY => self.decay = field(label, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Create a tracker for the `k` most frequent items
pub fn reserve(key: &str, k: i64, options: &ReserveOptions) -> Request<bool> {
    ArgList::new(key)
        .arg(k)
        .opt_arg(options.width)
        .opt_arg(options.depth)
        .opt_arg(options.decay)
        .into_request(RESERVE, decode_ok)
}

/// Add items; each slot holds the item expelled from the list, if any
pub fn add(key: &str, items: &[&str]) -> Request<Vec<Option<String>>> {
    ArgList::new(key)
        .items(items.iter().copied())
        .into_request(ADD, decode)
        .expect_len(items.len())
}

/// Increase one item's score; returns the expelled item, if any
pub fn incr_by(key: &str, item: &str, increment: i64) -> Request<Option<String>> {
    ArgList::new(key)
        .arg(item)
        .arg(increment)
        .into_request(INCRBY, decode_single)
}

/// Increase several items' scores; one expelled-item slot per pair
pub fn incr_by_many(key: &str, increments: &[(&str, i64)]) -> Request<Vec<Option<String>>> {
    ArgList::new(key)
        .pairs(increments)
        .into_request(INCRBY, decode)
        .expect_len(increments.len())
}

/// Whether each item is currently in the top list
pub fn query(key: &str, items: &[&str]) -> Request<Vec<bool>> {
    ArgList::new(key)
        .items(items.iter().copied())
        .into_request(QUERY, decode)
        .expect_len(items.len())
}

/// Estimated counts of the given items
pub fn count(key: &str, items: &[&str]) -> Request<Vec<i64>> {
    ArgList::new(key)
        .items(items.iter().copied())
        .into_request(COUNT, decode)
        .expect_len(items.len())
}

/// Items currently in the top list; empty slots come back as `None`
pub fn list(key: &str) -> Request<Vec<Option<String>>> {
    ArgList::new(key).into_request(LIST, decode)
}

pub fn info(key: &str) -> Request<TopKInfo> {
    ArgList::new(key).into_request(INFO, decode_info)
}

// =============================================================================
// Extension Traits
// =============================================================================

command_traits! {
    /// Top-K commands on any blocking connection
    sync TopKCommands;
    /// Top-K commands on any async connection
    async AsyncTopKCommands;

    fn topk_reserve(key: &str, k: i64, options: &ReserveOptions) -> bool = reserve;
    fn topk_add(key: &str, items: &[&str]) -> Vec<Option<String>> = add;
    fn topk_incr_by(key: &str, item: &str, increment: i64) -> Option<String> = incr_by;
    fn topk_incr_by_many(key: &str, increments: &[(&str, i64)]) -> Vec<Option<String>> = incr_by_many;
    fn topk_query(key: &str, items: &[&str]) -> Vec<bool> = query;
    fn topk_count(key: &str, items: &[&str]) -> Vec<i64> = count;
    fn topk_list(key: &str) -> Vec<Option<String>> = list;
    fn topk_info(key: &str) -> TopKInfo = info;
}
