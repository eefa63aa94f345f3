//! Count-Min Sketch commands (`CMS.*`)
//!
//! ## Argument Order
//! ```text
//! CMS.INITBYDIM   key width depth
//! CMS.INITBYPROB  key error probability
//! CMS.INCRBY      key item increment [item increment ...]
//! CMS.MERGE       dest numkeys src... [WEIGHTS weight...]
//! ```

use serde::Serialize;

use crate::error::Result;
use crate::info::{decode_info, field, InfoRecord};
use crate::keywords::{self, labels};
use crate::protocol::{decode, decode_ok, decode_single, Reply};
use crate::request::{ArgList, Request};

// =============================================================================
// Command Catalog
// =============================================================================

pub const INITBYDIM: &str = "CMS.INITBYDIM";
pub const INITBYPROB: &str = "CMS.INITBYPROB";
pub const INCRBY: &str = "CMS.INCRBY";
pub const QUERY: &str = "CMS.QUERY";
pub const MERGE: &str = "CMS.MERGE";
pub const INFO: &str = "CMS.INFO";

// =============================================================================
// Info Record
// =============================================================================

/// Result of `CMS.INFO`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountMinInfo {
    /// Counters per array
    pub width: i64,
    /// Number of counter arrays
    pub depth: i64,
    /// Total of all increments
    pub count: i64,
}

impl InfoRecord for CountMinInfo {
    fn assign(&mut self, label: &str, value: Reply) -> Result<bool> {
        match label {
            labels::WIDTH => self.width = field(label, value)?,
            labels::DEPTH => self.depth = field(label, value)?,
            labels::COUNT => self.count = field(label, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Initialize a sketch with explicit dimensions
pub fn init_by_dim(key: &str, width: i64, depth: i64) -> Request<bool> {
    ArgList::new(key)
        .arg(width)
        .arg(depth)
        .into_request(INITBYDIM, decode_ok)
}

/// Initialize a sketch sized for an error bound and its probability
pub fn init_by_prob(key: &str, error: f64, probability: f64) -> Request<bool> {
    ArgList::new(key)
        .arg(error)
        .arg(probability)
        .into_request(INITBYPROB, decode_ok)
}

/// Increase one item's count; returns its new estimate
pub fn incr_by(key: &str, item: &str, increment: i64) -> Request<i64> {
    ArgList::new(key)
        .arg(item)
        .arg(increment)
        .into_request(INCRBY, decode_single)
}

/// Increase several items' counts; estimates come back in input order
pub fn incr_by_many(key: &str, increments: &[(&str, i64)]) -> Request<Vec<i64>> {
    ArgList::new(key)
        .pairs(increments)
        .into_request(INCRBY, decode)
        .expect_len(increments.len())
}

/// Estimated counts of the given items
pub fn query(key: &str, items: &[&str]) -> Request<Vec<i64>> {
    ArgList::new(key)
        .items(items.iter().copied())
        .into_request(QUERY, decode)
        .expect_len(items.len())
}

/// Merge `sources` into the already initialized `dest`
pub fn merge(dest: &str, sources: &[&str]) -> Request<bool> {
    ArgList::new(dest)
        .arg(sources.len())
        .items(sources.iter().copied())
        .into_request(MERGE, decode_ok)
}

/// Merge with one weight per source; weights follow the keys in key order
pub fn merge_weighted(dest: &str, sources: &[(&str, i64)]) -> Request<bool> {
    ArgList::new(dest)
        .arg(sources.len())
        .items(sources.iter().map(|(key, _)| *key))
        .marked_items(keywords::WEIGHTS, sources.iter().map(|(_, weight)| *weight))
        .into_request(MERGE, decode_ok)
}

pub fn info(key: &str) -> Request<CountMinInfo> {
    ArgList::new(key).into_request(INFO, decode_info)
}

// =============================================================================
// Extension Traits
// =============================================================================

command_traits! {
    /// Count-Min Sketch commands on any blocking connection
    sync CountMinCommands;
    /// Count-Min Sketch commands on any async connection
    async AsyncCountMinCommands;

    fn cms_init_by_dim(key: &str, width: i64, depth: i64) -> bool = init_by_dim;
    fn cms_init_by_prob(key: &str, error: f64, probability: f64) -> bool = init_by_prob;
    fn cms_incr_by(key: &str, item: &str, increment: i64) -> i64 = incr_by;
    fn cms_incr_by_many(key: &str, increments: &[(&str, i64)]) -> Vec<i64> = incr_by_many;
    fn cms_query(key: &str, items: &[&str]) -> Vec<i64> = query;
    fn cms_merge(dest: &str, sources: &[&str]) -> bool = merge;
    fn cms_merge_weighted(dest: &str, sources: &[(&str, i64)]) -> bool = merge_weighted;
    fn cms_info(key: &str) -> CountMinInfo = info;
}
