//! Wire tokens shared by the command families
//!
//! Flag tokens go into argument lists; labels come back in info replies and
//! are matched exactly (case and spelling included).

// =============================================================================
// Flag Tokens
// =============================================================================

pub const CAPACITY: &str = "CAPACITY";
pub const ERROR: &str = "ERROR";
pub const EXPANSION: &str = "EXPANSION";
pub const NOCREATE: &str = "NOCREATE";
pub const NONSCALING: &str = "NONSCALING";
pub const ITEMS: &str = "ITEMS";
pub const BUCKETSIZE: &str = "BUCKETSIZE";
pub const MAXITERATIONS: &str = "MAXITERATIONS";
pub const WEIGHTS: &str = "WEIGHTS";

// =============================================================================
// Info Labels
// =============================================================================

pub mod labels {
    pub const CAPACITY: &str = "Capacity";
    pub const SIZE: &str = "Size";
    pub const NUMBER_OF_FILTERS: &str = "Number of filters";
    pub const NUMBER_OF_ITEMS_INSERTED: &str = "Number of items inserted";
    pub const NUMBER_OF_ITEMS_DELETED: &str = "Number of items deleted";
    pub const NUMBER_OF_BUCKETS: &str = "Number of buckets";
    pub const EXPANSION_RATE: &str = "Expansion rate";
    pub const BUCKET_SIZE: &str = "Bucket size";
    pub const BUCKET_SIZE_ALT: &str = "Bucket Size";
    pub const MAX_ITERATIONS: &str = "Max iterations";
    pub const MAX_ITERATIONS_ALT: &str = "Max iteration";
    pub const TOP_K: &str = "k";
    pub const WIDTH: &str = "width";
    pub const DEPTH: &str = "depth";
    pub const DECAY: &str = "decay";
    pub const COUNT: &str = "count";
}
