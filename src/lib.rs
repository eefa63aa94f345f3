//! # bloomkv
//!
//! Typed client bindings for the probabilistic data-structure commands of a
//! key-value server module:
//! - Bloom filters (`BF.*`)
//! - Cuckoo filters (`CF.*`)
//! - Count-Min Sketches (`CMS.*`)
//! - Top-K trackers (`TOPK.*`)
//!
//! Every operation builds an argument list, sends it through a connection and
//! decodes the reply. The structures themselves live on the server.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │   Extension traits (BloomCommands, AsyncTopKCommands, ...)   │
//! │                    Client<C> facade                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │         Request<T> = keyword + args + decoder                │
//! │     (per-family builders: bloom, cuckoo, count_min, top_k)   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Connection  │          │AsyncConnect.│
//!   │  (blocking) │          │   (tokio)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬────────────┘
//!                       ▼
//!               ┌─────────────┐
//!               │ RESP2 codec │
//!               └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use bloomkv::{BloomCommands, Client, Config};
//! use bloomkv::bloom::ReserveOptions;
//!
//! # fn main() -> bloomkv::Result<()> {
//! let mut client = Client::connect(&Config::default())?;
//! client.bf_reserve("seen", 1000, 0.001, &ReserveOptions::default())?;
//! client.bf_add("seen", "alice")?;
//! assert!(client.bf_exists("seen", "alice")?);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod connection;
pub mod request;
pub mod info;
pub mod keywords;
pub mod commands;
pub mod client;
pub mod dump;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Error, Result};
pub use config::Config;
pub use client::Client;
pub use connection::{AsyncConnection, AsyncTcpConnection, Connection, TcpConnection};
pub use protocol::{Arg, Reply};
pub use request::Request;

pub use commands::{bloom, count_min, cuckoo, top_k, ScanChunk};
pub use commands::bloom::{AsyncBloomCommands, BloomCommands, BloomInfo};
pub use commands::count_min::{AsyncCountMinCommands, CountMinCommands, CountMinInfo};
pub use commands::cuckoo::{AsyncCuckooCommands, CuckooCommands, CuckooInfo};
pub use commands::top_k::{AsyncTopKCommands, TopKCommands, TopKInfo};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of bloomkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
