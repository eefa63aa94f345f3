//! Protocol Module
//!
//! Defines the values exchanged with the server.
//!
//! ## Layers
//! - [`Arg`]: one scalar command argument (text, integer, float, bytes)
//! - [`Reply`]: closed tagged variant of everything the server answers
//! - [`FromReply`]: typed decoding of a reply, failing on shape mismatch
//! - codec: RESP2 framing used by the bundled connections
//!
//! ### Reply Variants
//! - Nil:     null bulk / null array
//! - Status:  simple string (`OK`)
//! - Integer: signed 64-bit
//! - Bulk:    binary-safe string
//! - Array:   nested replies

mod arg;
mod reply;
mod codec;

pub use arg::Arg;
pub use reply::{decode, decode_ok, decode_single, FromReply, Reply, OK};
pub(crate) use reply::mismatch;
pub use codec::{
    decode_reply, encode_command, read_frame, read_frame_async, read_reply, read_reply_async,
    write_command, write_command_async, MAX_ARRAY_LEN, MAX_BULK_SIZE,
};
