//! Request Module
//!
//! A [`Request`] binds one command keyword, its argument sequence and the
//! decoder for its reply. It is the single core both calling conventions
//! run through:
//!
//! ```text
//!  typed params ──► builder ──► Request<T> ──┬─► query(conn)        ──► T
//!                                            └─► query_async(conn)  ──► T
//! ```
//!
//! Both entry points submit the same `(keyword, args)` and pipe the reply
//! through the same decoder, so they cannot drift apart.
//!
//! Requests over `n` items may declare that their reply is an array of
//! exactly `n` elements; any other length is a decode error.

use std::fmt;

use crate::connection::{AsyncConnection, Connection};
use crate::error::{Error, Result};
use crate::protocol::{Arg, Reply};

/// Reply decoder for one operation
pub type Decoder<T> = fn(Reply) -> Result<T>;

/// One ready-to-send command with its typed reply decoder
pub struct Request<T> {
    keyword: &'static str,
    args: Vec<Arg>,
    decode: Decoder<T>,
    expected_len: Option<usize>,
}

impl<T> Request<T> {
    pub fn new(keyword: &'static str, args: impl Into<Vec<Arg>>, decode: Decoder<T>) -> Self {
        Self {
            keyword,
            args: args.into(),
            decode,
            expected_len: None,
        }
    }

    /// Require an array reply of exactly `len` elements
    pub fn expect_len(mut self, len: usize) -> Self {
        self.expected_len = Some(len);
        self
    }

    /// Element count the reply must have, if fixed
    pub fn expected_len(&self) -> Option<usize> {
        self.expected_len
    }

    /// Command keyword (e.g. `BF.RESERVE`)
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// Ordered argument sequence, not including the keyword
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Decode a raw reply the way this request would
    pub fn decode(&self, reply: Reply) -> Result<T> {
        if let (Some(expected), Reply::Array(items)) = (self.expected_len, &reply) {
            if items.len() != expected {
                return Err(Error::Decode(format!(
                    "{} reply has {} elements for {} requested items",
                    self.keyword,
                    items.len(),
                    expected
                )));
            }
        }
        (self.decode)(reply)
    }

    /// Execute on a blocking connection
    ///
    /// Server errors from the connection are returned unchanged; the decoder
    /// only runs on a successful reply.
    pub fn query<C: Connection + ?Sized>(self, conn: &mut C) -> Result<T> {
        tracing::trace!(keyword = self.keyword, argc = self.args.len(), "executing");
        let reply = conn.execute(self.keyword, &self.args)?;
        self.decode(reply)
    }

    /// Execute on an async connection
    pub async fn query_async<C: AsyncConnection + ?Sized>(self, conn: &mut C) -> Result<T> {
        tracing::trace!(keyword = self.keyword, argc = self.args.len(), "executing");
        let reply = conn.execute_async(self.keyword, &self.args).await?;
        self.decode(reply)
    }
}

impl<T> fmt::Debug for Request<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("keyword", &self.keyword)
            .field("args", &self.args)
            .field("expected_len", &self.expected_len)
            .finish()
    }
}

// =============================================================================
// Argument Builder
// =============================================================================

/// Ordered argument accumulator
///
/// Optional values are emitted only when present; a present zero or empty
/// value is still emitted. Nothing is range-checked here.
#[derive(Debug, Default, Clone)]
pub struct ArgList {
    args: Vec<Arg>,
}

impl ArgList {
    /// Start a list with the mandatory identifier (filter/sketch key)
    pub fn new(key: &str) -> Self {
        Self {
            args: vec![Arg::from(key)],
        }
    }

    /// Append a mandatory positional value
    pub fn arg(mut self, value: impl Into<Arg>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append a positional value only when present
    pub fn opt_arg<V: Into<Arg>>(mut self, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.args.push(value.into());
        }
        self
    }

    /// Append `flag value` only when the value is present
    pub fn opt<V: Into<Arg>>(mut self, flag: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.args.push(Arg::from(flag));
            self.args.push(value.into());
        }
        self
    }

    /// Append a bare flag token when `set`
    pub fn flag(mut self, flag: &str, set: bool) -> Self {
        if set {
            self.args.push(Arg::from(flag));
        }
        self
    }

    /// Append variadic items in order
    pub fn items<I, V>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Arg>,
    {
        self.args.extend(items.into_iter().map(Into::into));
        self
    }

    /// Append a marker token followed by the variadic items
    pub fn marked_items<I, V>(self, marker: &str, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Arg>,
    {
        self.arg(marker).items(items)
    }

    /// Append `item increment` pairs in order
    pub fn pairs(mut self, pairs: &[(&str, i64)]) -> Self {
        for (item, increment) in pairs {
            self.args.push(Arg::from(*item));
            self.args.push(Arg::Int(*increment));
        }
        self
    }

    /// Finish into a request for `keyword`
    pub fn into_request<T>(self, keyword: &'static str, decode: Decoder<T>) -> Request<T> {
        Request::new(keyword, self.args, decode)
    }
}

impl From<ArgList> for Vec<Arg> {
    fn from(list: ArgList) -> Self {
        list.args
    }
}
