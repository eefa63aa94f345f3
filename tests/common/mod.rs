//! Shared test helpers
//!
//! [`MockConnection`] records every submitted command and replays queued
//! replies in order. [`AsyncMock`] wraps one for the async traits.

#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use bloomkv::{Arg, AsyncConnection, Connection, Error, Reply, Result};
use bytes::Bytes;

// =============================================================================
// Mock Connections
// =============================================================================

/// One recorded command: keyword plus arguments rendered as text
pub type Sent = (String, Vec<String>);

#[derive(Debug, Default)]
pub struct MockConnection {
    replies: VecDeque<Result<Reply>>,
    pub sent: Vec<Sent>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next command
    pub fn reply(mut self, reply: Reply) -> Self {
        self.replies.push_back(Ok(reply));
        self
    }

    /// Queue a server error frame for the next command
    pub fn server_error(mut self, message: &str) -> Self {
        self.replies.push_back(Err(Error::Server(message.to_string())));
        self
    }

    /// The only command sent so far
    pub fn last(&self) -> &Sent {
        self.sent.last().expect("no command was sent")
    }

    /// Arguments of the last command as string slices
    pub fn last_args(&self) -> Vec<&str> {
        self.last().1.iter().map(String::as_str).collect()
    }
}

impl Connection for MockConnection {
    fn execute(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        self.sent.push((keyword.to_string(), render(args)));
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(Error::Protocol("no reply queued".to_string())))
    }
}

/// Async view over a [`MockConnection`]
#[derive(Debug, Default)]
pub struct AsyncMock(pub MockConnection);

#[async_trait]
impl AsyncConnection for AsyncMock {
    async fn execute_async(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        self.0.execute(keyword, args)
    }
}

fn render(args: &[Arg]) -> Vec<String> {
    args.iter()
        .map(|arg| String::from_utf8_lossy(&arg.to_bytes()).into_owned())
        .collect()
}

// =============================================================================
// Reply Helpers
// =============================================================================

pub fn ok() -> Reply {
    Reply::Status("OK".to_string())
}

pub fn int(n: i64) -> Reply {
    Reply::Integer(n)
}

pub fn bulk(s: &str) -> Reply {
    Reply::Bulk(Bytes::copy_from_slice(s.as_bytes()))
}

pub fn ints(values: &[i64]) -> Reply {
    Reply::Array(values.iter().copied().map(Reply::Integer).collect())
}

/// Label/value info reply; labels go out as bulk strings
pub fn info(fields: Vec<(&str, Reply)>) -> Reply {
    let mut items = Vec::with_capacity(fields.len() * 2);
    for (label, value) in fields {
        items.push(bulk(label));
        items.push(value);
    }
    Reply::Array(items)
}
