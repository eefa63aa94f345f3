//! Connection Module
//!
//! The command-submission seam every operation goes through.
//!
//! ## Architecture
//! - [`Connection`]: blocking `execute(keyword, args) -> Reply`
//! - [`AsyncConnection`]: deferred `execute_async(keyword, args) -> Reply`
//! - Server error frames surface as [`Error::Server`](crate::Error::Server)
//!   and are never retried here
//! - A TCP connection whose request was interrupted before its reply was
//!   fully read (timeout, I/O or framing error, dropped future) refuses every
//!   later request with `NotConnected`; reconnect to continue
//!
//! Any transport can be plugged in by implementing one of the traits; the
//! bundled ones speak RESP2 over TCP.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::protocol::{Arg, Reply};

mod tcp;
mod async_tcp;

pub use tcp::TcpConnection;
pub use async_tcp::AsyncTcpConnection;

/// True when a request finished with its whole reply consumed
///
/// A server error frame is a complete reply; anything else other than
/// success may leave unread bytes on the stream.
fn reply_consumed(result: &Result<Reply>) -> bool {
    matches!(result, Ok(_) | Err(Error::Server(_)))
}

fn unusable(peer_addr: &str) -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::NotConnected,
        format!("connection to {} is unusable after an interrupted request", peer_addr),
    ))
}

/// Blocking command execution
pub trait Connection {
    /// Submit one command and wait for its reply
    fn execute(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply>;
}

/// Deferred (awaitable) command execution
#[async_trait]
pub trait AsyncConnection: Send {
    /// Submit one command and await its reply
    async fn execute_async(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn execute(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        (**self).execute(keyword, args)
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn execute(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        (**self).execute(keyword, args)
    }
}

#[async_trait]
impl<C: AsyncConnection + ?Sized> AsyncConnection for &mut C {
    async fn execute_async(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        (**self).execute_async(keyword, args).await
    }
}

#[async_trait]
impl<C: AsyncConnection + ?Sized> AsyncConnection for Box<C> {
    async fn execute_async(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        (**self).execute_async(keyword, args).await
    }
}
