//! Client facade
//!
//! [`Client`] owns one connection and exposes every command family on it.
//! It implements [`Connection`] / [`AsyncConnection`] by delegation, so the
//! extension traits (`BloomCommands`, `AsyncTopKCommands`, ...) apply to it
//! exactly as they do to a bare connection.

use async_trait::async_trait;

use crate::config::Config;
use crate::connection::{AsyncConnection, AsyncTcpConnection, Connection, TcpConnection};
use crate::error::Result;
use crate::protocol::{Arg, Reply};
use crate::request::Request;

/// A connection bound to the probabilistic data-structure commands
#[derive(Debug)]
pub struct Client<C> {
    conn: C,
}

impl<C> Client<C> {
    /// Bind an existing connection
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection
    pub fn connection(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Release the underlying connection
    pub fn into_inner(self) -> C {
        self.conn
    }
}

impl Client<TcpConnection> {
    /// Open a blocking TCP client
    pub fn connect(config: &Config) -> Result<Self> {
        TcpConnection::open(config).map(Self::new)
    }
}

impl Client<AsyncTcpConnection> {
    /// Open an async TCP client
    pub async fn connect_async(config: &Config) -> Result<Self> {
        AsyncTcpConnection::open(config).await.map(Self::new)
    }
}

impl<C: Connection> Client<C> {
    /// Execute a prepared request
    pub fn run<T>(&mut self, request: Request<T>) -> Result<T> {
        request.query(&mut self.conn)
    }
}

impl<C: AsyncConnection> Client<C> {
    /// Execute a prepared request asynchronously
    pub async fn run_async<T>(&mut self, request: Request<T>) -> Result<T> {
        request.query_async(&mut self.conn).await
    }
}

impl<C: Connection> Connection for Client<C> {
    fn execute(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        self.conn.execute(keyword, args)
    }
}

#[async_trait]
impl<C: AsyncConnection> AsyncConnection for Client<C> {
    async fn execute_async(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        self.conn.execute_async(keyword, args).await
    }
}
