//! Blocking TCP connection
//!
//! One request in flight at a time: write the command, read one reply.
//! A request that fails before its reply is fully read breaks the
//! connection for good.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use super::{reply_consumed, unusable, Connection};
use crate::config::Config;
use crate::error::Result;
use crate::protocol::{read_reply, write_command, Arg, Reply};

/// Blocking RESP connection to a server
pub struct TcpConnection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Set while a request is in flight; stays set if it never completed
    broken: bool,
}

impl TcpConnection {
    /// Connect to the server named in `config`
    ///
    /// Sets up buffered I/O and configures timeouts
    pub fn open(config: &Config) -> Result<Self> {
        let addr = config.socket_addr()?;
        let stream = match config.connect_timeout() {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };

        stream.set_nodelay(config.nodelay)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        Self::from_stream(stream)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
            broken: false,
        })
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// True once an interrupted request left the stream out of sync
    pub fn is_broken(&self) -> bool {
        self.broken
    }
}

impl Connection for TcpConnection {
    fn execute(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        if self.broken {
            return Err(unusable(&self.peer_addr));
        }
        tracing::trace!(peer = %self.peer_addr, keyword, argc = args.len(), "sending command");

        self.broken = true;
        let result = write_command(&mut self.writer, keyword, args)
            .and_then(|()| read_reply(&mut self.reader));

        if reply_consumed(&result) {
            self.broken = false;
        } else {
            tracing::warn!(peer = %self.peer_addr, keyword, "request interrupted, connection unusable");
        }
        result
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        tracing::debug!("Closing connection to {}", self.peer_addr);
    }
}
