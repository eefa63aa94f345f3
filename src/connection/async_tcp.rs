//! Async TCP connection (tokio)

use async_trait::async_trait;
use tokio::io::{BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use super::{reply_consumed, unusable, AsyncConnection};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::protocol::{read_reply_async, write_command_async, Arg, Reply};

/// Async RESP connection to a server
///
/// Read and write timeouts from [`Config`] apply to each whole round trip.
/// After a timeout, an I/O error, or a dropped `execute_async` future the
/// connection refuses further requests.
pub struct AsyncTcpConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    config: Config,
    peer_addr: String,
    broken: bool,
}

impl AsyncTcpConnection {
    /// Connect to the server named in `config`
    pub async fn open(config: &Config) -> Result<Self> {
        let addr = config.socket_addr()?;
        let stream = match config.connect_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, TcpStream::connect(addr))
                .await
                .map_err(|_| timed_out("connect"))??,
            None => TcpStream::connect(addr).await?,
        };
        stream.set_nodelay(config.nodelay)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        tracing::debug!("Connected to {}", peer_addr);

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            config: config.clone(),
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

    async fn round_trip(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        let write = write_command_async(&mut self.writer, keyword, args);
        match self.config.write_timeout() {
            Some(t) => tokio::time::timeout(t, write).await.map_err(|_| timed_out("write"))??,
            None => write.await?,
        }

        let read = read_reply_async(&mut self.reader);
        match self.config.read_timeout() {
            Some(t) => tokio::time::timeout(t, read).await.map_err(|_| timed_out("read"))?,
            None => read.await,
        }
    }
}

#[async_trait]
impl AsyncConnection for AsyncTcpConnection {
    async fn execute_async(&mut self, keyword: &str, args: &[Arg]) -> Result<Reply> {
        if self.broken {
            return Err(unusable(&self.peer_addr));
        }
        tracing::trace!(peer = %self.peer_addr, keyword, argc = args.len(), "sending command");

        // Stays set if this future is dropped mid-request
        self.broken = true;
        let result = self.round_trip(keyword, args).await;

        if reply_consumed(&result) {
            self.broken = false;
        } else {
            tracing::warn!(peer = %self.peer_addr, keyword, "request interrupted, connection unusable");
        }
        result
    }
}

fn timed_out(what: &str) -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::TimedOut,
        format!("{} timed out", what),
    ))
}
