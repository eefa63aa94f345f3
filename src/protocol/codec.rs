//! Protocol codec
//!
//! Encoding and decoding functions for the RESP2 wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<keyword>\r\n
//! $<len>\r\n<arg 1>\r\n
//! ...
//! ```
//!
//! ### Reply Format
//! ```text
//! +<status>\r\n              status
//! -<message>\r\n             server error
//! :<integer>\r\n             integer
//! $<len>\r\n<bytes>\r\n      bulk ($-1 = nil)
//! *<count>\r\n<reply>...     array (*-1 = nil)
//! ```
//!
//! Readers first collect one complete frame, then hand it to
//! [`decode_reply`], so the blocking and async paths share one decoder.

use std::io::{BufRead, Write};

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{Arg, Reply};
use crate::error::{Error, Result};

/// Maximum bulk payload size (512 MB)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum number of elements in one array reply
pub const MAX_ARRAY_LEN: usize = 1024 * 1024;

const CRLF: &[u8] = b"\r\n";

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: array header + keyword bulk + one bulk per argument
pub fn encode_command(keyword: &str, args: &[Arg]) -> Bytes {
    let mut message = BytesMut::with_capacity(16 + keyword.len() + args.len() * 16);

    write_header(&mut message, b'*', args.len() + 1);
    write_bulk(&mut message, keyword.as_bytes());
    for arg in args {
        write_bulk(&mut message, &arg.to_bytes());
    }

    message.freeze()
}

fn write_header(buf: &mut BytesMut, marker: u8, len: usize) {
    buf.put_u8(marker);
    buf.put_slice(len.to_string().as_bytes());
    buf.put_slice(CRLF);
}

fn write_bulk(buf: &mut BytesMut, payload: &[u8]) {
    write_header(buf, b'$', payload.len());
    buf.put_slice(payload);
    buf.put_slice(CRLF);
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Decode one complete reply frame
///
/// Server error frames (`-ERR ...`) decode to [`Error::Server`]. Trailing
/// bytes after the frame are a protocol error.
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let mut pos = 0;
    let reply = decode_at(bytes, &mut pos)?;

    if pos != bytes.len() {
        return Err(Error::Protocol(format!(
            "Trailing data after reply: {} bytes",
            bytes.len() - pos
        )));
    }

    Ok(reply)
}

fn decode_at(bytes: &[u8], pos: &mut usize) -> Result<Reply> {
    let line = read_line_at(bytes, pos)?;
    let (marker, body) = line
        .split_first()
        .ok_or_else(|| Error::Protocol("Empty reply line".to_string()))?;

    match *marker {
        b'+' => Ok(Reply::Status(String::from_utf8_lossy(body).into_owned())),
        b'-' => {
            let message = String::from_utf8_lossy(body).into_owned();
            tracing::warn!("Server returned error: {}", message);
            Err(Error::Server(message))
        }
        b':' => Ok(Reply::Integer(parse_int(body)?)),
        b'$' => {
            let len = parse_int(body)?;
            if len < 0 {
                return Ok(Reply::Nil);
            }
            let len = checked_len(len, MAX_BULK_SIZE, "Bulk payload")?;

            let end = *pos + len;
            if bytes.len() < end + CRLF.len() {
                return Err(Error::Protocol(format!(
                    "Incomplete bulk payload: expected {} bytes, got {}",
                    len,
                    bytes.len().saturating_sub(*pos)
                )));
            }
            if &bytes[end..end + CRLF.len()] != CRLF {
                return Err(Error::Protocol("Bulk payload not terminated by CRLF".to_string()));
            }

            let payload = Bytes::copy_from_slice(&bytes[*pos..end]);
            *pos = end + CRLF.len();
            Ok(Reply::Bulk(payload))
        }
        b'*' => {
            let count = parse_int(body)?;
            if count < 0 {
                return Ok(Reply::Nil);
            }
            let count = checked_len(count, MAX_ARRAY_LEN, "Array")?;

            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(decode_at(bytes, pos)?);
            }
            Ok(Reply::Array(items))
        }
        other => Err(Error::Protocol(format!(
            "Unknown reply type: 0x{:02x}",
            other
        ))),
    }
}

/// Slice out the next CRLF-terminated line, without the terminator
fn read_line_at<'a>(bytes: &'a [u8], pos: &mut usize) -> Result<&'a [u8]> {
    let rest = &bytes[*pos..];
    let end = rest
        .windows(2)
        .position(|w| w == CRLF)
        .ok_or_else(|| Error::Protocol("Incomplete reply line".to_string()))?;

    *pos += end + CRLF.len();
    Ok(&rest[..end])
}

fn parse_int(body: &[u8]) -> Result<i64> {
    std::str::from_utf8(body)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            Error::Protocol(format!(
                "Invalid integer in header: {:?}",
                String::from_utf8_lossy(body)
            ))
        })
}

fn checked_len(len: i64, max: usize, what: &str) -> Result<usize> {
    let len = len as usize;
    if len > max {
        return Err(Error::Protocol(format!(
            "{} too large: {} (max {})",
            what, len, max
        )));
    }
    Ok(len)
}

// =============================================================================
// Frame Collection
// =============================================================================

/// What the frame reader needs next after consuming a header line
enum Next {
    /// Element fully read
    Done,
    /// Read a bulk body of this many bytes (plus CRLF)
    Body(usize),
    /// Read this many nested elements
    Elements(usize),
}

/// Inspect one header line and decide what follows it
fn classify(line: &[u8]) -> Result<Next> {
    let trimmed = line.strip_suffix(CRLF).ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed mid-reply",
        ))
    })?;

    match trimmed.first() {
        Some(b'+') | Some(b'-') | Some(b':') => Ok(Next::Done),
        Some(b'$') => {
            let len = parse_int(&trimmed[1..])?;
            if len < 0 {
                Ok(Next::Done)
            } else {
                Ok(Next::Body(checked_len(len, MAX_BULK_SIZE, "Bulk payload")?))
            }
        }
        Some(b'*') => {
            let count = parse_int(&trimmed[1..])?;
            if count <= 0 {
                Ok(Next::Done)
            } else {
                Ok(Next::Elements(checked_len(count, MAX_ARRAY_LEN, "Array")?))
            }
        }
        Some(other) => Err(Error::Protocol(format!(
            "Unknown reply type: 0x{:02x}",
            other
        ))),
        None => Err(Error::Protocol("Empty reply line".to_string())),
    }
}

/// Read one complete reply frame from a buffered stream
///
/// Blocks until the whole frame has arrived or an error occurs
pub fn read_frame<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut frame = Vec::new();
    let mut pending = 1usize;

    while pending > 0 {
        let start = frame.len();
        if reader.read_until(b'\n', &mut frame)? == 0 {
            return Err(eof());
        }
        pending -= 1;

        match classify(&frame[start..])? {
            Next::Done => {}
            Next::Body(len) => {
                let body_start = frame.len();
                frame.resize(body_start + len + CRLF.len(), 0);
                reader.read_exact(&mut frame[body_start..])?;
            }
            Next::Elements(count) => pending += count,
        }
    }

    Ok(frame)
}

/// Read and decode one reply from a buffered stream
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    let frame = read_frame(reader)?;
    decode_reply(&frame)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, keyword: &str, args: &[Arg]) -> Result<()> {
    let bytes = encode_command(keyword, args);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Async twin of [`read_frame`]
pub async fn read_frame_async<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Vec<u8>> {
    let mut frame = Vec::new();
    let mut pending = 1usize;

    while pending > 0 {
        let start = frame.len();
        if reader.read_until(b'\n', &mut frame).await? == 0 {
            return Err(eof());
        }
        pending -= 1;

        match classify(&frame[start..])? {
            Next::Done => {}
            Next::Body(len) => {
                let body_start = frame.len();
                frame.resize(body_start + len + CRLF.len(), 0);
                reader.read_exact(&mut frame[body_start..]).await?;
            }
            Next::Elements(count) => pending += count,
        }
    }

    Ok(frame)
}

/// Async twin of [`read_reply`]
pub async fn read_reply_async<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Reply> {
    let frame = read_frame_async(reader).await?;
    decode_reply(&frame)
}

/// Async twin of [`write_command`]
pub async fn write_command_async<W: AsyncWrite + Unpin>(
    writer: &mut W,
    keyword: &str,
    args: &[Arg],
) -> Result<()> {
    let bytes = encode_command(keyword, args);
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

fn eof() -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "connection closed by server",
    ))
}
