//! Reply definitions
//!
//! A closed tagged variant for everything a server can answer with, and the
//! decoders that turn it into native types. Decoders match on the variant
//! they expect and return [`Error::Decode`] on any other shape.

use bytes::Bytes;

use crate::error::{Error, Result};

/// A decoded server reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Null bulk string or null array
    Nil,

    /// Simple status string (e.g. `OK`)
    Status(String),

    /// Integer reply
    Integer(i64),

    /// Bulk string (binary safe)
    Bulk(Bytes),

    /// Array of nested replies
    Array(Vec<Reply>),
}

impl Reply {
    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Nil => "nil",
            Reply::Status(_) => "status",
            Reply::Integer(_) => "integer",
            Reply::Bulk(_) => "bulk",
            Reply::Array(_) => "array",
        }
    }

    /// Textual form of a scalar reply; `None` for nil, arrays and non-UTF-8 bulk
    pub fn as_text(&self) -> Option<String> {
        match self {
            Reply::Status(s) => Some(s.clone()),
            Reply::Bulk(b) => std::str::from_utf8(b).ok().map(str::to_string),
            Reply::Integer(n) => Some(n.to_string()),
            Reply::Nil | Reply::Array(_) => None,
        }
    }

    /// Unwrap an array reply
    pub fn into_array(self) -> Result<Vec<Reply>> {
        match self {
            Reply::Array(items) => Ok(items),
            other => Err(mismatch("array", &other)),
        }
    }
}

pub(crate) fn mismatch(expected: &str, got: &Reply) -> Error {
    Error::Decode(format!("expected {} reply, got {}", expected, got.kind()))
}

// =============================================================================
// Decoding
// =============================================================================

/// Conversion from a raw reply into a native value
pub trait FromReply: Sized {
    fn from_reply(reply: Reply) -> Result<Self>;
}

impl FromReply for Reply {
    fn from_reply(reply: Reply) -> Result<Self> {
        Ok(reply)
    }
}

impl FromReply for i64 {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Integer(n) => Ok(n),
            Reply::Status(ref s) => parse_number(s, &reply),
            Reply::Bulk(ref b) => parse_number(&String::from_utf8_lossy(b), &reply),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl FromReply for f64 {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Integer(n) => Ok(n as f64),
            Reply::Status(ref s) => parse_number(s, &reply),
            Reply::Bulk(ref b) => parse_number(&String::from_utf8_lossy(b), &reply),
            other => Err(mismatch("double", &other)),
        }
    }
}

/// Integer replies: positive is true, zero or negative is false
impl FromReply for bool {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Integer(n) => Ok(n > 0),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl FromReply for String {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Status(s) => Ok(s),
            Reply::Bulk(b) => String::from_utf8(b.to_vec())
                .map_err(|e| Error::Decode(format!("bulk reply is not UTF-8: {}", e))),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FromReply for Bytes {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Bulk(b) => Ok(b),
            Reply::Status(s) => Ok(Bytes::from(s)),
            other => Err(mismatch("bulk", &other)),
        }
    }
}

impl<T: FromReply> FromReply for Option<T> {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Nil => Ok(None),
            other => T::from_reply(other).map(Some),
        }
    }
}

impl<T: FromReply> FromReply for Vec<T> {
    fn from_reply(reply: Reply) -> Result<Self> {
        reply.into_array()?.into_iter().map(T::from_reply).collect()
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, reply: &Reply) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| Error::Decode(format!("{} reply {:?} is not a number", reply.kind(), text)))
}

// =============================================================================
// Decoder shapes shared by the command families
// =============================================================================

/// Success token returned by reserve/init/load-chunk style commands
pub const OK: &str = "OK";

/// Status-to-boolean: true iff the reply's text is `OK`
///
/// Any other scalar is false. An array has no textual form and fails to decode.
pub fn decode_ok(reply: Reply) -> Result<bool> {
    match reply {
        Reply::Array(_) => Err(mismatch("status", &reply)),
        other => Ok(other.as_text().as_deref() == Some(OK)),
    }
}

/// Decode a value through its [`FromReply`] impl
pub fn decode<T: FromReply>(reply: Reply) -> Result<T> {
    T::from_reply(reply)
}

/// Decode a single value that the server may wrap in a one-element array
pub fn decode_single<T: FromReply>(reply: Reply) -> Result<T> {
    match reply {
        Reply::Array(mut items) => {
            if items.len() != 1 {
                return Err(Error::Decode(format!(
                    "expected a single-element array, got {} elements",
                    items.len()
                )));
            }
            T::from_reply(items.remove(0))
        }
        scalar => T::from_reply(scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ok() {
        assert!(decode_ok(Reply::Status("OK".into())).unwrap());
        assert!(decode_ok(Reply::Bulk(Bytes::from_static(b"OK"))).unwrap());
        assert!(!decode_ok(Reply::Status("QUEUED".into())).unwrap());
        assert!(!decode_ok(Reply::Integer(1)).unwrap());
        assert!(!decode_ok(Reply::Nil).unwrap());
        assert!(decode_ok(Reply::Array(vec![])).is_err());
    }

    #[test]
    fn test_bool_from_integer() {
        assert!(bool::from_reply(Reply::Integer(1)).unwrap());
        assert!(!bool::from_reply(Reply::Integer(0)).unwrap());
        assert!(!bool::from_reply(Reply::Integer(-1)).unwrap());
        assert!(matches!(
            bool::from_reply(Reply::Status("OK".into())),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_numbers_from_text() {
        assert_eq!(i64::from_reply(Reply::Bulk(Bytes::from_static(b"17"))).unwrap(), 17);
        assert_eq!(f64::from_reply(Reply::Bulk(Bytes::from_static(b"0.925"))).unwrap(), 0.925);
        assert_eq!(f64::from_reply(Reply::Integer(3)).unwrap(), 3.0);
        assert!(i64::from_reply(Reply::Bulk(Bytes::from_static(b"abc"))).is_err());
        assert!(i64::from_reply(Reply::Nil).is_err());
    }

    #[test]
    fn test_optional_string_array() {
        let reply = Reply::Array(vec![Reply::Nil, Reply::Bulk(Bytes::from_static(b"foo"))]);
        let decoded: Vec<Option<String>> = decode(reply).unwrap();
        assert_eq!(decoded, vec![None, Some("foo".to_string())]);
    }

    #[test]
    fn test_array_element_mismatch_is_error() {
        let reply = Reply::Array(vec![Reply::Integer(1), Reply::Status("x".into())]);
        assert!(matches!(decode::<Vec<bool>>(reply), Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_single() {
        assert_eq!(decode_single::<i64>(Reply::Integer(4)).unwrap(), 4);
        assert_eq!(decode_single::<i64>(Reply::Array(vec![Reply::Integer(4)])).unwrap(), 4);
        assert!(decode_single::<i64>(Reply::Array(vec![])).is_err());
        assert_eq!(
            decode_single::<Option<String>>(Reply::Array(vec![Reply::Nil])).unwrap(),
            None
        );
    }
}
