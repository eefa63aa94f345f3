//! Command arguments
//!
//! A command is a keyword followed by an ordered list of scalar arguments.

use bytes::Bytes;

/// A single command argument, ready for transmission
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Text (names, items, flag tokens)
    Str(String),

    /// Signed integer (capacities, counts, iterators)
    Int(i64),

    /// Floating point (error rates, probabilities, decay)
    Float(f64),

    /// Opaque binary payload (dump chunks)
    Bytes(Bytes),
}

impl Arg {
    /// Render the argument the way it goes on the wire
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Arg::Str(s) => Bytes::copy_from_slice(s.as_bytes()),
            Arg::Int(n) => Bytes::from(n.to_string()),
            Arg::Float(f) => Bytes::from(format_float(*f)),
            Arg::Bytes(b) => b.clone(),
        }
    }

    /// Text view, if this is a `Str` argument
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Shortest decimal that reads back as the same f64
fn format_float(f: f64) -> String {
    if f.is_infinite() {
        if f.is_sign_positive() { "inf" } else { "-inf" }.to_string()
    } else {
        // Debug keeps a fractional part ("2.0") which the server accepts as a double
        format!("{:?}", f)
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<u32> for Arg {
    fn from(n: u32) -> Self {
        Arg::Int(i64::from(n))
    }
}

impl From<usize> for Arg {
    /// Saturates at `i64::MAX`
    fn from(n: usize) -> Self {
        Arg::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Arg {
    fn from(f: f64) -> Self {
        Arg::Float(f)
    }
}

impl From<&[u8]> for Arg {
    fn from(b: &[u8]) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Arg {
    fn from(b: Vec<u8>) -> Self {
        Arg::Bytes(Bytes::from(b))
    }
}

impl From<Bytes> for Arg {
    fn from(b: Bytes) -> Self {
        Arg::Bytes(b)
    }
}
