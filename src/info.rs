//! Info Module
//!
//! Decoding of INFO-style replies: a flat array alternating a text label
//! with its value.
//!
//! ## Scan
//! ```text
//! [ "Capacity", 100, "Size", 296, "Some new field", "x", ... ]
//!     label     value  label value  label (unknown)  skipped
//! ```
//!
//! The scan is single-pass, left to right, two elements at a time. Each
//! record owns its label table; unknown labels are skipped together with
//! their value so fields added by newer servers never break decoding.

use crate::error::{Error, Result};
use crate::protocol::{mismatch, FromReply, Reply};

/// A record filled from a label/value reply
pub trait InfoRecord: Default {
    /// Store `value` in the field named by `label`
    ///
    /// Returns `Ok(false)` when the label is not one this record knows.
    fn assign(&mut self, label: &str, value: Reply) -> Result<bool>;
}

/// Decode a label/value array into `R`, starting from `R::default()`
pub fn decode_info<R: InfoRecord>(reply: Reply) -> Result<R> {
    let items = reply.into_array()?;
    if items.len() % 2 != 0 {
        return Err(Error::Decode(format!(
            "info reply has odd length {}: label without value",
            items.len()
        )));
    }

    let mut record = R::default();
    let mut iter = items.into_iter();

    while let (Some(label), Some(value)) = (iter.next(), iter.next()) {
        let label = match label {
            Reply::Status(s) => s,
            Reply::Bulk(b) => String::from_utf8_lossy(&b).into_owned(),
            other => return Err(mismatch("label", &other)),
        };

        if !record.assign(&label, value)? {
            tracing::trace!(label = %label, "skipping unknown info field");
        }
    }

    Ok(record)
}

/// Decode one info field value, naming the label on failure
pub fn field<T: FromReply>(label: &str, value: Reply) -> Result<T> {
    T::from_reply(value).map_err(|e| match e {
        Error::Decode(msg) => Error::Decode(format!("field {:?}: {}", label, msg)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        width: i64,
        ratio: Option<f64>,
    }

    impl InfoRecord for Sample {
        fn assign(&mut self, label: &str, value: Reply) -> Result<bool> {
            match label {
                "width" => self.width = field(label, value)?,
                "ratio" => self.ratio = field(label, value)?,
                _ => return Ok(false),
            }
            Ok(true)
        }
    }

    fn label(s: &'static str) -> Reply {
        Reply::Bulk(Bytes::from_static(s.as_bytes()))
    }

    #[test]
    fn test_known_fields_assigned() {
        let reply = Reply::Array(vec![label("width"), Reply::Integer(20)]);
        let sample: Sample = decode_info(reply).unwrap();
        assert_eq!(sample, Sample { width: 20, ratio: None });
    }

    #[test]
    fn test_unknown_label_skips_its_value() {
        // the unknown label's value is itself a known label name
        let reply = Reply::Array(vec![
            label("mystery"),
            label("width"),
            label("ratio"),
            Reply::Bulk(Bytes::from_static(b"0.5")),
            label("width"),
            Reply::Integer(7),
        ]);
        let sample: Sample = decode_info(reply).unwrap();
        assert_eq!(sample, Sample { width: 7, ratio: Some(0.5) });
    }

    #[test]
    fn test_odd_length_is_decode_error() {
        let reply = Reply::Array(vec![label("width")]);
        assert!(matches!(decode_info::<Sample>(reply), Err(Error::Decode(_))));
    }

    #[test]
    fn test_non_array_is_decode_error() {
        assert!(matches!(decode_info::<Sample>(Reply::Integer(1)), Err(Error::Decode(_))));
    }

    #[test]
    fn test_bad_field_value_names_label() {
        let reply = Reply::Array(vec![label("width"), label("wide")]);
        match decode_info::<Sample>(reply) {
            Err(Error::Decode(msg)) => assert!(msg.contains("width")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_reply_gives_defaults() {
        let sample: Sample = decode_info(Reply::Array(vec![])).unwrap();
        assert_eq!(sample, Sample::default());
    }
}
