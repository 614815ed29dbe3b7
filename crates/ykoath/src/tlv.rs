//! Simple TLV codec used by the OATH applet
//!
//! Records are `[tag][length][payload]` with a one-byte length. Encoding
//! has two protocol quirks: the length byte is omitted for payloads shorter
//! than two bytes (single-byte property fields carry no length), and the
//! sentinel tag `0x00` omits the tag byte, wrapping an already-framed body.
//! Decoding always reads an explicit length byte; the quirks exist only on
//! the command side.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// A decoded tag/value record
///
/// Responses decode to an ordered sequence of these. Order and repetition
/// are load-bearing (CALCULATE ALL pairs each name record with the record
/// that follows it), so responses are never collapsed into a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    /// Tag byte
    pub tag: u8,
    /// Payload bytes
    pub value: Bytes,
}

impl TagValue {
    /// Create a new tag/value record
    pub fn new(tag: u8, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }
}

/// Encode one record from one or more payload fragments
///
/// Empty fragments are skipped, which keeps optional fields out of the
/// frame without conditionals at the call site.
///
/// # Panics
///
/// Panics if the combined payload exceeds 255 bytes. The one-byte length
/// field cannot represent more; hitting this is a programmer error that
/// must be caught before transmission.
pub fn encode(tag: u8, fragments: &[&[u8]]) -> Bytes {
    let length: usize = fragments.iter().map(|f| f.len()).sum();
    assert!(length <= 255, "TLV payload too long ({length} bytes)");

    let mut buf = BytesMut::with_capacity(2 + length);

    if tag != 0x00 {
        buf.put_u8(tag);
    }
    if length > 1 {
        buf.put_u8(length as u8);
    }
    for fragment in fragments {
        buf.put_slice(fragment);
    }

    buf.freeze()
}

/// Decode a buffer into its sequence of records
///
/// Tags are not validated here; rejecting unexpected tags is the
/// instruction layer's job. A length byte pointing past the end of the
/// buffer is a fatal decode error.
pub fn decode(mut buf: &[u8]) -> Result<Vec<TagValue>> {
    let mut tvs = Vec::new();

    while !buf.is_empty() {
        let [tag, length, rest @ ..] = buf else {
            return Err(Error::Decode("record header truncated"));
        };
        let length = *length as usize;
        if rest.len() < length {
            return Err(Error::Decode("record value truncated"));
        }
        tvs.push(TagValue::new(*tag, Bytes::copy_from_slice(&rest[..length])));
        buf = &rest[length..];
    }

    Ok(tvs)
}
