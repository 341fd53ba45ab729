//! XDR encoding for the wire types this crate owns.
//!
//! Only what the ACL transport needs lives here: big-endian `u32`, counted
//! opaque data and the NFSv4 UTF-8 string types. Every item on the wire is
//! a multiple of four bytes; variable-length data is zero-padded.
//!
//! ```text
//! +--------+--------+--------+--------+---------------+---------+
//! |        length n (big-endian)      | n bytes UTF-8 | 0-3 pad |
//! +--------+--------+--------+--------+---------------+---------+
//! ```

use std::fmt;

use crate::{VfsError, XdrConfig};

const XDR_UNIT: usize = 4;

#[inline]
fn padding(len: usize) -> usize {
    (XDR_UNIT - len % XDR_UNIT) % XDR_UNIT
}

/// Length or count prefix for `len` items. Prefixes above `i32::MAX` read
/// as negative on the wire and are refused.
pub(crate) fn wire_len(len: usize) -> Result<u32, VfsError> {
    u32::try_from(len)
        .ok()
        .filter(|&n| n <= i32::MAX as u32)
        .ok_or_else(|| VfsError::malformed(format!("length {len} does not fit a prefix")))
}

/// Types that can be written to an XDR stream.
pub trait XdrEncode {
    /// Append the wire form of `self` to `xdr`.
    ///
    /// # Errors
    ///
    /// - [`VfsError::MalformedWireData`] if a length cannot be represented
    fn xdr_encode(&self, xdr: &mut XdrEncoder) -> Result<(), VfsError>;
}

/// Types that can be read from an XDR stream.
pub trait XdrDecode: Sized {
    /// Read one value from `xdr`.
    ///
    /// # Errors
    ///
    /// - [`VfsError::MalformedWireData`] on truncated or out-of-bounds input
    fn xdr_decode(xdr: &mut XdrDecoder<'_>) -> Result<Self, VfsError>;
}

/// Growable XDR output buffer.
#[derive(Debug, Default, Clone)]
pub struct XdrEncoder {
    buf: Vec<u8>,
}

impl XdrEncoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a big-endian `u32`.
    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a length-prefixed, zero-padded byte sequence.
    ///
    /// # Errors
    ///
    /// - [`VfsError::MalformedWireData`] if `data` is longer than `i32::MAX`
    ///   bytes; nothing is written in that case
    pub fn put_opaque(&mut self, data: &[u8]) -> Result<(), VfsError> {
        self.put_u32(wire_len(data.len())?);
        self.buf.extend_from_slice(data);
        self.buf
            .extend(std::iter::repeat_n(0u8, padding(data.len())));
        Ok(())
    }

    /// Encode any [`XdrEncode`] value.
    pub fn put<T: XdrEncode + ?Sized>(&mut self, value: &T) -> Result<(), VfsError> {
        value.xdr_encode(self)
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the encoder and return the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// XDR input cursor over a borrowed buffer.
#[derive(Debug)]
pub struct XdrDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    config: XdrConfig,
}

impl<'a> XdrDecoder<'a> {
    /// Create a decoder with default limits.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, XdrConfig::default())
    }

    /// Create a decoder with explicit limits.
    pub fn with_config(data: &'a [u8], config: XdrConfig) -> Self {
        Self {
            data,
            pos: 0,
            config,
        }
    }

    /// The limits in effect.
    pub fn config(&self) -> &XdrConfig {
        &self.config
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], VfsError> {
        if self.remaining() < len {
            return Err(VfsError::malformed(format!(
                "truncated stream: need {len} bytes, {} left",
                self.remaining()
            )));
        }
        let data: &'a [u8] = self.data;
        let slice = &data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a big-endian `u32`.
    pub fn get_u32(&mut self) -> Result<u32, VfsError> {
        let bytes = self.take(XDR_UNIT)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a length-prefixed byte sequence of at most `max` bytes and skip
    /// its padding.
    pub fn get_opaque(&mut self, max: u32) -> Result<&'a [u8], VfsError> {
        let len = self.get_u32()?;
        if len > i32::MAX as u32 {
            return Err(VfsError::malformed(format!(
                "negative length prefix: {}",
                len as i32
            )));
        }
        if len > max {
            return Err(VfsError::malformed(format!(
                "length {len} exceeds limit {max}"
            )));
        }
        let len = len as usize;
        let payload = self.take(len)?;
        self.take(padding(len))?;
        Ok(payload)
    }

    /// Decode any [`XdrDecode`] value.
    pub fn get<T: XdrDecode>(&mut self) -> Result<T, VfsError> {
        T::xdr_decode(self)
    }
}

impl XdrEncode for u32 {
    fn xdr_encode(&self, xdr: &mut XdrEncoder) -> Result<(), VfsError> {
        xdr.put_u32(*self);
        Ok(())
    }
}

impl XdrDecode for u32 {
    fn xdr_decode(xdr: &mut XdrDecoder<'_>) -> Result<Self, VfsError> {
        xdr.get_u32()
    }
}

// =============================================================================
// UTF-8 strings
// =============================================================================

/// NFSv4 `utf8string`: a byte-preserving UTF-8 string.
///
/// The bytes are kept exactly as received. No normalization is applied, so
/// decoding and re-encoding reproduces the peer's bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Utf8String(Vec<u8>);

impl Utf8String {
    /// Wrap raw bytes without validation.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The string, if the bytes are valid UTF-8.
    ///
    /// # Errors
    ///
    /// - [`VfsError::MalformedWireData`] if the bytes are not UTF-8
    pub fn as_str(&self) -> Result<&str, VfsError> {
        std::str::from_utf8(&self.0).map_err(|e| VfsError::malformed(format!("invalid utf-8: {e}")))
    }

    /// Length of the payload in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Utf8String {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Utf8String {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl fmt::Display for Utf8String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl XdrEncode for Utf8String {
    fn xdr_encode(&self, xdr: &mut XdrEncoder) -> Result<(), VfsError> {
        xdr.put_opaque(&self.0)
    }
}

impl XdrDecode for Utf8String {
    fn xdr_decode(xdr: &mut XdrDecoder<'_>) -> Result<Self, VfsError> {
        let max = xdr.config().max_string_len;
        Ok(Self(xdr.get_opaque(max)?.to_vec()))
    }
}

macro_rules! utf8_flavor {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(pub Utf8String);

        impl $name {
            /// The string, if the bytes are valid UTF-8.
            ///
            /// # Errors
            ///
            /// - [`VfsError::MalformedWireData`] if the bytes are not UTF-8
            pub fn as_str(&self) -> Result<&str, VfsError> {
                self.0.as_str()
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(Utf8String::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Utf8String::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl XdrEncode for $name {
            fn xdr_encode(&self, xdr: &mut XdrEncoder) -> Result<(), VfsError> {
                self.0.xdr_encode(xdr)
            }
        }

        impl XdrDecode for $name {
            fn xdr_decode(xdr: &mut XdrDecoder<'_>) -> Result<Self, VfsError> {
                Utf8String::xdr_decode(xdr).map(Self)
            }
        }
    };
}

utf8_flavor!(
    /// NFSv4 `utf8str_cs`: a case-sensitive UTF-8 string (path components).
    Utf8StrCs
);

utf8_flavor!(
    /// NFSv4 `utf8str_mixed`: a principal string, `user@domain` or a special
    /// principal such as `OWNER@`.
    Utf8StrMixed
);
