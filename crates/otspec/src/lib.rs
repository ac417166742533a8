//! Reading primitives for OpenType binary data.
//!
//! This library is used by the pfed crate. It knows nothing about any
//! particular table; it provides a cursor over a borrowed byte buffer
//! ([`ReaderContext`]), big-endian primitive decoding through the
//! [`Deserialize`] trait, OpenType [`Tag`]s and a few small shared types.
#![allow(non_camel_case_types)]
#[macro_use]
extern crate shrinkwraprs;
use crate::types::*;
use std::convert::TryInto;
use std::mem;
use thiserror::Error;

pub mod tag;
pub mod types;

pub use crate::tag::{InvalidTag, Tag};

/// Errors raised while reading from a [`ReaderContext`].
///
/// All offsets are absolute, counted from the start of the buffer the
/// context was created over, even when the context has been rebased.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeserializationError {
    #[error("Truncated buffer: wanted {wanted} bytes at offset {offset}, only {available} available")]
    TruncatedBuffer {
        offset: usize,
        wanted: usize,
        available: usize,
    },

    #[error("Invalid UTF-8 string at offset {offset}: {source}")]
    InvalidEncoding {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Offset {offset} is outside of a buffer of {len} bytes")]
    OutOfBounds { offset: usize, len: usize },
}

/// A read position over an immutable byte buffer.
///
/// A context is cheap to clone, and cloning is how several independent
/// cursors are made to alias the same bytes: one can follow an offset
/// while another keeps reading sequentially.
///
/// Seeking past the end of the buffer fails immediately with
/// [`DeserializationError::OutOfBounds`]. Seeking to exactly the end is
/// allowed; the next read then fails with
/// [`DeserializationError::TruncatedBuffer`].
#[derive(Debug, Clone)]
pub struct ReaderContext<'a> {
    input: &'a [u8],
    base: usize,
    ptr: usize,
}

impl<'a> ReaderContext<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        ReaderContext {
            input,
            base: 0,
            ptr: 0,
        }
    }

    /// Creates a context whose position zero is `base` bytes into `input`.
    ///
    /// Every later `seek` is relative to `base`, which is how offsets
    /// stored inside a subtable are resolved.
    pub fn rebased(input: &'a [u8], base: usize) -> Result<Self, DeserializationError> {
        if base > input.len() {
            return Err(DeserializationError::OutOfBounds {
                offset: base,
                len: input.len(),
            });
        }
        Ok(ReaderContext {
            input: &input[base..],
            base,
            ptr: 0,
        })
    }

    /// Current position, relative to the base of this context.
    pub fn ptr(&self) -> usize {
        self.ptr
    }

    /// Current position as an absolute offset into the original buffer.
    pub fn absolute_ptr(&self) -> usize {
        self.base + self.ptr
    }

    /// Number of bytes visible to this context.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Number of bytes left between the current position and the end.
    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.ptr)
    }

    fn consume_or_peek(
        &mut self,
        bytes: usize,
        consume: bool,
    ) -> Result<&'a [u8], DeserializationError> {
        let available = self.remaining();
        if bytes > available {
            Err(DeserializationError::TruncatedBuffer {
                offset: self.absolute_ptr(),
                wanted: bytes,
                available,
            })
        } else {
            let subslice = &self.input[self.ptr..self.ptr + bytes];
            if consume {
                self.ptr += bytes;
            }
            Ok(subslice)
        }
    }

    pub(crate) fn consume(&mut self, bytes: usize) -> Result<&'a [u8], DeserializationError> {
        self.consume_or_peek(bytes, true)
    }

    pub fn peek(&mut self, bytes: usize) -> Result<&'a [u8], DeserializationError> {
        self.consume_or_peek(bytes, false)
    }

    /// Moves to `offset`, relative to the base of this context.
    pub fn seek(&mut self, offset: usize) -> Result<(), DeserializationError> {
        if offset > self.input.len() {
            return Err(DeserializationError::OutOfBounds {
                offset: self.base + offset,
                len: self.base + self.input.len(),
            });
        }
        self.ptr = offset;
        Ok(())
    }

    pub fn skip(&mut self, bytes: usize) -> Result<(), DeserializationError> {
        self.consume(bytes).map(|_| ())
    }

    /// Reads a NUL-terminated UTF-8 string and moves past the terminator.
    pub fn read_utf8_string(&mut self) -> Result<String, DeserializationError> {
        let rest = &self.input[self.ptr.min(self.input.len())..];
        let offset = self.absolute_ptr();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DeserializationError::TruncatedBuffer {
                offset,
                wanted: rest.len() + 1,
                available: rest.len(),
            })?;
        let s = std::str::from_utf8(&rest[..len])
            .map_err(|source| DeserializationError::InvalidEncoding { offset, source })?;
        self.ptr += len + 1;
        Ok(s.to_string())
    }
}

pub trait Deserializer<T>
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError>;
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError>;
}

impl<T> Deserializer<T> for ReaderContext<'_>
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError> {
        T::from_bytes(self)
    }
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError> {
        (0..s)
            .map(|_| {
                let c: Result<T, DeserializationError> = self.de();
                c
            })
            .collect()
    }
}

pub trait Deserialize {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError>
    where
        Self: std::marker::Sized;
}

macro_rules! de_primitive {
    ($t: ty) => {
        impl Deserialize for $t {
            fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
                let bytes: &[u8] = c.consume(mem::size_of::<$t>())?;
                let bytes_array: [u8; mem::size_of::<$t>()] =
                    bytes
                        .try_into()
                        .map_err(|_| DeserializationError::TruncatedBuffer {
                            offset: c.absolute_ptr(),
                            wanted: mem::size_of::<$t>(),
                            available: bytes.len(),
                        })?;
                Ok(<$t>::from_be_bytes(bytes_array))
            }
        }
    };
}

de_primitive!(i8);
de_primitive!(u8);
de_primitive!(u16);
de_primitive!(u32);
de_primitive!(i16);
de_primitive!(i32);

/// An array preceded by its 16-bit element count.
#[derive(Shrinkwrap, Debug, PartialEq)]
pub struct Counted<T>(pub Vec<T>);

impl<T> Deserialize for Counted<T>
where
    T: Deserialize,
{
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let len: uint16 = c.de()?;
        let mut res: Vec<T> = vec![];
        for _ in 0..len {
            res.push(c.de()?)
        }
        Ok(Counted(res))
    }
}

impl<T> From<Vec<T>> for Counted<T> {
    fn from(v: Vec<T>) -> Self {
        Counted(v)
    }
}

impl<T> From<Counted<T>> for Vec<T> {
    fn from(v: Counted<T>) -> Self {
        v.0
    }
}

impl<T> PartialEq<Vec<T>> for Counted<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &std::vec::Vec<T>) -> bool {
        &self.0 == other
    }
}

/* Provide a serde-style interface */
pub mod de {
    pub use crate::{DeserializationError, Deserialize, Deserializer, ReaderContext};
    pub fn from_bytes<T: Deserialize>(data: &[u8]) -> Result<T, DeserializationError> {
        let mut rc = ReaderContext::new(data);
        rc.de()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn de_primitive() {
        let bytes = [0x00, 0x01, 0xff, 0xfe, 0x00, 0x00, 0x00, 0x04];
        let mut rc = ReaderContext::new(&bytes);
        let first: u16 = rc.de().unwrap();
        let second: i16 = rc.de().unwrap();
        let third: u32 = rc.de().unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, -2);
        assert_eq!(third, 4);
        assert_eq!(rc.remaining(), 0);
    }

    #[test]
    fn de_truncated() {
        let bytes = [0x00, 0x01, 0x00];
        let mut rc = ReaderContext::new(&bytes);
        let _: u16 = rc.de().unwrap();
        let res: Result<u16, _> = rc.de();
        assert_eq!(
            res,
            Err(DeserializationError::TruncatedBuffer {
                offset: 2,
                wanted: 2,
                available: 1
            })
        );
        // A failed read leaves the position alone
        assert_eq!(rc.ptr(), 2);
    }

    #[test]
    fn de_counted() {
        let bytes = [0x00, 0x02, 0x00, 0x0a, 0x00, 0x0b];
        let mut rc = ReaderContext::new(&bytes);
        let t: Counted<u16> = rc.de().unwrap();
        assert_eq!(t[0], 10);
        assert_eq!(t, vec![10, 11]);
    }

    #[test]
    fn de_tag() {
        let t: Tag = de::from_bytes(&[0x47, 0x53, 0x55, 0x42]).unwrap();
        assert_eq!(t, Tag::new(b"GSUB"));
        // Malformed tags are read as they are
        let odd: Tag = de::from_bytes(&[0x47, 0x00, 0x55, 0x42]).unwrap();
        assert_eq!(odd.as_bytes(), &[0x47, 0x00, 0x55, 0x42]);
        assert!(odd.validate().is_err());
        let short: Result<Tag, _> = de::from_bytes(&[0x47, 0x53]);
        assert!(matches!(
            short,
            Err(DeserializationError::TruncatedBuffer { offset: 0, .. })
        ));
    }

    #[test]
    fn utf8_strings() {
        let bytes = b"caf\xc3\xa9\0x\0";
        let mut rc = ReaderContext::new(bytes);
        assert_eq!(rc.read_utf8_string().unwrap(), "café");
        assert_eq!(rc.ptr(), 6);
        assert_eq!(rc.read_utf8_string().unwrap(), "x");
        assert_eq!(rc.remaining(), 0);
    }

    #[test]
    fn unterminated_string() {
        let mut rc = ReaderContext::new(b"abc");
        assert_eq!(
            rc.read_utf8_string(),
            Err(DeserializationError::TruncatedBuffer {
                offset: 0,
                wanted: 4,
                available: 3
            })
        );
    }

    #[test]
    fn invalid_utf8() {
        let mut rc = ReaderContext::new(b"a\xff\0");
        assert!(matches!(
            rc.read_utf8_string(),
            Err(DeserializationError::InvalidEncoding { offset: 0, .. })
        ));
    }

    #[test]
    fn rebased_contexts_alias() {
        let bytes = [0xaa, 0xbb, 0x00, 0x04, b'h', b'i', 0x00];
        let mut rc = ReaderContext::rebased(&bytes, 2).unwrap();
        let mut strings = rc.clone();
        let off: u16 = rc.de().unwrap();
        strings.seek(off as usize - 2).unwrap();
        assert_eq!(strings.read_utf8_string().unwrap(), "hi");
        assert_eq!(rc.ptr(), 2);
        assert_eq!(rc.absolute_ptr(), 4);
    }

    #[test]
    fn seek_bounds() {
        let bytes = [0x00, 0x01, 0x02, 0x03];
        let mut rc = ReaderContext::rebased(&bytes, 1).unwrap();
        assert!(rc.seek(3).is_ok());
        let res: Result<u8, _> = rc.de();
        assert!(matches!(
            res,
            Err(DeserializationError::TruncatedBuffer { offset: 4, .. })
        ));
        assert_eq!(
            rc.seek(4),
            Err(DeserializationError::OutOfBounds { offset: 5, len: 4 })
        );
        assert!(ReaderContext::rebased(&bytes, 5).is_err());
    }
}
