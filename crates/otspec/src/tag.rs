//! OpenType tags.

use crate::{DeserializationError, Deserialize, ReaderContext};
use std::str::FromStr;

/// An OpenType tag.
///
/// A well-formed tag is a 4-byte array where each byte is in the printable
/// ascii range (0x20..=0x7E). Tags read from a font are not checked, since
/// malformed ones turn up in real files and still have to be reported;
/// use [`Tag::validate`] to find out whether a tag is well-formed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Create a tag from a byte array, without validation.
    ///
    /// Intended for tags known at compile time; use [`Tag::from_raw`] to
    /// check untrusted input.
    pub const fn new(src: &[u8; 4]) -> Self {
        Tag(*src)
    }

    /// Create a tag from raw big-endian bytes, as read from a font.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Tag(bytes)
    }

    /// Attempt to create a `Tag` from raw bytes.
    ///
    /// The slice must contain between 1 and 4 characters, each in the printable
    /// ascii range (`0x20..=0x7E`).
    ///
    /// If the input has fewer than four bytes, spaces will be appended.
    pub fn from_raw(src: impl AsRef<[u8]>) -> Result<Self, InvalidTag> {
        let src = src.as_ref();
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut out = [b' '; 4];
        out[..src.len()].copy_from_slice(src);
        let tag = Tag(out);
        tag.validate()?;
        Ok(tag)
    }

    /// Checks that every byte is printable ascii.
    pub fn validate(&self) -> Result<(), InvalidTag> {
        match self.0.iter().position(|b| !(0x20..=0x7E).contains(b)) {
            Some(pos) => Err(InvalidTag::InvalidByte {
                pos,
                byte: self.0[pos],
            }),
            None => Ok(()),
        }
    }

    /// This tag as raw bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

/// An error representing an invalid tag.
#[derive(Clone, PartialEq, Eq)]
pub enum InvalidTag {
    InvalidLength(usize),
    InvalidByte { pos: usize, byte: u8 },
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::from_raw(src)
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        &self.0[..] == other.as_bytes()
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Deserialize for Tag {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let mut bytes = [0; 4];
        bytes.copy_from_slice(c.consume(4)?);
        Ok(Tag::from_be_bytes(bytes))
    }
}

impl serde::Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Printable bytes are written as they are, anything else as `{0xNN}`.
impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for &byte in &self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{:02X}}}", byte)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

impl std::fmt::Display for InvalidTag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "length {} not in accepted range (1..=4)", len),
            Self::InvalidByte { pos, byte } => {
                write!(f, "invalid byte '0x{:02X}' at position {}", byte, pos)
            }
        }
    }
}

impl std::fmt::Debug for InvalidTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLength(arg0) => f.debug_tuple("InvalidLength").field(arg0).finish(),
            Self::InvalidByte { pos, byte } => f
                .debug_struct("InvalidByte")
                .field("pos", pos)
                .field("byte", &format!("{:02X}", byte))
                .finish(),
        }
    }
}

impl std::error::Error for InvalidTag {}
