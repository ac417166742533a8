use otspec::{DeserializationError, Tag};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PfEdError {
    #[error("Unsupported {what} version {version:#x}")]
    UnsupportedVersion { what: &'static str, version: u32 },

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

    #[error("Offset {offset} is outside of a table of {len} bytes")]
    OutOfBounds { offset: usize, len: usize },

    #[error("Unsupported PfEd subtable '{tag}'")]
    UnsupportedFormat { tag: Tag },
}

impl From<DeserializationError> for PfEdError {
    fn from(e: DeserializationError) -> Self {
        match e {
            DeserializationError::TruncatedBuffer {
                offset,
                wanted,
                available,
            } => PfEdError::TruncatedBuffer {
                offset,
                wanted,
                available,
            },
            DeserializationError::InvalidEncoding { offset, source } => {
                PfEdError::InvalidEncoding { offset, source }
            }
            DeserializationError::OutOfBounds { offset, len } => {
                PfEdError::OutOfBounds { offset, len }
            }
        }
    }
}

/// A problem in the table which does not stop it from being read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// The table of contents lists this tag more than once. Only the first
    /// entry, at `offset`, is decoded.
    DuplicatedSubtable { tag: Tag, offset: u32 },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::DuplicatedSubtable { tag, offset } => write!(
                f,
                "Duplicated subtable '{}' in PfEd, only the one at 0x{:08x} will be parsed",
                tag, offset
            ),
        }
    }
}

pub type Result<T, E = PfEdError> = std::result::Result<T, E>;

pub(crate) fn check_version(what: &'static str, found: u16, expected: u16) -> Result<()> {
    if found != expected {
        return Err(PfEdError::UnsupportedVersion {
            what,
            version: found.into(),
        });
    }
    Ok(())
}
