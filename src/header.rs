use crate::error::{PfEdError, Result};
use otspec::types::*;
use otspec::{DeserializationError, Deserialize, Deserializer, ReaderContext};
use serde::Serialize;

/// The only PfEd table version ever produced.
pub const VERSION: uint32 = 0x0001_0000;

/// The fixed eight bytes at the start of a PfEd table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableHeader {
    pub version: uint32,
    pub subtable_count: uint32,
}

impl Deserialize for TableHeader {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let version = c.de()?;
        let subtable_count = c.de()?;
        Ok(TableHeader {
            version,
            subtable_count,
        })
    }
}

impl TableHeader {
    /// Reads the header and rejects any version other than [`VERSION`].
    pub fn read(c: &mut ReaderContext) -> Result<Self> {
        let header: TableHeader = c.de()?;
        log::info!(
            "Got PfEd table version {:x} with {} subtables (length 0x{:08x} bytes)",
            header.version,
            header.subtable_count,
            c.len()
        );
        if header.version != VERSION {
            return Err(PfEdError::UnsupportedVersion {
                what: "PfEd table",
                version: header.version,
            });
        }
        Ok(header)
    }
}
