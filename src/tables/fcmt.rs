use crate::error::{check_version, Result};
use otspec::types::*;
use otspec::{Deserializer, ReaderContext};

/// The 'fcmt' PfEd tag.
pub const TAG: Tag = Tag::new(b"fcmt");
/// The 'flog' PfEd tag. Font logs share the font comment layout.
pub const FLOG_TAG: Tag = Tag::new(b"flog");

/// Decodes the font comment string.
///
/// Only version 1 (UTF-8) is understood; version 0 stored UCS-2 and is
/// rejected.
pub fn decode(data: &[u8], offset: uint32) -> Result<String> {
    read_text("fcmt", data, offset)
}

/// Decodes the font log string, which is laid out like the font comment.
pub fn decode_log(data: &[u8], offset: uint32) -> Result<String> {
    read_text("flog", data, offset)
}

fn read_text(what: &'static str, data: &[u8], offset: uint32) -> Result<String> {
    let mut c = ReaderContext::rebased(data, offset as usize)?;
    let version: uint16 = c.de()?;
    check_version(what, version, 1)?;
    let _length: uint16 = c.de()?;
    Ok(c.read_utf8_string()?)
}

#[cfg(test)]
pub(crate) const SAMPLE: &[u8] = b"\x00\x01\x00\x06Hello\x00";
