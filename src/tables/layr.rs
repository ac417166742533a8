use crate::error::{check_version, Result};
use bitflags::bitflags;
use otspec::types::*;
use otspec::{Deserializer, ReaderContext};
use serde::Serialize;

/// The 'layr' PfEd tag.
pub const TAG: Tag = Tag::new(b"layr");

bitflags! {
    /// Flags stored in the high byte of a layer's type word
    #[derive(Serialize)]
    pub struct LayerFlags: u8 {
        /// The layer is a foreground layer
        const FOREGROUND = 0x01;
    }
}

/// A run of consecutive glyphs which have data in this layer.
///
/// Each entry of `offsets` locates one glyph's point data. The point data
/// itself is not decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerRange {
    pub start: uint16,
    /// Inclusive
    pub last: uint16,
    pub offsets: Vec<Offset32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub flags: LayerFlags,
    /// 1 for quadratic splines, 2 for cubic
    pub layer_type: uint8,
    pub name: String,
    pub ranges: Vec<LayerRange>,
}

impl Layer {
    pub fn is_quadratic(&self) -> bool {
        self.layer_type == 1
    }

    pub fn is_cubic(&self) -> bool {
        self.layer_type == 2
    }
}

/// Represents a font's extra glyph layers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(non_camel_case_types)]
pub struct layr {
    pub layers: Vec<Layer>,
}

pub fn decode(data: &[u8], offset: uint32) -> Result<layr> {
    let mut c = ReaderContext::rebased(data, offset as usize)?;
    let mut indirect = c.clone();
    let mut offsets_cursor = c.clone();

    let version: uint16 = c.de()?;
    check_version("layr", version, 1)?;
    let count: uint16 = c.de()?;

    let mut layers = Vec::new();
    for _ in 0..count {
        let type_flags: TypeFlags = c.de()?;
        let name_offset: Offset16 = c.de()?;
        indirect.seek(name_offset.into())?;
        let name = indirect.read_utf8_string()?;
        let ranges_offset: Offset32 = c.de()?;
        indirect.seek(ranges_offset as usize)?;
        let range_count: uint16 = indirect.de()?;

        let mut ranges = Vec::new();
        for _ in 0..range_count {
            let start: uint16 = indirect.de()?;
            let last: uint16 = indirect.de()?;
            let array_offset: Offset32 = indirect.de()?;
            offsets_cursor.seek(array_offset as usize)?;
            let offsets: Vec<Offset32> = offsets_cursor.de_counted((start..=last).len())?;
            ranges.push(LayerRange {
                start,
                last,
                offsets,
            });
        }
        log::debug!("Layer {:?} has {} glyph ranges", name, ranges.len());

        layers.push(Layer {
            flags: LayerFlags::from_bits_truncate(type_flags.flags),
            layer_type: type_flags.kind,
            name,
            ranges,
        });
    }
    Ok(layr { layers })
}

#[cfg(test)]
pub(crate) const SAMPLE: &[u8] = &[
    0x00, 0x01, // version
    0x00, 0x01, // count
    0x01, 0x02, // flags, type
    0x00, 0x0c, // name offset
    0x00, 0x00, 0x00, 0x0f, // ranges offset
    b'F', b'g', 0x00, // @0x0c
    0x00, 0x01, // @0x0f range count
    0x00, 0x41, // start
    0x00, 0x43, // last
    0x00, 0x00, 0x00, 0x19, // offsets array offset
    0x00, 0x00, 0x00, 0x10, // @0x19
    0x00, 0x00, 0x00, 0x20, //
    0x00, 0x00, 0x00, 0x30, //
];
