use crate::error::{check_version, Result};
use otspec::types::*;
use otspec::{Deserializer, ReaderContext};
use serde::Serialize;

/// The 'guid' PfEd tag.
pub const TAG: Tag = Tag::new(b"guid");

/// The direction of a guideline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuidelineKind {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guideline {
    pub position: int16,
    pub kind: GuidelineKind,
    pub name: String,
}

/// Represents a font's guideline layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(non_camel_case_types)]
pub struct guid {
    pub version: uint16,
    pub description: String,
    pub guidelines: Vec<Guideline>,
}

/// Decodes the guideline layer found `offset` bytes into the PfEd table.
///
/// The header carries both a vertical and a horizontal count, but only
/// the horizontal count of guideline records is read. Records are typed
/// by index against the vertical count, so the first `vertical_count`
/// records read are tagged as vertical.
pub fn decode(data: &[u8], offset: uint32) -> Result<guid> {
    let mut c = ReaderContext::rebased(data, offset as usize)?;
    let mut strings = c.clone();

    let version: uint16 = c.de()?;
    check_version("guid", version, 1)?;
    let vertical_count: uint16 = c.de()?;
    let horizontal_count: uint16 = c.de()?;
    c.skip(2)?; // reserved
    let description_offset: Offset16 = c.de()?;
    strings.seek(description_offset.into())?;
    let description = strings.read_utf8_string()?;

    let mut guidelines = Vec::new();
    for i in 0..horizontal_count {
        let position: int16 = c.de()?;
        let name_offset: Offset16 = c.de()?;
        strings.seek(name_offset.into())?;
        let kind = if i < vertical_count {
            GuidelineKind::Vertical
        } else {
            GuidelineKind::Horizontal
        };
        guidelines.push(Guideline {
            position,
            kind,
            name: strings.read_utf8_string()?,
        });
    }

    Ok(guid {
        version,
        description,
        guidelines,
    })
}

#[cfg(test)]
pub(crate) const SAMPLE: &[u8] = &[
    0x00, 0x01, // version
    0x00, 0x01, // vertical count
    0x00, 0x02, // horizontal count
    0x00, 0x00, // reserved
    0x00, 0x12, // description offset
    0x00, 0x64, 0x00, 0x18, // 100, "x"
    0xff, 0x38, 0x00, 0x1a, // -200, "base"
    b'G', b'u', b'i', b'd', b'e', 0x00, // @0x12
    b'x', 0x00, // @0x18
    b'b', b'a', b's', b'e', 0x00, // @0x1a
];
