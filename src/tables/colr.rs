use crate::error::{check_version, Result};
use otspec::types::*;
use otspec::{Counted, DeserializationError, Deserialize, Deserializer, ReaderContext};
use serde::Serialize;

/// The 'colr' PfEd tag.
pub const TAG: Tag = Tag::new(b"colr");

/// A color shared by a contiguous range of codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorRange {
    pub start: uint16,
    /// Inclusive
    pub end: uint16,
    pub color: Color,
}

impl ColorRange {
    pub fn contains(&self, codepoint: u32) -> bool {
        (u32::from(self.start)..=u32::from(self.end)).contains(&codepoint)
    }
}

impl Deserialize for ColorRange {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let start = c.de()?;
        let end = c.de()?;
        let color = c.de()?;
        Ok(ColorRange { start, end, color })
    }
}

/// Represents a font's per-codepoint colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(non_camel_case_types)]
pub struct colr {
    pub ranges: Vec<ColorRange>,
}

pub fn decode(data: &[u8], offset: uint32) -> Result<colr> {
    let mut c = ReaderContext::rebased(data, offset as usize)?;
    let version: uint16 = c.de()?;
    check_version("colr", version, 0)?;
    let ranges: Counted<ColorRange> = c.de()?;
    Ok(colr {
        ranges: ranges.into(),
    })
}

#[cfg(test)]
pub(crate) const SAMPLE: &[u8] = &[
    0x00, 0x00, // version
    0x00, 0x02, // count
    0x00, 0x41, 0x00, 0x5a, // A-Z
    0xfe, 0xff, 0x00, 0x00, // red, flags byte dropped
    0x00, 0x30, 0x00, 0x39, // 0-9
    0x00, 0x00, 0x80, 0xff, //
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PfEdError;
    use pretty_assertions::assert_eq;

    #[test]
    fn colr_de() {
        let decoded = decode(SAMPLE, 0).unwrap();
        assert_eq!(
            decoded.ranges,
            vec![
                ColorRange {
                    start: 0x41,
                    end: 0x5a,
                    color: Color {
                        red: 0xff,
                        green: 0,
                        blue: 0
                    }
                },
                ColorRange {
                    start: 0x30,
                    end: 0x39,
                    color: Color {
                        red: 0,
                        green: 0x80,
                        blue: 0xff
                    }
                },
            ]
        );
        assert!(decoded.ranges[0].contains(u32::from('M')));
        assert!(!decoded.ranges[0].contains(u32::from('a')));
    }

    #[test]
    fn colr_wants_version_zero() {
        let binary_colr = vec![0x00, 0x01, 0x00, 0x00];
        assert_eq!(
            decode(&binary_colr, 0),
            Err(PfEdError::UnsupportedVersion {
                what: "colr",
                version: 1
            })
        );
    }
}
