use crate::error::{check_version, Result};
use otspec::types::*;
use otspec::{Deserializer, ReaderContext};
use serde::Serialize;

/// The 'cmnt' PfEd tag.
pub const TAG: Tag = Tag::new(b"cmnt");

/// Comments for a contiguous range of codepoints, one per codepoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRange {
    pub start: uint16,
    /// Inclusive
    pub end: uint16,
    pub comments: Vec<String>,
}

impl CommentRange {
    pub fn contains(&self, codepoint: u32) -> bool {
        (u32::from(self.start)..=u32::from(self.end)).contains(&codepoint)
    }

    /// The comment attached to `codepoint`, if it falls in this range.
    pub fn comment_for(&self, codepoint: u32) -> Option<&str> {
        if !self.contains(codepoint) {
            return None;
        }
        self.comments
            .get((codepoint - u32::from(self.start)) as usize)
            .map(|s| s.as_str())
    }
}

/// Represents a font's per-codepoint comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(non_camel_case_types)]
pub struct cmnt {
    pub ranges: Vec<CommentRange>,
}

/// Decodes the comment ranges.
///
/// Each record points at a cell which holds a second offset, and that one
/// points at the first of the range's strings. The strings are stored back
/// to back.
pub fn decode(data: &[u8], offset: uint32) -> Result<cmnt> {
    let mut c = ReaderContext::rebased(data, offset as usize)?;
    let mut indirect = c.clone();

    let version: uint16 = c.de()?;
    check_version("cmnt", version, 1)?;
    let count: uint16 = c.de()?;

    let mut ranges = Vec::new();
    for _ in 0..count {
        let start: uint16 = c.de()?;
        let end: uint16 = c.de()?;
        let cell_offset: Offset32 = c.de()?;
        indirect.seek(cell_offset as usize)?;
        let strings_offset: Offset32 = indirect.de()?;
        indirect.seek(strings_offset as usize)?;
        let comments = (start..=end)
            .map(|_| indirect.read_utf8_string())
            .collect::<Result<Vec<_>, _>>()?;
        ranges.push(CommentRange {
            start,
            end,
            comments,
        });
    }
    Ok(cmnt { ranges })
}

#[cfg(test)]
pub(crate) const SAMPLE: &[u8] = &[
    0x00, 0x01, // version
    0x00, 0x01, // count
    0x00, 0x0a, // start
    0x00, 0x0c, // end
    0x00, 0x00, 0x00, 0x0c, // offset to cell
    0x00, 0x00, 0x00, 0x10, // @0x0c cell
    b't', b'e', b'n', 0x00, // @0x10
    b'e', b'l', b'e', b'v', b'e', b'n', 0x00, //
    b't', b'w', b'e', b'l', b'v', b'e', 0x00, //
];
