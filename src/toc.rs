use crate::error::{Result, Warning};
use indexmap::IndexMap;
use otspec::types::*;
use otspec::{DeserializationError, Deserialize, Deserializer, ReaderContext};
use serde::Serialize;
use std::collections::BTreeSet;

/// One directory entry: a subtable tag and its offset from the start of
/// the PfEd table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub tag: Tag,
    pub offset: uint32,
}

impl Deserialize for TocEntry {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let tag = c.de()?;
        let offset = c.de()?;
        Ok(TocEntry { tag, offset })
    }
}

/// The subtable directory which follows the table header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableOfContents {
    /// Every entry, in file order, including duplicates.
    pub entries: Vec<TocEntry>,
    /// First offset seen for each tag, in file order.
    pub offsets: IndexMap<Tag, uint32>,
    pub warnings: Vec<Warning>,
}

impl TableOfContents {
    /// Reads `count` entries from the current position.
    ///
    /// When a tag repeats, the first offset wins and a single
    /// [`Warning::DuplicatedSubtable`] is recorded for that tag.
    pub fn read(c: &mut ReaderContext, count: uint32) -> Result<Self> {
        let mut toc = TableOfContents::default();
        let mut duplicated: BTreeSet<Tag> = BTreeSet::new();
        for _ in 0..count {
            let entry: TocEntry = c.de()?;
            log::debug!(
                "Subtable tagged {} starts @ 0x{:08x}",
                entry.tag,
                entry.offset
            );
            toc.entries.push(entry);
            if let Some(&first) = toc.offsets.get(&entry.tag) {
                if duplicated.insert(entry.tag) {
                    let warning = Warning::DuplicatedSubtable {
                        tag: entry.tag,
                        offset: first,
                    };
                    log::warn!("{}", warning);
                    toc.warnings.push(warning);
                }
            } else {
                toc.offsets.insert(entry.tag, entry.offset);
            }
        }
        Ok(toc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PfEdError;
    use pretty_assertions::assert_eq;

    #[test]
    fn toc_de() {
        let bytes = vec![
            b'g', b'u', b'i', b'd', 0x00, 0x00, 0x00, 0x20, // guid @ 0x20
            b'c', b'o', b'l', b'r', 0x00, 0x00, 0x01, 0x00, // colr @ 0x100
        ];
        let mut rc = ReaderContext::new(&bytes);
        let toc = TableOfContents::read(&mut rc, 2).unwrap();
        assert_eq!(
            toc.entries,
            vec![
                TocEntry {
                    tag: Tag::new(b"guid"),
                    offset: 0x20
                },
                TocEntry {
                    tag: Tag::new(b"colr"),
                    offset: 0x100
                },
            ]
        );
        assert_eq!(
            toc.offsets.keys().collect::<Vec<_>>(),
            vec![&Tag::new(b"guid"), &Tag::new(b"colr")]
        );
        assert!(toc.warnings.is_empty());
    }

    #[test]
    fn toc_duplicates_first_wins() {
        let bytes = vec![
            b'c', b'm', b'n', b't', 0x00, 0x00, 0x00, 0x10, //
            b'c', b'm', b'n', b't', 0x00, 0x00, 0x00, 0x20, //
            b'f', b'c', b'm', b't', 0x00, 0x00, 0x00, 0x30, //
            b'c', b'm', b'n', b't', 0x00, 0x00, 0x00, 0x40, //
        ];
        let mut rc = ReaderContext::new(&bytes);
        let toc = TableOfContents::read(&mut rc, 4).unwrap();
        assert_eq!(toc.entries.len(), 4);
        assert_eq!(toc.offsets.len(), 2);
        assert_eq!(toc.offsets[&Tag::new(b"cmnt")], 0x10);
        assert_eq!(
            toc.warnings,
            vec![Warning::DuplicatedSubtable {
                tag: Tag::new(b"cmnt"),
                offset: 0x10
            }]
        );
    }

    #[test]
    fn toc_truncated() {
        let bytes = vec![b'g', b'u', b'i', b'd', 0x00, 0x00, 0x00, 0x20, b'c'];
        let mut rc = ReaderContext::new(&bytes);
        assert!(matches!(
            TableOfContents::read(&mut rc, 2),
            Err(PfEdError::TruncatedBuffer { offset: 8, .. })
        ));
    }
}
