//! Decoding a whole PfEd table.
//!
//! The core of this module is [`PfEd`], which holds every subtable that
//! could be decoded, keyed by tag in table-of-contents order, along with the
//! subtables that could not.

use crate::error::{PfEdError, Result, Warning};
use crate::header::TableHeader;
use crate::tables;
use crate::toc::TableOfContents;
use indexmap::IndexMap;
use otspec::types::*;
use otspec::ReaderContext;
use serde::Serialize;

/// The 'cvtc' PfEd tag. Its layout is undocumented, so it is never decoded.
pub const CVTC_TAG: Tag = Tag::new(b"cvtc");

/// A decoded PfEd subtable.
///
/// There is one variant for each tag this crate knows how to read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
pub enum Subtable {
    /// Contains positioning lookup, subtable and anchor class names.
    GPOS(tables::GPOS::GPOS),
    /// Contains substitution lookup and subtable names.
    GSUB(tables::GPOS::GSUB),
    /// Contains a guideline layer.
    guid(tables::guid::guid),
    /// Contains extra glyph layers.
    layr(tables::layr::layr),
    /// Contains the font comment.
    fcmt(String),
    /// Contains the font change log.
    flog(String),
    /// Contains per-codepoint comments.
    cmnt(tables::cmnt::cmnt),
    /// Contains per-codepoint colors.
    colr(tables::colr::colr),
}

impl Subtable {
    /// Decodes the subtable tagged `tag` found `offset` bytes into `data`.
    ///
    /// `cvtc` and any tag not listed on [`Subtable`] give
    /// [`PfEdError::UnsupportedFormat`] without reading anything.
    pub fn decode(tag: Tag, data: &[u8], offset: uint32) -> Result<Subtable> {
        match tag {
            tables::GPOS::TAG => tables::GPOS::decode(data, offset).map(Subtable::GPOS),
            tables::GPOS::GSUB_TAG => tables::GPOS::decode(data, offset).map(Subtable::GSUB),
            tables::guid::TAG => tables::guid::decode(data, offset).map(Subtable::guid),
            tables::layr::TAG => tables::layr::decode(data, offset).map(Subtable::layr),
            tables::fcmt::TAG => tables::fcmt::decode(data, offset).map(Subtable::fcmt),
            tables::fcmt::FLOG_TAG => tables::fcmt::decode_log(data, offset).map(Subtable::flog),
            tables::cmnt::TAG => tables::cmnt::decode(data, offset).map(Subtable::cmnt),
            tables::colr::TAG => tables::colr::decode(data, offset).map(Subtable::colr),
            _ => Err(PfEdError::UnsupportedFormat { tag }),
        }
    }

    /// The tag this subtable is stored under.
    pub fn tag(&self) -> Tag {
        match self {
            Subtable::GPOS(_) => tables::GPOS::TAG,
            Subtable::GSUB(_) => tables::GPOS::GSUB_TAG,
            Subtable::guid(_) => tables::guid::TAG,
            Subtable::layr(_) => tables::layr::TAG,
            Subtable::fcmt(_) => tables::fcmt::TAG,
            Subtable::flog(_) => tables::fcmt::FLOG_TAG,
            Subtable::cmnt(_) => tables::cmnt::TAG,
            Subtable::colr(_) => tables::colr::TAG,
        }
    }
}

/// The contents of a PfEd table.
///
/// A subtable which fails to decode does not stop the others from being
/// read; it is recorded in `failures` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PfEd {
    pub header: TableHeader,
    pub toc: TableOfContents,
    /// Successfully decoded subtables, in table of contents order.
    pub subtables: IndexMap<Tag, Subtable>,
    #[serde(skip)]
    pub failures: Vec<(Tag, PfEdError)>,
}

impl PfEd {
    /// Reads just the table header and table of contents.
    pub fn read_directory(data: &[u8]) -> Result<(TableHeader, TableOfContents)> {
        let mut c = ReaderContext::new(data);
        let header = TableHeader::read(&mut c)?;
        let toc = TableOfContents::read(&mut c, header.subtable_count)?;
        Ok((header, toc))
    }

    /// Decodes a PfEd table.
    ///
    /// Only a bad header or table of contents makes this fail; problems in
    /// individual subtables end up in [`PfEd::failures`].
    pub fn decode(data: &[u8]) -> Result<PfEd> {
        let (header, toc) = PfEd::read_directory(data)?;
        let mut subtables = IndexMap::new();
        let mut failures = vec![];
        for (&tag, &offset) in &toc.offsets {
            log::debug!("Decoding subtable {} @ 0x{:08x}", tag, offset);
            match Subtable::decode(tag, data, offset) {
                Ok(subtable) => {
                    subtables.insert(tag, subtable);
                }
                Err(e) => {
                    log::warn!("Could not decode PfEd subtable '{}': {}", tag, e);
                    failures.push((tag, e));
                }
            }
        }
        Ok(PfEd {
            header,
            toc,
            subtables,
            failures,
        })
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.toc.warnings
    }

    /// Returns the decoded subtable with the given tag, if any.
    pub fn get(&self, tag: &str) -> Option<&Subtable> {
        let tag = Tag::from_raw(tag).ok()?;
        self.subtables.get(&tag)
    }

    /// The comment attached to a codepoint by the `cmnt` subtable.
    pub fn comment(&self, codepoint: u32) -> Option<&str> {
        match self.subtables.get(&tables::cmnt::TAG)? {
            Subtable::cmnt(cmnt) => cmnt
                .ranges
                .iter()
                .find_map(|range| range.comment_for(codepoint)),
            _ => None,
        }
    }

    /// The color given to a codepoint by the `colr` subtable.
    pub fn color(&self, codepoint: u32) -> Option<Color> {
        match self.subtables.get(&tables::colr::TAG)? {
            Subtable::colr(colr) => colr
                .ranges
                .iter()
                .find(|range| range.contains(codepoint))
                .map(|range| range.color),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::guid::GuidelineKind;
    use pretty_assertions::assert_eq;

    /// Lays out a header, a table of contents and the subtable bodies
    /// back to back.
    fn build_table(entries: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let mut out = vec![0x00, 0x01, 0x00, 0x00];
        out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        let mut offset = 8 + 8 * entries.len();
        for (tag, body) in entries {
            out.extend_from_slice(*tag);
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            offset += body.len();
        }
        for (_, body) in entries {
            out.extend_from_slice(body);
        }
        out
    }

    const FLOG: &[u8] = b"\x00\x01\x00\x04log\x00";
    const BAD_GUID: &[u8] = &[0x00, 0x07, 0x00, 0x00];

    fn full_table() -> Vec<u8> {
        build_table(&[
            (b"guid", tables::guid::SAMPLE),
            (b"layr", tables::layr::SAMPLE),
            (b"fcmt", tables::fcmt::SAMPLE),
            (b"flog", FLOG),
            (b"cmnt", tables::cmnt::SAMPLE),
            (b"colr", tables::colr::SAMPLE),
            (b"GPOS", tables::GPOS::SAMPLE),
            (b"GSUB", tables::GPOS::SAMPLE),
            (b"cvtc", &[0x00, 0x00]),
        ])
    }

    #[test]
    fn decodes_every_known_subtable() {
        let _ = env_logger::builder().is_test(true).try_init();
        let data = full_table();
        let pfed = PfEd::decode(&data).unwrap();

        assert_eq!(pfed.header.subtable_count, 9);
        assert_eq!(
            pfed.subtables.keys().map(|t| t.to_string()).collect::<Vec<_>>(),
            vec!["guid", "layr", "fcmt", "flog", "cmnt", "colr", "GPOS", "GSUB"]
        );
        assert_eq!(
            pfed.failures,
            vec![(CVTC_TAG, PfEdError::UnsupportedFormat { tag: CVTC_TAG })]
        );
        assert!(pfed.warnings().is_empty());

        // Every subtable decodes the same wherever it sits in the table
        assert_eq!(
            pfed.get("guid"),
            Some(&Subtable::guid(
                tables::guid::decode(tables::guid::SAMPLE, 0).unwrap()
            ))
        );
        assert_eq!(
            pfed.get("layr"),
            Some(&Subtable::layr(
                tables::layr::decode(tables::layr::SAMPLE, 0).unwrap()
            ))
        );
        assert_eq!(
            pfed.get("GSUB"),
            Some(&Subtable::GSUB(
                tables::GPOS::decode(tables::GPOS::SAMPLE, 0).unwrap()
            ))
        );
        assert_eq!(pfed.get("fcmt"), Some(&Subtable::fcmt("Hello".to_string())));
        assert_eq!(pfed.get("flog"), Some(&Subtable::flog("log".to_string())));

        if let Some(Subtable::guid(guid)) = pfed.get("guid") {
            assert_eq!(guid.description, "Guide");
            assert_eq!(guid.guidelines[0].kind, GuidelineKind::Vertical);
        } else {
            panic!("no guid subtable");
        }

        assert_eq!(pfed.comment(10), Some("ten"));
        assert_eq!(pfed.comment(11), Some("eleven"));
        assert_eq!(pfed.comment(12), Some("twelve"));
        assert_eq!(pfed.comment(13), None);
        assert_eq!(pfed.color(u32::from('Q')).map(|c| c.rgb()), Some((0xff, 0, 0)));
        assert_eq!(pfed.color(u32::from('5')).map(|c| c.rgb()), Some((0, 0x80, 0xff)));
        assert_eq!(pfed.color(u32::from('!')), None);

        for subtable in pfed.subtables.values() {
            assert!(pfed.subtables.contains_key(&subtable.tag()));
        }
    }

    #[test]
    fn anchor_classes_are_dealt_out_exactly_once() {
        let data = full_table();
        let pfed = PfEd::decode(&data).unwrap();
        let gpos = match pfed.get("GPOS") {
            Some(Subtable::GPOS(gpos)) => gpos,
            other => panic!("unexpected {:?}", other),
        };
        let per_subtable: Vec<usize> = gpos
            .lookups
            .iter()
            .flat_map(|l| l.subtables.iter())
            .map(|st| st.anchor_classes.len())
            .collect();
        assert_eq!(per_subtable, vec![2, 0, 1]);
        assert_eq!(
            gpos.anchor_classes().collect::<Vec<_>>(),
            vec!["top", "bot", "ogonek"]
        );
    }

    #[test]
    fn bad_header_version_reads_nothing() {
        let mut data = full_table();
        data[1] = 0x02;
        assert_eq!(
            PfEd::decode(&data),
            Err(PfEdError::UnsupportedVersion {
                what: "PfEd table",
                version: 0x0002_0000
            })
        );
    }

    #[test]
    fn duplicated_tags_keep_the_first() {
        let data = build_table(&[
            (b"fcmt", tables::fcmt::SAMPLE),
            (b"fcmt", FLOG),
            (b"fcmt", FLOG),
        ]);
        let pfed = PfEd::decode(&data).unwrap();
        assert_eq!(pfed.toc.entries.len(), 3);
        assert_eq!(pfed.get("fcmt"), Some(&Subtable::fcmt("Hello".to_string())));
        assert_eq!(
            pfed.warnings(),
            &[Warning::DuplicatedSubtable {
                tag: tables::fcmt::TAG,
                offset: 32
            }]
        );
    }

    #[test]
    fn one_bad_subtable_does_not_stop_the_rest() {
        let data = build_table(&[
            (b"guid", BAD_GUID),
            (b"zzzz", &[0x00]),
            (b"colr", tables::colr::SAMPLE),
        ]);
        let pfed = PfEd::decode(&data).unwrap();
        assert_eq!(pfed.subtables.len(), 1);
        assert!(pfed.get("colr").is_some());
        assert_eq!(
            pfed.failures,
            vec![
                (
                    tables::guid::TAG,
                    PfEdError::UnsupportedVersion {
                        what: "guid",
                        version: 7
                    }
                ),
                (
                    Tag::new(b"zzzz"),
                    PfEdError::UnsupportedFormat {
                        tag: Tag::new(b"zzzz")
                    }
                ),
            ]
        );
    }

    #[test]
    fn malformed_tags_are_unsupported_not_fatal() {
        let data = build_table(&[
            (b"colr", tables::colr::SAMPLE),
            (b"\0\0\0\0", &[0x00, 0x01]),
            (b"gu\xffd", tables::guid::SAMPLE),
        ]);
        let pfed = PfEd::decode(&data).unwrap();
        assert_eq!(
            pfed.subtables.keys().collect::<Vec<_>>(),
            vec![&tables::colr::TAG]
        );
        let nul = Tag::from_be_bytes([0; 4]);
        let odd = Tag::from_be_bytes(*b"gu\xffd");
        assert_eq!(
            pfed.failures,
            vec![
                (nul, PfEdError::UnsupportedFormat { tag: nul }),
                (odd, PfEdError::UnsupportedFormat { tag: odd }),
            ]
        );
        assert_eq!(
            pfed.failures[0].1.to_string(),
            "Unsupported PfEd subtable '{0x00}{0x00}{0x00}{0x00}'"
        );
    }

    #[test]
    fn truncated_directory_is_fatal() {
        let data = full_table();
        for len in 0..(8 + 8 * 9) {
            assert!(
                matches!(
                    PfEd::decode(&data[..len]),
                    Err(PfEdError::TruncatedBuffer { .. })
                ),
                "table cut to {} bytes",
                len
            );
        }
    }

    #[test]
    fn truncated_subtables_report_truncation() {
        let samples: [(&[u8; 4], &[u8]); 6] = [
            (b"guid", tables::guid::SAMPLE),
            (b"layr", tables::layr::SAMPLE),
            (b"fcmt", tables::fcmt::SAMPLE),
            (b"cmnt", tables::cmnt::SAMPLE),
            (b"colr", tables::colr::SAMPLE),
            (b"GPOS", tables::GPOS::SAMPLE),
        ];
        for (tag, body) in samples.iter() {
            let data = build_table(&[(*tag, *body)]);
            let pfed = PfEd::decode(&data[..data.len() - 1]).unwrap();
            assert!(pfed.subtables.is_empty());
            assert_eq!(pfed.failures.len(), 1);
            let (failed, error) = &pfed.failures[0];
            assert_eq!(failed.as_bytes(), *tag);
            assert!(
                matches!(error, PfEdError::TruncatedBuffer { .. }),
                "{} gave {:?}",
                failed,
                error
            );
        }
    }
}
