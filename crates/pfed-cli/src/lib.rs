use otspec::types::*;
use otspec::{DeserializationError, Deserializer, ReaderContext};
use pfed::{PfEd, PfEdError};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read};
use thiserror::Error;

pub const PFED_TAG: Tag = Tag::new(b"PfEd");

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Could not read input: {0}")]
    Io(#[from] io::Error),

    #[error("Not an OpenType font (sfnt version 0x{0:08x})")]
    NotAFont(u32),

    #[error("Bad font table directory: {0}")]
    Directory(#[from] DeserializationError),

    #[error("Font has no '{0}' table")]
    MissingTable(Tag),

    #[error("Table '{tag}' runs past the end of the font ({offset}+{length} > {len})")]
    TableOutOfBounds {
        tag: Tag,
        offset: u32,
        length: u32,
        len: usize,
    },

    #[error(transparent)]
    PfEd(#[from] PfEdError),
}

/// Reads the whole input file, or standard input if no file is given.
pub fn read_input(filename: Option<&str>) -> Result<Vec<u8>, DumpError> {
    let mut data = vec![];
    match filename {
        Some(filename) => File::open(filename)?.read_to_end(&mut data)?,
        None => io::stdin().read_to_end(&mut data)?,
    };
    Ok(data)
}

/// Finds a table in an sfnt font file and returns its bytes.
pub fn find_table(font: &[u8], wanted: Tag) -> Result<&[u8], DumpError> {
    let mut c = ReaderContext::new(font);
    let sfnt_version: uint32 = c.de()?;
    if !matches!(sfnt_version, 0x0001_0000 | 0x4f54_544f | 0x7472_7565) {
        return Err(DumpError::NotAFont(sfnt_version));
    }
    let num_tables: uint16 = c.de()?;
    c.skip(6)?; // searchRange, entrySelector, rangeShift
    for _ in 0..num_tables {
        let tag: Tag = c.de()?;
        let _checksum: uint32 = c.de()?;
        let offset: uint32 = c.de()?;
        let length: uint32 = c.de()?;
        if tag != wanted {
            continue;
        }
        log::debug!(
            "Found '{}' table @ 0x{:08x}, {} bytes",
            tag,
            offset,
            length
        );
        let start = offset as usize;
        let end = start.checked_add(length as usize);
        return end.and_then(|end| font.get(start..end)).ok_or(DumpError::TableOutOfBounds {
            tag,
            offset,
            length,
            len: font.len(),
        });
    }
    Err(DumpError::MissingTable(wanted))
}

#[derive(Serialize)]
pub struct Failure {
    pub tag: Tag,
    pub error: String,
}

/// What gets printed: the decoded table plus anything that went wrong.
#[derive(Serialize)]
pub struct Dump<'a> {
    #[serde(flatten)]
    pub pfed: &'a PfEd,
    pub failures: Vec<Failure>,
}

impl<'a> From<&'a PfEd> for Dump<'a> {
    fn from(pfed: &'a PfEd) -> Self {
        Dump {
            pfed,
            failures: pfed
                .failures
                .iter()
                .map(|(tag, e)| Failure {
                    tag: *tag,
                    error: e.to_string(),
                })
                .collect(),
        }
    }
}

/// Decodes the PfEd table in `data`, which is either a font file or, if
/// `raw` is set, the table on its own.
pub fn load_pfed(data: &[u8], raw: bool) -> Result<PfEd, DumpError> {
    let table = if raw { data } else { find_table(data, PFED_TAG)? };
    Ok(pfed::decode(table)?)
}
