use crate::error::Result;
use otspec::types::*;
use otspec::{Deserializer, ReaderContext};
use serde::Serialize;

/// The 'GPOS' PfEd tag.
pub const TAG: Tag = Tag::new(b"GPOS");
/// The 'GSUB' PfEd tag. It shares the GPOS layout.
pub const GSUB_TAG: Tag = Tag::new(b"GSUB");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupSubtable {
    pub name: String,
    pub anchor_classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lookup {
    pub name: String,
    pub subtables: Vec<LookupSubtable>,
}

/// Represents the names a font editor gave to its lookups, lookup
/// subtables and anchor classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(non_camel_case_types)]
pub struct GPOS {
    pub lookups: Vec<Lookup>,
}

/// `GSUB` lookup names are stored exactly like `GPOS` ones.
#[allow(non_camel_case_types)]
pub type GSUB = GPOS;

impl GPOS {
    /// All anchor class names, in the order they are stored.
    pub fn anchor_classes(&self) -> impl Iterator<Item = &str> {
        self.lookups
            .iter()
            .flat_map(|l| l.subtables.iter())
            .flat_map(|st| st.anchor_classes.iter())
            .map(|s| s.as_str())
    }
}

/// Decodes the lookup names stored at `offset`.
///
/// The layout is read in three passes. The first collects each lookup's
/// name and subtable count. The second collects each subtable's name and
/// how many anchor classes it has. The third reads one flat list of anchor
/// class names, which is then dealt out to the subtables in order; the
/// counts are the only link between a subtable and its names.
pub fn decode(data: &[u8], offset: uint32) -> Result<GPOS> {
    let mut c = ReaderContext::rebased(data, offset as usize)?;
    let mut indirect = c.clone();

    let version: uint16 = c.de()?;
    if version != 0 {
        log::warn!(
            "Lookup names subtable has version {}, expected 0; reading it anyway",
            version
        );
    }
    let lookup_count: uint16 = c.de()?;

    let mut lookup_shapes: Vec<(String, uint16)> = Vec::new();
    for _ in 0..lookup_count {
        let name_offset: Offset16 = c.de()?;
        indirect.seek(name_offset.into())?;
        let name = indirect.read_utf8_string()?;
        let subtables_offset: Offset16 = c.de()?;
        indirect.seek(subtables_offset.into())?;
        let subtable_count: uint16 = indirect.de()?;
        lookup_shapes.push((name, subtable_count));
    }

    let mut subtable_shapes: Vec<Vec<(String, usize)>> = Vec::new();
    let mut anchor_total: usize = 0;
    for (_, subtable_count) in &lookup_shapes {
        c.skip(2)?; // lookup index
        let mut shapes = Vec::new();
        for _ in 0..*subtable_count {
            let name_offset: Offset16 = c.de()?;
            indirect.seek(name_offset.into())?;
            let name = indirect.read_utf8_string()?;
            let anchors_offset: Offset16 = c.de()?;
            let anchor_count = if anchors_offset == 0 {
                0
            } else {
                indirect.seek(anchors_offset.into())?;
                let count: uint16 = indirect.de()?;
                usize::from(count)
            };
            anchor_total += anchor_count;
            shapes.push((name, anchor_count));
        }
        subtable_shapes.push(shapes);
    }

    if anchor_total > 0 {
        c.skip(2)?; // always 1
    }
    let mut anchor_names: Vec<String> = Vec::new();
    for _ in 0..anchor_total {
        let name_offset: Offset16 = c.de()?;
        indirect.seek(name_offset.into())?;
        anchor_names.push(indirect.read_utf8_string()?);
    }

    let mut lookups = Vec::new();
    for ((name, _), shapes) in lookup_shapes.into_iter().zip(subtable_shapes) {
        let mut subtables = Vec::new();
        for (subtable_name, anchor_count) in shapes {
            subtables.push(LookupSubtable {
                name: subtable_name,
                anchor_classes: anchor_names.drain(..anchor_count).collect(),
            });
        }
        lookups.push(Lookup { name, subtables });
    }
    Ok(GPOS { lookups })
}

#[cfg(test)]
pub(crate) const SAMPLE: &[u8] = &[
    0x00, 0x00, // version
    0x00, 0x02, // lookup count
    0x00, 0x24, 0x00, 0x2e, // lookup 0: name, subtables
    0x00, 0x29, 0x00, 0x30, // lookup 1: name, subtables
    0x00, 0x00, // lookup 0 index
    0x00, 0x36, 0x00, 0x32, // subtable 0: name, anchor classes
    0x00, 0x39, 0x00, 0x00, // subtable 1: name, no anchor classes
    0x00, 0x01, // lookup 1 index
    0x00, 0x3c, 0x00, 0x34, // subtable 2: name, anchor classes
    0x00, 0x01, // marker
    0x00, 0x3f, 0x00, 0x43, 0x00, 0x47, // anchor class names
    b'k', b'e', b'r', b'n', 0x00, // @0x24
    b'm', b'a', b'r', b'k', 0x00, // @0x29
    0x00, 0x02, // @0x2e
    0x00, 0x01, // @0x30
    0x00, 0x02, // @0x32
    0x00, 0x01, // @0x34
    b's', b'0', 0x00, // @0x36
    b's', b'1', 0x00, // @0x39
    b's', b'2', 0x00, // @0x3c
    b't', b'o', b'p', 0x00, // @0x3f
    b'b', b'o', b't', 0x00, // @0x43
    b'o', b'g', b'o', b'n', b'e', b'k', 0x00, // @0x47
];
