//! A reader for the FontForge `PfEd` table.
//!
//! `PfEd` is a private OpenType table in which FontForge stores editor
//! state: comments, font logs, guidelines, extra glyph layers, per-codepoint
//! colors and the names of lookups and anchor classes. This crate decodes a
//! raw table into plain Rust values.
//!
//! ```no_run
//! let data = std::fs::read("PfEd.bin").unwrap();
//! let pfed = pfed::decode(&data).unwrap();
//! if let Some(comment) = pfed.get("fcmt") {
//!     println!("{:?}", comment);
//! }
//! ```
mod error;
pub mod header;
mod pfed;
pub mod tables;
pub mod toc;

pub use crate::error::{PfEdError, Warning};
pub use crate::header::TableHeader;
pub use crate::pfed::{PfEd, Subtable, CVTC_TAG};
pub use crate::toc::{TableOfContents, TocEntry};
pub use otspec::Tag;

/// Decodes a complete PfEd table.
///
/// Fails only if the table header or the table of contents cannot be read.
/// Subtables which cannot be decoded are listed in [`PfEd::failures`].
pub fn decode(data: &[u8]) -> Result<PfEd, PfEdError> {
    PfEd::decode(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table() {
        let pfed = decode(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert!(pfed.subtables.is_empty());
        assert!(pfed.failures.is_empty());
        assert!(pfed.warnings().is_empty());
    }

    #[test]
    fn not_a_pfed_table() {
        assert!(matches!(
            decode(b"OTTO\x00\x00\x00\x00"),
            Err(PfEdError::UnsupportedVersion { .. })
        ));
    }
}
