/// The `GPOS`/`GSUB` lookup, subtable and anchor class names
#[allow(non_snake_case)]
pub mod GPOS;
/// The `cmnt` (per-codepoint comments) subtable
pub mod cmnt;
/// The `colr` (per-codepoint colors) subtable
pub mod colr;
/// The `fcmt` (font comment) and `flog` (font log) subtables
pub mod fcmt;
/// The `guid` (guideline layer) subtable
pub mod guid;
/// The `layr` (glyph layers) subtable
pub mod layr;
