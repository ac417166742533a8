use crate::DeserializationError;
use crate::Deserialize;
use crate::Deserializer;
use crate::ReaderContext;
use serde::Serialize;

pub use crate::tag::Tag;

pub type uint8 = u8;
pub type uint16 = u16;
pub type uint32 = u32;
pub type int16 = i16;
pub type Offset16 = u16;
pub type Offset32 = u32;

/// A two byte flags-then-type pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeFlags {
    pub flags: uint8,
    pub kind: uint8,
}

impl Deserialize for TypeFlags {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let flags = c.de()?;
        let kind = c.de()?;
        Ok(TypeFlags { flags, kind })
    }
}

/// A 24-bit RGB color.
///
/// On the wire this is a four byte quad whose leading byte is not part of
/// the color; it is read and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub red: uint8,
    pub green: uint8,
    pub blue: uint8,
}

impl Color {
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

impl Deserialize for Color {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let quad = c.consume(4)?;
        Ok(Color {
            red: quad[1],
            green: quad[2],
            blue: quad[3],
        })
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}
